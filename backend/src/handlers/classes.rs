//! Class-session CRUD and the room/teacher/schedule conflict checks.
//!
//! Creating a session books the room and fans out one Absent attendance row
//! per enrolment of the course; deleting it releases the room and removes
//! those rows again.

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use chrono::{NaiveDateTime, Utc};
use serde_json::{json, Value};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    handlers::auth_repo,
    models::attendance::StudentAttendance,
    models::class_session::{ClassSession, CreateClassSession, UpdateClassSession},
    models::course::Course,
    models::employee::Employee,
    models::room::{Room, RoomStatus},
    utils::schedule::Schedule,
};

pub async fn create_session(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(advisor): Extension<Employee>,
    Json(payload): Json<CreateClassSession>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;

    let course = super::courses::find_course_for_advisor(&pool, &payload.course_id, &advisor.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    validate_teacher(&pool, &payload.teacher_id).await?;
    validate_session_date(&course, &payload.session_date)?;

    let duplicate: Option<(String,)> = sqlx::query_as(
        "SELECT id FROM class_sessions WHERE course_id = $1 AND session_date = $2 AND term = $3",
    )
    .bind(&course.id)
    .bind(payload.session_date)
    .bind(payload.term)
    .fetch_optional(&pool)
    .await?;
    if duplicate.is_some() {
        return Err(AppError::Conflict(
            "A session already exists for this course, date, and term".to_string(),
        ));
    }

    let room = validate_room(&pool, &payload.room_id).await?;

    let session = ClassSession::new(
        course.id.clone(),
        payload.term,
        payload.teacher_id,
        room.id.clone(),
        payload.session_date,
    );

    // Book the room and fan out attendance in one transaction.
    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO class_sessions (id, course_id, term, teacher_id, room_id, session_date, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(&session.id)
    .bind(&session.course_id)
    .bind(session.term)
    .bind(&session.teacher_id)
    .bind(&session.room_id)
    .bind(session.session_date)
    .bind(session.created_at)
    .bind(session.updated_at)
    .execute(&mut *tx)
    .await?;

    sqlx::query("UPDATE rooms SET status = $1, updated_at = $2 WHERE id = $3")
        .bind(RoomStatus::Occupied.as_str())
        .bind(Utc::now())
        .bind(&room.id)
        .execute(&mut *tx)
        .await?;

    let enrolments: Vec<(String, String)> =
        sqlx::query_as("SELECT id, student_id FROM enrolments WHERE course_id = $1")
            .bind(&course.id)
            .fetch_all(&mut *tx)
            .await?;
    let generated = enrolments.len();
    for (enrolment_id, student_id) in enrolments {
        let row = StudentAttendance::new(student_id, session.id.clone(), enrolment_id);
        sqlx::query(
            "INSERT INTO student_attendance (id, student_id, session_id, enrolment_id, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(&row.id)
        .bind(&row.student_id)
        .bind(&row.session_id)
        .bind(&row.enrolment_id)
        .bind(row.status.as_str())
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;

    tracing::info!(
        session_id = %session.id,
        course_id = %session.course_id,
        attendance_generated = generated,
        "class session created"
    );

    Ok(Json(json!({
        "session": session,
        "attendance_generated": generated
    })))
}

pub async fn update_session(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(advisor): Extension<Employee>,
    Path(session_id): Path<String>,
    Json(payload): Json<UpdateClassSession>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;

    let session = find_session(&pool, &session_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Class session not found".to_string()))?;

    let course = super::courses::find_course_for_advisor(&pool, &session.course_id, &advisor.id)
        .await?
        .ok_or_else(|| AppError::Forbidden("Permission denied".to_string()))?;

    // Attendance rows are derived from the course's enrolments, so a session
    // cannot move to a different course; delete and recreate instead.
    if payload
        .course_id
        .as_ref()
        .is_some_and(|course_id| course_id != &session.course_id)
    {
        return Err(AppError::BadRequest(
            "Sessions cannot move between courses".to_string(),
        ));
    }

    let teacher_id = payload.teacher_id.unwrap_or_else(|| session.teacher_id.clone());
    if teacher_id != session.teacher_id {
        validate_teacher(&pool, &teacher_id).await?;
    }

    let session_date = payload.session_date.unwrap_or(session.session_date);
    if session_date != session.session_date {
        validate_session_date(&course, &session_date)?;
    }

    let room_id = payload.room_id.unwrap_or_else(|| session.room_id.clone());
    let room_changed = room_id != session.room_id;
    if room_changed {
        validate_room(&pool, &room_id).await?;
    }

    let mut tx = pool.begin().await?;
    sqlx::query(
        "UPDATE class_sessions SET term = $1, teacher_id = $2, room_id = $3, session_date = $4, updated_at = $5 \
         WHERE id = $6",
    )
    .bind(payload.term.unwrap_or(session.term))
    .bind(&teacher_id)
    .bind(&room_id)
    .bind(session_date)
    .bind(Utc::now())
    .bind(&session.id)
    .execute(&mut *tx)
    .await?;

    if room_changed {
        sqlx::query("UPDATE rooms SET status = $1, updated_at = $2 WHERE id = $3")
            .bind(RoomStatus::Occupied.as_str())
            .bind(Utc::now())
            .bind(&room_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE rooms SET status = $1, updated_at = $2 WHERE id = $3")
            .bind(RoomStatus::Free.as_str())
            .bind(Utc::now())
            .bind(&session.room_id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    Ok(Json(json!({ "message": "Class session updated successfully" })))
}

pub async fn delete_session(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(advisor): Extension<Employee>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let session = find_session(&pool, &session_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Class session not found".to_string()))?;

    super::courses::find_course_for_advisor(&pool, &session.course_id, &advisor.id)
        .await?
        .ok_or_else(|| AppError::Forbidden("Permission denied".to_string()))?;

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM student_attendance WHERE session_id = $1")
        .bind(&session.id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("UPDATE rooms SET status = $1, updated_at = $2 WHERE id = $3")
        .bind(RoomStatus::Free.as_str())
        .bind(Utc::now())
        .bind(&session.room_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM class_sessions WHERE id = $1")
        .bind(&session.id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!(session_id = %session.id, room_id = %session.room_id, "class session deleted");
    Ok(Json(json!({ "message": "Class session deleted successfully" })))
}

pub async fn list_sessions(
    State((pool, _config)): State<(PgPool, Config)>,
) -> Result<Json<Vec<ClassSession>>, AppError> {
    let sessions = sqlx::query_as::<_, ClassSession>(
        "SELECT * FROM class_sessions ORDER BY session_date DESC",
    )
    .fetch_all(&pool)
    .await?;
    Ok(Json(sessions))
}

pub async fn get_session(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(session_id): Path<String>,
) -> Result<Json<ClassSession>, AppError> {
    let session = find_session(&pool, &session_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Class session not found".to_string()))?;
    Ok(Json(session))
}

pub async fn my_sessions(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(teacher): Extension<Employee>,
) -> Result<Json<Vec<ClassSession>>, AppError> {
    let sessions = sqlx::query_as::<_, ClassSession>(
        "SELECT * FROM class_sessions WHERE teacher_id = $1 ORDER BY session_date DESC",
    )
    .bind(&teacher.id)
    .fetch_all(&pool)
    .await?;
    Ok(Json(sessions))
}

async fn validate_teacher(pool: &PgPool, teacher_id: &str) -> Result<Employee, AppError> {
    let teacher = auth_repo::find_employee_by_id(pool, teacher_id)
        .await?
        .filter(Employee::is_teacher)
        .ok_or_else(|| AppError::NotFound("Employee not found or not a Teacher".to_string()))?;

    if !teacher.is_available_teacher() {
        return Err(AppError::Conflict("Teacher is unavailable".to_string()));
    }
    Ok(teacher)
}

async fn validate_room(pool: &PgPool, room_id: &str) -> Result<Room, AppError> {
    let room = sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1")
        .bind(room_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;

    if !room.is_free() {
        return Err(AppError::Conflict(format!(
            "Room is in {}",
            room.status.as_str()
        )));
    }
    Ok(room)
}

fn validate_session_date(course: &Course, session_date: &NaiveDateTime) -> Result<(), AppError> {
    let schedule = Schedule::parse(&course.schedule).map_err(|err| {
        AppError::InternalServerError(anyhow::anyhow!(
            "course {} carries an unparseable schedule: {}",
            course.id,
            err
        ))
    })?;

    if !schedule.matches_weekday(session_date) {
        return Err(AppError::BadRequest(
            "Weekday not in course's schedule".to_string(),
        ));
    }
    if !schedule.matches_start(session_date) {
        return Err(AppError::BadRequest(
            "Start hour not in course's schedule".to_string(),
        ));
    }
    Ok(())
}

async fn find_session(
    pool: &PgPool,
    session_id: &str,
) -> Result<Option<ClassSession>, sqlx::Error> {
    sqlx::query_as::<_, ClassSession>("SELECT * FROM class_sessions WHERE id = $1")
        .bind(session_id)
        .fetch_optional(pool)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::course::CourseLevel;
    use chrono::NaiveDate;

    fn course_with_schedule(schedule: &str) -> Course {
        Course::new(
            CourseLevel::CefrB1,
            6,
            NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            schedule.to_string(),
            "EM002".to_string(),
            500,
            "CEFR A2".to_string(),
            None,
            NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        )
    }

    #[test]
    fn session_date_must_hit_scheduled_weekday() {
        let course = course_with_schedule("Mon - Wed, 09:00 - 10:30");
        // 2025-06-06 is a Friday.
        let bad = NaiveDate::from_ymd_opt(2025, 6, 6)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert!(matches!(
            validate_session_date(&course, &bad),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn session_date_must_hit_scheduled_start() {
        let course = course_with_schedule("Mon - Wed, 09:00 - 10:30");
        // Monday, but half an hour late.
        let bad = NaiveDate::from_ymd_opt(2025, 6, 2)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert!(matches!(
            validate_session_date(&course, &bad),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn matching_session_date_is_accepted() {
        let course = course_with_schedule("Mon - Wed, 09:00 - 10:30");
        let good = NaiveDate::from_ymd_opt(2025, 6, 4)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert!(validate_session_date(&course, &good).is_ok());
    }

    #[test]
    fn unparseable_stored_schedule_is_a_server_error() {
        let course = course_with_schedule("whenever we feel like it");
        let date = NaiveDate::from_ymd_opt(2025, 6, 4)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert!(matches!(
            validate_session_date(&course, &date),
            Err(AppError::InternalServerError(_))
        ));
    }
}
