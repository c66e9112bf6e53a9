use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use sqlx::PgPool;

use crate::{
    config::Config,
    error::AppError,
    handlers::auth_repo,
    models::attendance::{AttendanceStatus, StudentAttendance},
    models::course::Course,
    models::employee::Employee,
    models::makeup_class::{CreateMakeupClass, MakeupClass},
    models::room::Room,
};

pub async fn create_makeup_class(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(advisor): Extension<Employee>,
    Json(payload): Json<CreateMakeupClass>,
) -> Result<Json<MakeupClass>, AppError> {
    let attendance = sqlx::query_as::<_, StudentAttendance>(
        "SELECT * FROM student_attendance WHERE id = $1",
    )
    .bind(&payload.attendance_id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Attendance row not found".to_string()))?;

    if attendance.status != AttendanceStatus::Absent {
        return Err(AppError::BadRequest(
            "Makeup classes are only planned for absences".to_string(),
        ));
    }

    // The missed course must belong to the calling advisor and match the
    // chosen catalog level.
    let course = sqlx::query_as::<_, Course>(
        "SELECT c.* FROM courses c \
         JOIN enrolments e ON e.course_id = c.id \
         WHERE e.id = $1 AND c.learning_advisor_id = $2",
    )
    .bind(&attendance.enrolment_id)
    .bind(&advisor.id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Course for this advisor not found".to_string()))?;

    if course.code != payload.level_choice.code() {
        return Err(AppError::BadRequest(
            "Level choice does not match the missed course".to_string(),
        ));
    }

    let teacher = auth_repo::find_employee_by_id(&pool, &payload.teacher_id)
        .await?
        .filter(Employee::is_teacher)
        .ok_or_else(|| AppError::NotFound("Teacher not found".to_string()))?;
    if !teacher.is_available_teacher() {
        return Err(AppError::Conflict("Teacher is unavailable".to_string()));
    }

    let room = sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = $1")
        .bind(&payload.room_id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;
    if !room.is_free() {
        return Err(AppError::Conflict(format!(
            "Room is in {}",
            room.status.as_str()
        )));
    }

    let sequence = next_sequence(&pool, &payload.level_choice.makeup_code()).await?;
    let makeup = MakeupClass::new(
        payload.level_choice,
        sequence,
        attendance.id,
        teacher.id,
        room.id,
        payload.scheduled_date,
    );

    sqlx::query(
        "INSERT INTO makeup_classes (id, attendance_id, teacher_id, room_id, scheduled_date, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(&makeup.id)
    .bind(&makeup.attendance_id)
    .bind(&makeup.teacher_id)
    .bind(&makeup.room_id)
    .bind(makeup.scheduled_date)
    .bind(makeup.created_at)
    .bind(makeup.updated_at)
    .execute(&pool)
    .await?;

    Ok(Json(makeup))
}

pub async fn list_makeup_classes(
    State((pool, _config)): State<(PgPool, Config)>,
) -> Result<Json<Vec<MakeupClass>>, AppError> {
    let makeups = sqlx::query_as::<_, MakeupClass>(
        "SELECT * FROM makeup_classes ORDER BY scheduled_date DESC",
    )
    .fetch_all(&pool)
    .await?;
    Ok(Json(makeups))
}

pub async fn delete_makeup_class(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(makeup_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query("DELETE FROM makeup_classes WHERE id = $1")
        .bind(&makeup_id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Makeup class not found".to_string()));
    }
    Ok(Json(json!({ "message": "Makeup class deleted successfully" })))
}

async fn next_sequence(pool: &PgPool, code_prefix: &str) -> Result<u64, sqlx::Error> {
    let last: Option<(String,)> = sqlx::query_as(
        "SELECT id FROM makeup_classes WHERE id LIKE $1 ORDER BY LENGTH(id) DESC, id DESC LIMIT 1",
    )
    .bind(format!("{}-%", code_prefix))
    .fetch_optional(pool)
    .await?;

    Ok(last
        .and_then(|(id,)| {
            id.rsplit_once('-')
                .and_then(|(_, seq)| seq.parse::<u64>().ok())
        })
        .map(|n| n + 1)
        .unwrap_or(1))
}
