use axum::{
    extract::{Extension, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::PgPool;

use crate::{
    config::Config,
    error::AppError,
    models::attendance::{CreateAttendance, MarkAttendance, StudentAttendance},
    models::class_session::ClassSession,
    models::employee::Employee,
};

pub async fn create_attendance(
    State((pool, _config)): State<(PgPool, Config)>,
    Json(payload): Json<CreateAttendance>,
) -> Result<Json<StudentAttendance>, AppError> {
    let session = sqlx::query_as::<_, ClassSession>("SELECT * FROM class_sessions WHERE id = $1")
        .bind(&payload.session_id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Class session not found".to_string()))?;

    super::students::find_student(&pool, &payload.student_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

    let enrolment: Option<(String,)> = sqlx::query_as(
        "SELECT id FROM enrolments WHERE student_id = $1 AND course_id = $2",
    )
    .bind(&payload.student_id)
    .bind(&session.course_id)
    .fetch_optional(&pool)
    .await?;
    let (enrolment_id,) =
        enrolment.ok_or_else(|| AppError::NotFound("Enrolment not found".to_string()))?;

    let duplicate: Option<(String,)> = sqlx::query_as(
        "SELECT id FROM student_attendance WHERE student_id = $1 AND session_id = $2",
    )
    .bind(&payload.student_id)
    .bind(&session.id)
    .fetch_optional(&pool)
    .await?;
    if duplicate.is_some() {
        return Err(AppError::Conflict(
            "Attendance row already exists for this student and session".to_string(),
        ));
    }

    let row = StudentAttendance::new(payload.student_id, session.id, enrolment_id);
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
    .execute(&pool)
    .await?;

    Ok(Json(row))
}

pub async fn delete_attendance(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(attendance_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query("DELETE FROM student_attendance WHERE id = $1")
        .bind(&attendance_id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Attendance row not found".to_string()));
    }
    Ok(Json(json!({ "message": "Attendance row deleted successfully" })))
}

pub async fn mark_attendance(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(teacher): Extension<Employee>,
    Path(attendance_id): Path<String>,
    Json(payload): Json<MarkAttendance>,
) -> Result<Json<Value>, AppError> {
    let row = sqlx::query_as::<_, StudentAttendance>(
        "SELECT * FROM student_attendance WHERE id = $1",
    )
    .bind(&attendance_id)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Attendance row not found".to_string()))?;

    let session = sqlx::query_as::<_, ClassSession>("SELECT * FROM class_sessions WHERE id = $1")
        .bind(&row.session_id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Class session not found".to_string()))?;

    if session.teacher_id != teacher.id {
        return Err(AppError::Forbidden(
            "Only the session's teacher can mark attendance".to_string(),
        ));
    }

    sqlx::query("UPDATE student_attendance SET status = $1, updated_at = $2 WHERE id = $3")
        .bind(payload.status.as_str())
        .bind(Utc::now())
        .bind(&row.id)
        .execute(&pool)
        .await?;

    Ok(Json(json!({ "message": "Attendance updated successfully" })))
}

pub async fn session_attendance(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<StudentAttendance>>, AppError> {
    let rows = sqlx::query_as::<_, StudentAttendance>(
        "SELECT * FROM student_attendance WHERE session_id = $1 ORDER BY student_id",
    )
    .bind(&session_id)
    .fetch_all(&pool)
    .await?;
    Ok(Json(rows))
}

#[derive(Debug, sqlx::FromRow)]
struct AttendanceExportRow {
    student_id: String,
    student_name: String,
    course_code: String,
    session_date: chrono::NaiveDateTime,
    term: i32,
    status: String,
}

pub async fn export_attendance(
    State((pool, _config)): State<(PgPool, Config)>,
) -> Result<Response, AppError> {
    let rows = sqlx::query_as::<_, AttendanceExportRow>(
        "SELECT a.student_id, s.full_name AS student_name, c.code AS course_code, \
         cs.session_date, cs.term, a.status \
         FROM student_attendance a \
         JOIN students s ON s.id = a.student_id \
         JOIN class_sessions cs ON cs.id = a.session_id \
         JOIN courses c ON c.id = cs.course_id \
         ORDER BY cs.session_date, a.student_id",
    )
    .fetch_all(&pool)
    .await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["student_id", "student_name", "course_code", "session_date", "term", "status"])
        .map_err(|e| AppError::InternalServerError(e.into()))?;
    for row in rows {
        writer
            .write_record([
                row.student_id.as_str(),
                row.student_name.as_str(),
                row.course_code.as_str(),
                &row.session_date.format("%Y-%m-%d %H:%M").to_string(),
                &row.term.to_string(),
                row.status.as_str(),
            ])
            .map_err(|e| AppError::InternalServerError(e.into()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::InternalServerError(anyhow::anyhow!("csv flush failed: {}", e)))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"attendance.csv\"",
            ),
        ],
        bytes,
    )
        .into_response())
}
