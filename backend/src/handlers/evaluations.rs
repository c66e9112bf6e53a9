use axum::{
    extract::{Extension, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::employee::Employee,
    models::evaluation::{CreateEvaluation, Evaluation, UpdateEvaluation},
    utils::time::today_local,
};

pub async fn create_evaluation(
    State((pool, config)): State<(PgPool, Config)>,
    Extension(teacher): Extension<Employee>,
    Json(payload): Json<CreateEvaluation>,
) -> Result<Json<Evaluation>, AppError> {
    payload.validate()?;

    let enrolment: Option<(String,)> = sqlx::query_as(
        "SELECT id FROM enrolments WHERE student_id = $1 AND course_id = $2",
    )
    .bind(&payload.student_id)
    .bind(&payload.course_id)
    .fetch_optional(&pool)
    .await?;
    let (enrolment_id,) =
        enrolment.ok_or_else(|| AppError::NotFound("Enrolment not found".to_string()))?;

    let duplicate: Option<(String,)> = sqlx::query_as(
        "SELECT id FROM evaluations WHERE student_id = $1 AND course_id = $2 AND assessment = $3",
    )
    .bind(&payload.student_id)
    .bind(&payload.course_id)
    .bind(payload.assessment.as_str())
    .fetch_optional(&pool)
    .await?;
    if duplicate.is_some() {
        return Err(AppError::Conflict(
            "This assessment has already been graded for the student".to_string(),
        ));
    }

    let evaluation = Evaluation::new(
        payload.student_id,
        payload.course_id,
        enrolment_id,
        teacher.id,
        payload.assessment,
        payload.grade,
        payload.comment,
        payload
            .evaluated_on
            .unwrap_or_else(|| today_local(&config.time_zone)),
    );

    sqlx::query(
        "INSERT INTO evaluations (id, student_id, course_id, enrolment_id, teacher_id, assessment, \
         grade, comment, evaluated_on, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(&evaluation.id)
    .bind(&evaluation.student_id)
    .bind(&evaluation.course_id)
    .bind(&evaluation.enrolment_id)
    .bind(&evaluation.teacher_id)
    .bind(evaluation.assessment.as_str())
    .bind(&evaluation.grade)
    .bind(&evaluation.comment)
    .bind(evaluation.evaluated_on)
    .bind(evaluation.created_at)
    .bind(evaluation.updated_at)
    .execute(&pool)
    .await?;

    Ok(Json(evaluation))
}

pub async fn update_evaluation(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(teacher): Extension<Employee>,
    Path(evaluation_id): Path<String>,
    Json(payload): Json<UpdateEvaluation>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;

    let evaluation = sqlx::query_as::<_, Evaluation>("SELECT * FROM evaluations WHERE id = $1")
        .bind(&evaluation_id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Evaluation not found".to_string()))?;

    if evaluation.teacher_id != teacher.id {
        return Err(AppError::Forbidden(
            "Only the grading teacher can amend an evaluation".to_string(),
        ));
    }

    sqlx::query("UPDATE evaluations SET grade = $1, comment = $2, updated_at = $3 WHERE id = $4")
        .bind(payload.grade.as_ref().unwrap_or(&evaluation.grade))
        .bind(payload.comment.as_ref().unwrap_or(&evaluation.comment))
        .bind(Utc::now())
        .bind(&evaluation.id)
        .execute(&pool)
        .await?;

    Ok(Json(json!({ "message": "Evaluation updated successfully" })))
}

pub async fn student_evaluations(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(student_id): Path<String>,
) -> Result<Json<Vec<Evaluation>>, AppError> {
    let evaluations = sqlx::query_as::<_, Evaluation>(
        "SELECT * FROM evaluations WHERE student_id = $1 ORDER BY evaluated_on",
    )
    .bind(&student_id)
    .fetch_all(&pool)
    .await?;
    Ok(Json(evaluations))
}

#[derive(Debug, sqlx::FromRow)]
struct EvaluationExportRow {
    student_id: String,
    student_name: String,
    course_code: String,
    assessment: String,
    grade: String,
    evaluated_on: chrono::NaiveDate,
}

/// Flat report-card export, one row per graded assessment.
pub async fn export_evaluations(
    State((pool, _config)): State<(PgPool, Config)>,
) -> Result<Response, AppError> {
    let rows = sqlx::query_as::<_, EvaluationExportRow>(
        "SELECT e.student_id, s.full_name AS student_name, c.code AS course_code, \
         e.assessment, e.grade, e.evaluated_on \
         FROM evaluations e \
         JOIN students s ON s.id = e.student_id \
         JOIN courses c ON c.id = e.course_id \
         ORDER BY e.student_id, e.evaluated_on",
    )
    .fetch_all(&pool)
    .await?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(["student_id", "student_name", "course_code", "assessment", "grade", "evaluated_on"])
        .map_err(|e| AppError::InternalServerError(e.into()))?;
    for row in rows {
        writer
            .write_record([
                row.student_id.as_str(),
                row.student_name.as_str(),
                row.course_code.as_str(),
                row.assessment.as_str(),
                row.grade.as_str(),
                &row.evaluated_on.to_string(),
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
                "attachment; filename=\"evaluations.csv\"",
            ),
        ],
        bytes,
    )
        .into_response())
}
