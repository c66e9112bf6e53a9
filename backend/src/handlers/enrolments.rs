use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use sqlx::PgPool;

use crate::{
    config::Config,
    error::AppError,
    models::employee::Employee,
    models::enrolment::{CreateEnrolment, Enrolment},
    utils::time::today_local,
};

pub async fn create_enrolment(
    State((pool, config)): State<(PgPool, Config)>,
    Extension(advisor): Extension<Employee>,
    Json(payload): Json<CreateEnrolment>,
) -> Result<Json<Enrolment>, AppError> {
    let contract =
        super::contracts::find_contract_for_advisor(&pool, &payload.contract_id, &advisor.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contract not found".to_string()))?;

    let existing: Option<(String,)> =
        sqlx::query_as("SELECT id FROM enrolments WHERE contract_id = $1")
            .bind(&contract.id)
            .fetch_optional(&pool)
            .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "This contract is already enrolled".to_string(),
        ));
    }

    let enrolment = Enrolment::new(
        contract.id.clone(),
        contract.student_id.clone(),
        contract.course_id.clone(),
        payload
            .enrolment_date
            .unwrap_or_else(|| today_local(&config.time_zone)),
    );

    sqlx::query(
        "INSERT INTO enrolments (id, contract_id, student_id, course_id, enrolment_date, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(&enrolment.id)
    .bind(&enrolment.contract_id)
    .bind(&enrolment.student_id)
    .bind(&enrolment.course_id)
    .bind(enrolment.enrolment_date)
    .bind(enrolment.created_at)
    .bind(enrolment.updated_at)
    .execute(&pool)
    .await?;

    Ok(Json(enrolment))
}

pub async fn list_enrolments(
    State((pool, _config)): State<(PgPool, Config)>,
) -> Result<Json<Vec<Enrolment>>, AppError> {
    let enrolments =
        sqlx::query_as::<_, Enrolment>("SELECT * FROM enrolments ORDER BY enrolment_date DESC")
            .fetch_all(&pool)
            .await?;
    Ok(Json(enrolments))
}

pub async fn delete_enrolment(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(advisor): Extension<Employee>,
    Path(enrolment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    // Only the advisor owning the underlying contract may unenrol it.
    let result = sqlx::query(
        "DELETE FROM enrolments WHERE id = $1 AND contract_id IN \
         (SELECT id FROM contracts WHERE employee_id = $2)",
    )
    .bind(&enrolment_id)
    .bind(&advisor.id)
    .execute(&pool)
    .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Enrolment not found".to_string()));
    }
    Ok(Json(json!({ "message": "Enrolment deleted successfully" })))
}
