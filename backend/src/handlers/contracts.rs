use axum::{
    extract::{Extension, Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::contract::{Contract, CreateContract, UpdateContract},
    models::employee::Employee,
};

pub async fn create_contract(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(advisor): Extension<Employee>,
    Json(payload): Json<CreateContract>,
) -> Result<Json<Contract>, AppError> {
    payload.validate()?;
    if payload.end_date <= payload.start_date {
        return Err(AppError::BadRequest(
            "End date must be after start date".to_string(),
        ));
    }

    super::students::find_student(&pool, &payload.student_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

    super::courses::find_course_for_advisor(&pool, &payload.course_id, &advisor.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    ensure_no_existing_contract(&pool, &payload.student_id, &payload.course_id, None).await?;

    let contract = Contract::new(
        payload.student_id,
        advisor.id,
        payload.course_id,
        payload.tuition_fee,
        payload.start_date,
        payload.end_date,
    );

    sqlx::query(
        "INSERT INTO contracts (id, student_id, employee_id, course_id, tuition_fee, payment_status, \
         start_date, end_date, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(&contract.id)
    .bind(&contract.student_id)
    .bind(&contract.employee_id)
    .bind(&contract.course_id)
    .bind(contract.tuition_fee)
    .bind(contract.payment_status.as_str())
    .bind(contract.start_date)
    .bind(contract.end_date)
    .bind(contract.created_at)
    .bind(contract.updated_at)
    .execute(&pool)
    .await?;

    Ok(Json(contract))
}

pub async fn list_my_contracts(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(advisor): Extension<Employee>,
) -> Result<Json<Vec<Contract>>, AppError> {
    let contracts = sqlx::query_as::<_, Contract>(
        "SELECT * FROM contracts WHERE employee_id = $1 ORDER BY created_at DESC",
    )
    .bind(&advisor.id)
    .fetch_all(&pool)
    .await?;
    Ok(Json(contracts))
}

pub async fn get_my_contract(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(advisor): Extension<Employee>,
    Path(contract_id): Path<String>,
) -> Result<Json<Contract>, AppError> {
    let contract = find_contract_for_advisor(&pool, &contract_id, &advisor.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Contract not found".to_string()))?;
    Ok(Json(contract))
}

pub async fn update_contract(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(advisor): Extension<Employee>,
    Path(contract_id): Path<String>,
    Json(payload): Json<UpdateContract>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;

    let contract = find_contract_for_advisor(&pool, &contract_id, &advisor.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Contract not found".to_string()))?;

    let student_id = payload.student_id.unwrap_or_else(|| contract.student_id.clone());
    let course_id = payload.course_id.unwrap_or_else(|| contract.course_id.clone());
    let start_date = payload.start_date.unwrap_or(contract.start_date);
    let end_date = payload.end_date.unwrap_or(contract.end_date);
    if end_date <= start_date {
        return Err(AppError::BadRequest(
            "End date must be after start date".to_string(),
        ));
    }

    if student_id != contract.student_id {
        super::students::find_student(&pool, &student_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;
    }
    if course_id != contract.course_id {
        super::courses::find_course_for_advisor(&pool, &course_id, &advisor.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;
    }
    if student_id != contract.student_id || course_id != contract.course_id {
        ensure_no_existing_contract(&pool, &student_id, &course_id, Some(&contract.id)).await?;
    }

    sqlx::query(
        "UPDATE contracts SET student_id = $1, course_id = $2, tuition_fee = $3, payment_status = $4, \
         start_date = $5, end_date = $6, updated_at = $7 WHERE id = $8",
    )
    .bind(&student_id)
    .bind(&course_id)
    .bind(payload.tuition_fee.unwrap_or(contract.tuition_fee))
    .bind(
        payload
            .payment_status
            .unwrap_or(contract.payment_status)
            .as_str(),
    )
    .bind(start_date)
    .bind(end_date)
    .bind(Utc::now())
    .bind(&contract.id)
    .execute(&pool)
    .await?;

    Ok(Json(json!({ "message": "Contract updated successfully" })))
}

pub async fn delete_contract(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(advisor): Extension<Employee>,
    Path(contract_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query("DELETE FROM contracts WHERE id = $1 AND employee_id = $2")
        .bind(&contract_id)
        .bind(&advisor.id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Contract not found".to_string()));
    }
    Ok(Json(json!({ "message": "Contract deleted successfully" })))
}

pub async fn list_all_contracts(
    State((pool, _config)): State<(PgPool, Config)>,
) -> Result<Json<Vec<Contract>>, AppError> {
    let contracts =
        sqlx::query_as::<_, Contract>("SELECT * FROM contracts ORDER BY created_at DESC")
            .fetch_all(&pool)
            .await?;
    Ok(Json(contracts))
}

pub async fn get_any_contract(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(contract_id): Path<String>,
) -> Result<Json<Contract>, AppError> {
    let contract = sqlx::query_as::<_, Contract>("SELECT * FROM contracts WHERE id = $1")
        .bind(&contract_id)
        .fetch_optional(&pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Contract not found".to_string()))?;
    Ok(Json(contract))
}

async fn ensure_no_existing_contract(
    pool: &PgPool,
    student_id: &str,
    course_id: &str,
    exclude_id: Option<&str>,
) -> Result<(), AppError> {
    let existing: Option<(String,)> = sqlx::query_as(
        "SELECT id FROM contracts WHERE student_id = $1 AND course_id = $2",
    )
    .bind(student_id)
    .bind(course_id)
    .fetch_optional(pool)
    .await?;

    match existing {
        Some((id,)) if Some(id.as_str()) != exclude_id => Err(AppError::Conflict(
            "A contract for this student and course already exists".to_string(),
        )),
        _ => Ok(()),
    }
}

pub(crate) async fn find_contract_for_advisor(
    pool: &PgPool,
    contract_id: &str,
    advisor_id: &str,
) -> Result<Option<Contract>, sqlx::Error> {
    sqlx::query_as::<_, Contract>(
        "SELECT * FROM contracts WHERE id = $1 AND employee_id = $2",
    )
    .bind(contract_id)
    .bind(advisor_id)
    .fetch_optional(pool)
    .await
}
