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
    handlers::auth_repo,
    models::account::Account,
    models::employee::{
        CreateEmployee, Employee, EmployeeResponse, EmployeeRole, UpdateEmployee,
    },
    utils::{ids::next_in_sequence, password::hash_password},
};

const EMPLOYEE_ID_PREFIX: &str = "EM";

pub async fn get_profile(
    Extension(employee): Extension<Employee>,
) -> Result<Json<EmployeeResponse>, AppError> {
    Ok(Json(EmployeeResponse::from(employee)))
}

pub async fn update_profile(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(employee): Extension<Employee>,
    Json(payload): Json<UpdateEmployee>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;
    if payload.role.is_some() {
        return Err(AppError::Forbidden(
            "Employees cannot change their own role".to_string(),
        ));
    }
    if payload.teacher_status.is_some() && !employee.is_teacher() {
        return Err(AppError::BadRequest(
            "Only teachers carry an availability status".to_string(),
        ));
    }

    apply_update(&pool, &employee, &payload).await?;
    Ok(Json(json!({ "message": "Employee updated successfully" })))
}

pub async fn create_employee(
    State((pool, _config)): State<(PgPool, Config)>,
    Json(payload): Json<CreateEmployee>,
) -> Result<Json<EmployeeResponse>, AppError> {
    payload.validate()?;

    // Managers are provisioned out of band, never through the API.
    if payload.role == EmployeeRole::Manager {
        return Err(AppError::Forbidden(
            "Permission denied for adding Manager".to_string(),
        ));
    }

    if auth_repo::find_account_by_username(&pool, &payload.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Username already exists".to_string()));
    }

    let last_id = last_public_id(&pool).await?;
    let employee = Employee::new(
        next_in_sequence(EMPLOYEE_ID_PREFIX, last_id.as_deref()),
        payload.full_name,
        payload.email,
        payload.phone_number,
        payload.role,
    );

    let password_hash = hash_password(&payload.password).map_err(AppError::InternalServerError)?;
    let account = Account::new(employee.id.clone(), payload.username, password_hash);

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO employees (id, full_name, email, phone_number, role, teacher_status, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(&employee.id)
    .bind(&employee.full_name)
    .bind(&employee.email)
    .bind(&employee.phone_number)
    .bind(employee.role.as_str())
    .bind(employee.teacher_status.map(|s| s.as_str()))
    .bind(employee.created_at)
    .bind(employee.updated_at)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        "INSERT INTO accounts (id, employee_id, username, password_hash, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(&account.id)
    .bind(&account.employee_id)
    .bind(&account.username)
    .bind(&account.password_hash)
    .bind(account.created_at)
    .bind(account.updated_at)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    tracing::info!(employee_id = %employee.id, role = %employee.role.as_str(), "employee created");
    Ok(Json(EmployeeResponse::from(employee)))
}

pub async fn list_employees(
    State((pool, _config)): State<(PgPool, Config)>,
) -> Result<Json<Vec<EmployeeResponse>>, AppError> {
    let employees = sqlx::query_as::<_, Employee>(
        "SELECT id, full_name, email, phone_number, role, teacher_status, created_at, updated_at \
         FROM employees ORDER BY id",
    )
    .fetch_all(&pool)
    .await?;
    Ok(Json(employees.into_iter().map(EmployeeResponse::from).collect()))
}

pub async fn get_employee(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(employee_id): Path<String>,
) -> Result<Json<EmployeeResponse>, AppError> {
    let employee = auth_repo::find_employee_by_id(&pool, &employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;
    Ok(Json(EmployeeResponse::from(employee)))
}

pub async fn update_employee(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(employee_id): Path<String>,
    Json(payload): Json<UpdateEmployee>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;
    let employee = auth_repo::find_employee_by_id(&pool, &employee_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

    if payload.role.is_some() {
        return Err(AppError::Forbidden(
            "Roles are fixed once an employee is created".to_string(),
        ));
    }
    if payload.teacher_status.is_some() && !employee.is_teacher() {
        return Err(AppError::BadRequest(
            "Only teachers carry an availability status".to_string(),
        ));
    }

    apply_update(&pool, &employee, &payload).await?;
    Ok(Json(json!({ "message": "Employee updated successfully" })))
}

pub async fn delete_employee(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(caller): Extension<Employee>,
    Path(employee_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    if caller.id == employee_id {
        return Err(AppError::BadRequest(
            "Managers cannot delete themselves".to_string(),
        ));
    }

    let result = sqlx::query("DELETE FROM employees WHERE id = $1")
        .bind(&employee_id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Employee not found".to_string()));
    }

    tracing::info!(employee_id = %employee_id, "employee deleted");
    Ok(Json(json!({ "message": "Employee deleted successfully" })))
}

async fn apply_update(
    pool: &PgPool,
    employee: &Employee,
    payload: &UpdateEmployee,
) -> Result<(), AppError> {
    // Partial update: unsupplied fields keep their current value.
    sqlx::query(
        "UPDATE employees SET full_name = $1, email = $2, phone_number = $3, teacher_status = $4, updated_at = $5 \
         WHERE id = $6",
    )
    .bind(payload.full_name.as_ref().unwrap_or(&employee.full_name))
    .bind(payload.email.as_ref().unwrap_or(&employee.email))
    .bind(payload.phone_number.as_ref().or(employee.phone_number.as_ref()))
    .bind(
        payload
            .teacher_status
            .or(employee.teacher_status)
            .map(|s| s.as_str()),
    )
    .bind(Utc::now())
    .bind(&employee.id)
    .execute(pool)
    .await?;
    Ok(())
}

async fn last_public_id(pool: &PgPool) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as(
        "SELECT id FROM employees WHERE id LIKE $1 ORDER BY LENGTH(id) DESC, id DESC LIMIT 1",
    )
    .bind(format!("{}%", EMPLOYEE_ID_PREFIX))
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|(id,)| id))
}
