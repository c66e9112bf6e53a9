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
    models::employee::{Employee, TeacherStatus},
    models::leave_request::{CreateLeaveRequest, LeaveRequest, LeaveStatus, UpdateLeaveRequest},
};

pub async fn create_leave_request(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(teacher): Extension<Employee>,
    Json(payload): Json<CreateLeaveRequest>,
) -> Result<Json<LeaveRequest>, AppError> {
    payload.validate()?;
    if payload.end_date <= payload.start_date {
        return Err(AppError::BadRequest(
            "End date must be after start date".to_string(),
        ));
    }
    validate_substitute(&pool, &payload.substitute_id, &teacher.id).await?;

    let duplicate: Option<(String,)> = sqlx::query_as(
        "SELECT id FROM leave_requests WHERE employee_id = $1 AND start_date = $2 AND end_date = $3",
    )
    .bind(&teacher.id)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .fetch_optional(&pool)
    .await?;
    if duplicate.is_some() {
        return Err(AppError::Conflict(
            "Leave request already exists for this window".to_string(),
        ));
    }

    let request = LeaveRequest::new(
        teacher.id,
        payload.substitute_id,
        payload.start_date,
        payload.end_date,
        payload.reason,
    );

    sqlx::query(
        "INSERT INTO leave_requests (id, employee_id, substitute_id, start_date, end_date, reason, \
         status, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(&request.id)
    .bind(&request.employee_id)
    .bind(&request.substitute_id)
    .bind(request.start_date)
    .bind(request.end_date)
    .bind(&request.reason)
    .bind(request.status.as_str())
    .bind(request.created_at)
    .bind(request.updated_at)
    .execute(&pool)
    .await?;

    Ok(Json(request))
}

pub async fn my_leave_requests(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(teacher): Extension<Employee>,
) -> Result<Json<Vec<LeaveRequest>>, AppError> {
    let requests = sqlx::query_as::<_, LeaveRequest>(
        "SELECT * FROM leave_requests WHERE employee_id = $1 ORDER BY created_at DESC",
    )
    .bind(&teacher.id)
    .fetch_all(&pool)
    .await?;
    Ok(Json(requests))
}

pub async fn get_leave_request(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(caller): Extension<Employee>,
    Path(request_id): Path<String>,
) -> Result<Json<LeaveRequest>, AppError> {
    let request = find_request(&pool, &request_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Leave request not found".to_string()))?;

    // Teachers only see their own requests; managers see everything.
    if caller.is_teacher() && request.employee_id != caller.id {
        return Err(AppError::NotFound("Leave request not found".to_string()));
    }

    Ok(Json(request))
}

pub async fn update_leave_request(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(teacher): Extension<Employee>,
    Path(request_id): Path<String>,
    Json(payload): Json<UpdateLeaveRequest>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;

    let request = find_request(&pool, &request_id)
        .await?
        .filter(|r| r.employee_id == teacher.id)
        .ok_or_else(|| AppError::NotFound("Leave request not found".to_string()))?;

    if !request.is_pending() {
        return Err(AppError::Forbidden(
            "Leave request cannot be updated after approval".to_string(),
        ));
    }

    let substitute_id = payload
        .substitute_id
        .unwrap_or_else(|| request.substitute_id.clone());
    if substitute_id != request.substitute_id {
        validate_substitute(&pool, &substitute_id, &teacher.id).await?;
    }
    let start_date = payload.start_date.unwrap_or(request.start_date);
    let end_date = payload.end_date.unwrap_or(request.end_date);
    if end_date <= start_date {
        return Err(AppError::BadRequest(
            "End date must be after start date".to_string(),
        ));
    }

    sqlx::query(
        "UPDATE leave_requests SET substitute_id = $1, start_date = $2, end_date = $3, reason = $4, \
         updated_at = $5 WHERE id = $6",
    )
    .bind(&substitute_id)
    .bind(start_date)
    .bind(end_date)
    .bind(payload.reason.as_ref().unwrap_or(&request.reason))
    .bind(Utc::now())
    .bind(&request.id)
    .execute(&pool)
    .await?;

    Ok(Json(json!({ "message": "Leave request updated successfully" })))
}

pub async fn list_leave_requests(
    State((pool, _config)): State<(PgPool, Config)>,
) -> Result<Json<Vec<LeaveRequest>>, AppError> {
    let requests =
        sqlx::query_as::<_, LeaveRequest>("SELECT * FROM leave_requests ORDER BY created_at DESC")
            .fetch_all(&pool)
            .await?;
    Ok(Json(requests))
}

pub async fn approve_leave_request(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(request_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let request = find_request(&pool, &request_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Leave request not found".to_string()))?;

    if !request.is_pending() {
        return Err(AppError::Conflict(
            "Leave request has already been approved".to_string(),
        ));
    }

    // Approval flips the teacher to Unavailable for the leave window.
    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE leave_requests SET status = $1, updated_at = $2 WHERE id = $3")
        .bind(LeaveStatus::Approved.as_str())
        .bind(Utc::now())
        .bind(&request.id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("UPDATE employees SET teacher_status = $1, updated_at = $2 WHERE id = $3")
        .bind(TeacherStatus::Unavailable.as_str())
        .bind(Utc::now())
        .bind(&request.employee_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!(
        request_id = %request.id,
        employee_id = %request.employee_id,
        substitute_id = %request.substitute_id,
        "leave request approved"
    );
    Ok(Json(json!({ "message": "Leave request approved" })))
}

async fn validate_substitute(
    pool: &PgPool,
    substitute_id: &str,
    requester_id: &str,
) -> Result<(), AppError> {
    if substitute_id == requester_id {
        return Err(AppError::BadRequest(
            "Substitute must be a different employee".to_string(),
        ));
    }
    auth_repo::find_employee_by_id(pool, substitute_id)
        .await?
        .filter(Employee::is_teacher)
        .ok_or_else(|| AppError::NotFound("Substitute not found or not a Teacher".to_string()))?;
    Ok(())
}

async fn find_request(
    pool: &PgPool,
    request_id: &str,
) -> Result<Option<LeaveRequest>, sqlx::Error> {
    sqlx::query_as::<_, LeaveRequest>("SELECT * FROM leave_requests WHERE id = $1")
        .bind(request_id)
        .fetch_optional(pool)
        .await
}
