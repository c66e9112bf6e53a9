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
    models::employee::Employee,
    models::issue::{CreateIssue, Issue, UpdateIssue},
    utils::{ids::next_in_sequence, time::today_local},
};

const ISSUE_ID_PREFIX: &str = "ISS";

pub async fn create_issue(
    State((pool, config)): State<(PgPool, Config)>,
    Extension(teacher): Extension<Employee>,
    Json(payload): Json<CreateIssue>,
) -> Result<Json<Issue>, AppError> {
    payload.validate()?;

    let last_id = last_public_id(&pool).await?;
    let issue = Issue::new(
        next_in_sequence(ISSUE_ID_PREFIX, last_id.as_deref()),
        teacher.id,
        payload.issue_type,
        payload.description,
        payload.student_id,
        payload.room_id,
        today_local(&config.time_zone),
    );

    if !issue.target_is_consistent() {
        return Err(AppError::BadRequest(
            "Student Behavior issues target a student; Technical issues target a room".to_string(),
        ));
    }

    if let Some(student_id) = &issue.student_id {
        super::students::find_student(&pool, student_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;
    }
    if let Some(room_id) = &issue.room_id {
        let room: Option<(String,)> = sqlx::query_as("SELECT id FROM rooms WHERE id = $1")
            .bind(room_id)
            .fetch_optional(&pool)
            .await?;
        room.ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;
    }

    sqlx::query(
        "INSERT INTO issues (id, teacher_id, issue_type, description, status, student_id, room_id, \
         reported_date, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(&issue.id)
    .bind(&issue.teacher_id)
    .bind(issue.issue_type.as_str())
    .bind(&issue.description)
    .bind(issue.status.as_str())
    .bind(&issue.student_id)
    .bind(&issue.room_id)
    .bind(issue.reported_date)
    .bind(issue.created_at)
    .bind(issue.updated_at)
    .execute(&pool)
    .await?;

    Ok(Json(issue))
}

pub async fn my_issues(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(teacher): Extension<Employee>,
) -> Result<Json<Vec<Issue>>, AppError> {
    let issues = sqlx::query_as::<_, Issue>(
        "SELECT * FROM issues WHERE teacher_id = $1 ORDER BY reported_date DESC",
    )
    .bind(&teacher.id)
    .fetch_all(&pool)
    .await?;
    Ok(Json(issues))
}

pub async fn list_issues(
    State((pool, _config)): State<(PgPool, Config)>,
) -> Result<Json<Vec<Issue>>, AppError> {
    let issues = sqlx::query_as::<_, Issue>("SELECT * FROM issues ORDER BY reported_date DESC")
        .fetch_all(&pool)
        .await?;
    Ok(Json(issues))
}

pub async fn update_issue(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(issue_id): Path<String>,
    Json(payload): Json<UpdateIssue>,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query("UPDATE issues SET status = $1, updated_at = $2 WHERE id = $3")
        .bind(payload.status.as_str())
        .bind(Utc::now())
        .bind(&issue_id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Issue not found".to_string()));
    }
    Ok(Json(json!({ "message": "Issue updated successfully" })))
}

pub async fn delete_issue(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(issue_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query("DELETE FROM issues WHERE id = $1")
        .bind(&issue_id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Issue not found".to_string()));
    }
    Ok(Json(json!({ "message": "Issue deleted successfully" })))
}

async fn last_public_id(pool: &PgPool) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as(
        "SELECT id FROM issues WHERE id LIKE $1 ORDER BY LENGTH(id) DESC, id DESC LIMIT 1",
    )
    .bind(format!("{}%", ISSUE_ID_PREFIX))
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|(id,)| id))
}
