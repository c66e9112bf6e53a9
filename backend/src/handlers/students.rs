use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::student::{CreateStudent, Student, UpdateStudent},
    utils::ids::next_in_sequence,
};

const STUDENT_ID_PREFIX: &str = "STU";

pub async fn create_student(
    State((pool, _config)): State<(PgPool, Config)>,
    Json(payload): Json<CreateStudent>,
) -> Result<Json<Student>, AppError> {
    payload.validate()?;

    let last_id = last_public_id(&pool).await?;
    let student = Student::new(
        next_in_sequence(STUDENT_ID_PREFIX, last_id.as_deref()),
        payload.full_name,
        payload.contact_info,
        payload.date_of_birth,
    );

    sqlx::query(
        "INSERT INTO students (id, full_name, contact_info, date_of_birth, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(&student.id)
    .bind(&student.full_name)
    .bind(&student.contact_info)
    .bind(student.date_of_birth)
    .bind(student.created_at)
    .bind(student.updated_at)
    .execute(&pool)
    .await?;

    Ok(Json(student))
}

pub async fn list_students(
    State((pool, _config)): State<(PgPool, Config)>,
) -> Result<Json<Vec<Student>>, AppError> {
    let students = sqlx::query_as::<_, Student>(
        "SELECT id, full_name, contact_info, date_of_birth, created_at, updated_at \
         FROM students ORDER BY id",
    )
    .fetch_all(&pool)
    .await?;
    Ok(Json(students))
}

pub async fn get_student(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(student_id): Path<String>,
) -> Result<Json<Student>, AppError> {
    let student = find_student(&pool, &student_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;
    Ok(Json(student))
}

pub async fn update_student(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(student_id): Path<String>,
    Json(payload): Json<UpdateStudent>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;
    let student = find_student(&pool, &student_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

    sqlx::query(
        "UPDATE students SET full_name = $1, contact_info = $2, date_of_birth = $3, updated_at = $4 \
         WHERE id = $5",
    )
    .bind(payload.full_name.as_ref().unwrap_or(&student.full_name))
    .bind(payload.contact_info.as_ref().unwrap_or(&student.contact_info))
    .bind(payload.date_of_birth.or(student.date_of_birth))
    .bind(Utc::now())
    .bind(&student.id)
    .execute(&pool)
    .await?;

    Ok(Json(json!({ "message": "Student updated successfully" })))
}

pub async fn delete_student(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(student_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query("DELETE FROM students WHERE id = $1")
        .bind(&student_id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Student not found".to_string()));
    }
    Ok(Json(json!({ "message": "Student deleted successfully" })))
}

pub(crate) async fn find_student(
    pool: &PgPool,
    student_id: &str,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        "SELECT id, full_name, contact_info, date_of_birth, created_at, updated_at \
         FROM students WHERE id = $1",
    )
    .bind(student_id)
    .fetch_optional(pool)
    .await
}

async fn last_public_id(pool: &PgPool) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> = sqlx::query_as(
        "SELECT id FROM students WHERE id LIKE $1 ORDER BY LENGTH(id) DESC, id DESC LIMIT 1",
    )
    .bind(format!("{}%", STUDENT_ID_PREFIX))
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|(id,)| id))
}
