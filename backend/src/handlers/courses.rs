use axum::{
    extract::{Extension, Path, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};
use sqlx::PgPool;
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::course::{Course, CreateCourse, UpdateCourse},
    models::employee::Employee,
};

/// Earliest date the catalog accepts for a course offering.
const CATALOG_EPOCH: (i32, u32, u32) = (2025, 1, 1);

pub async fn create_course(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(advisor): Extension<Employee>,
    Json(payload): Json<CreateCourse>,
) -> Result<Json<Course>, AppError> {
    payload.validate()?;
    validate_dates(payload.created_date, payload.start_date)?;

    let duplicate: Option<(String,)> =
        sqlx::query_as("SELECT id FROM courses WHERE code = $1 AND created_date = $2")
            .bind(payload.name.code())
            .bind(payload.created_date)
            .fetch_optional(&pool)
            .await?;
    if duplicate.is_some() {
        return Err(AppError::Conflict(
            "A course offering with this code and date already exists".to_string(),
        ));
    }

    let course = Course::new(
        payload.name,
        payload.duration_months,
        payload.start_date,
        payload.schedule,
        advisor.id,
        payload.fee,
        payload.prerequisites,
        payload.description,
        payload.created_date,
    );

    sqlx::query(
        "INSERT INTO courses (id, code, name, duration_months, start_date, end_date, schedule, \
         learning_advisor_id, fee, prerequisites, description, created_date, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
    )
    .bind(&course.id)
    .bind(&course.code)
    .bind(course.name.name())
    .bind(course.duration_months)
    .bind(course.start_date)
    .bind(course.end_date)
    .bind(&course.schedule)
    .bind(&course.learning_advisor_id)
    .bind(course.fee)
    .bind(&course.prerequisites)
    .bind(&course.description)
    .bind(course.created_date)
    .bind(course.created_at)
    .bind(course.updated_at)
    .execute(&pool)
    .await?;

    Ok(Json(course))
}

pub async fn list_my_courses(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(advisor): Extension<Employee>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = sqlx::query_as::<_, Course>(
        "SELECT * FROM courses WHERE learning_advisor_id = $1 ORDER BY created_date DESC",
    )
    .bind(&advisor.id)
    .fetch_all(&pool)
    .await?;
    Ok(Json(courses))
}

pub async fn get_my_course(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(advisor): Extension<Employee>,
    Path(course_id): Path<String>,
) -> Result<Json<Course>, AppError> {
    let course = find_course_for_advisor(&pool, &course_id, &advisor.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;
    Ok(Json(course))
}

pub async fn update_course(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(advisor): Extension<Employee>,
    Path(course_id): Path<String>,
    Json(payload): Json<UpdateCourse>,
) -> Result<Json<Value>, AppError> {
    payload.validate()?;
    if payload.learning_advisor_id.is_some() {
        return Err(AppError::Forbidden(
            "Courses cannot be reassigned to another advisor".to_string(),
        ));
    }

    let course = find_course_for_advisor(&pool, &course_id, &advisor.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    let duration = payload.duration_months.unwrap_or(course.duration_months);
    let start_date = payload.start_date.unwrap_or(course.start_date);
    validate_dates(course.created_date, start_date)?;
    let end_date = Course::end_date_for(start_date, duration);

    sqlx::query(
        "UPDATE courses SET duration_months = $1, start_date = $2, end_date = $3, schedule = $4, \
         fee = $5, prerequisites = $6, description = $7, updated_at = $8 WHERE id = $9",
    )
    .bind(duration)
    .bind(start_date)
    .bind(end_date)
    .bind(payload.schedule.as_ref().unwrap_or(&course.schedule))
    .bind(payload.fee.unwrap_or(course.fee))
    .bind(payload.prerequisites.as_ref().unwrap_or(&course.prerequisites))
    .bind(payload.description.as_ref().or(course.description.as_ref()))
    .bind(Utc::now())
    .bind(&course.id)
    .execute(&pool)
    .await?;

    Ok(Json(json!({ "message": "Course updated successfully" })))
}

pub async fn delete_course(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(advisor): Extension<Employee>,
    Path(course_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query("DELETE FROM courses WHERE id = $1 AND learning_advisor_id = $2")
        .bind(&course_id)
        .bind(&advisor.id)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Course not found".to_string()));
    }
    Ok(Json(json!({ "message": "Course deleted successfully" })))
}

pub async fn list_all_courses(
    State((pool, _config)): State<(PgPool, Config)>,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses =
        sqlx::query_as::<_, Course>("SELECT * FROM courses ORDER BY created_date DESC, code")
            .fetch_all(&pool)
            .await?;
    Ok(Json(courses))
}

pub async fn get_any_course(
    State((pool, _config)): State<(PgPool, Config)>,
    Path(course_id): Path<String>,
) -> Result<Json<Course>, AppError> {
    let course = find_course(&pool, &course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;
    Ok(Json(course))
}

fn validate_dates(created_date: NaiveDate, start_date: NaiveDate) -> Result<(), AppError> {
    let epoch = NaiveDate::from_ymd_opt(CATALOG_EPOCH.0, CATALOG_EPOCH.1, CATALOG_EPOCH.2)
        .expect("valid catalog epoch");
    if created_date < epoch {
        return Err(AppError::BadRequest(format!(
            "Created date must not precede {}",
            epoch
        )));
    }
    if start_date < created_date {
        return Err(AppError::BadRequest(
            "Start date must not precede the created date".to_string(),
        ));
    }
    Ok(())
}

pub(crate) async fn find_course(
    pool: &PgPool,
    course_id: &str,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
        .bind(course_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_course_for_advisor(
    pool: &PgPool,
    course_id: &str,
    advisor_id: &str,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(
        "SELECT * FROM courses WHERE id = $1 AND learning_advisor_id = $2",
    )
    .bind(course_id)
    .bind(advisor_id)
    .fetch_optional(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_before_catalog_epoch_are_rejected() {
        let created = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        assert!(validate_dates(created, start).is_err());
    }

    #[test]
    fn start_before_created_is_rejected() {
        let created = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        assert!(validate_dates(created, start).is_err());
    }

    #[test]
    fn valid_window_passes() {
        let created = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert!(validate_dates(created, start).is_ok());
    }
}
