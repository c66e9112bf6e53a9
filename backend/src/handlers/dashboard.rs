use axum::{extract::State, Json};
use chrono::Duration;
use serde::Serialize;
use sqlx::PgPool;

use crate::{config::Config, error::AppError, utils::time::today_local};

#[derive(Debug, Serialize)]
pub struct DashboardStatistics {
    pub total_students: i64,
    pub total_teachers: i64,
    pub total_courses: i64,
    pub contracts_in_progress: i64,
    pub contracts_paid: i64,
    pub tuition_outstanding: i64,
    pub tuition_collected: i64,
    pub sessions_today: i64,
    pub attendance_rate: f64,
    pub open_issues: i64,
    pub rooms_total: i64,
    pub rooms_occupied: i64,
}

pub async fn statistics(
    State((pool, config)): State<(PgPool, Config)>,
) -> Result<Json<DashboardStatistics>, AppError> {
    let total_students = count(&pool, "SELECT COUNT(*) FROM students").await?;
    let total_teachers = count(
        &pool,
        "SELECT COUNT(*) FROM employees WHERE role = 'Teacher'",
    )
    .await?;
    let total_courses = count(&pool, "SELECT COUNT(*) FROM courses").await?;
    let contracts_in_progress = count(
        &pool,
        "SELECT COUNT(*) FROM contracts WHERE payment_status = 'In Progress'",
    )
    .await?;
    let contracts_paid = count(
        &pool,
        "SELECT COUNT(*) FROM contracts WHERE payment_status = 'Paid'",
    )
    .await?;
    let tuition_outstanding = sum(
        &pool,
        "SELECT COALESCE(SUM(tuition_fee), 0) FROM contracts WHERE payment_status = 'In Progress'",
    )
    .await?;
    let tuition_collected = sum(
        &pool,
        "SELECT COALESCE(SUM(tuition_fee), 0) FROM contracts WHERE payment_status = 'Paid'",
    )
    .await?;

    let today = today_local(&config.time_zone);
    let (sessions_today,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM class_sessions WHERE session_date >= $1 AND session_date < $2",
    )
    .bind(today.and_hms_opt(0, 0, 0).unwrap())
    .bind((today + Duration::days(1)).and_hms_opt(0, 0, 0).unwrap())
    .fetch_one(&pool)
    .await?;

    let (present, total_attendance): (i64, i64) = sqlx::query_as(
        "SELECT COUNT(*) FILTER (WHERE status = 'Present'), COUNT(*) FROM student_attendance",
    )
    .fetch_one(&pool)
    .await?;
    let attendance_rate = if total_attendance > 0 {
        present as f64 / total_attendance as f64
    } else {
        0.0
    };

    let open_issues = count(
        &pool,
        "SELECT COUNT(*) FROM issues WHERE status = 'In Progress'",
    )
    .await?;
    let rooms_total = count(&pool, "SELECT COUNT(*) FROM rooms").await?;
    let rooms_occupied = count(
        &pool,
        "SELECT COUNT(*) FROM rooms WHERE status = 'Occupied'",
    )
    .await?;

    Ok(Json(DashboardStatistics {
        total_students,
        total_teachers,
        total_courses,
        contracts_in_progress,
        contracts_paid,
        tuition_outstanding,
        tuition_collected,
        sessions_today,
        attendance_rate,
        open_issues,
        rooms_total,
        rooms_occupied,
    }))
}

async fn count(pool: &PgPool, query: &str) -> Result<i64, sqlx::Error> {
    let (n,): (i64,) = sqlx::query_as(query).fetch_one(pool).await?;
    Ok(n)
}

async fn sum(pool: &PgPool, query: &str) -> Result<i64, sqlx::Error> {
    let (n,): (i64,) = sqlx::query_as(query).fetch_one(pool).await?;
    Ok(n)
}
