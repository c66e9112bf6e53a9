//! Staff check-in/check-out with lateness rules.
//!
//! Office staff are measured against the center's opening time; teachers
//! against the start of their earliest class today. Both get a 15-minute
//! grace window.

use axum::{
    extract::{Extension, State},
    Json,
};
use chrono::{Duration, NaiveTime, Utc};
use serde_json::{json, Value};
use sqlx::PgPool;

use crate::{
    config::Config,
    error::AppError,
    models::checkin::{CheckinStatus, StaffCheckin},
    models::employee::Employee,
    utils::time::{local_time, today_local},
};

const OFFICE_OPENING: (u32, u32) = (9, 0);
const OFFICE_CLOSING: (u32, u32) = (20, 0);
const CHECKOUT_EARLIEST: (u32, u32) = (20, 15);
const GRACE_MINUTES: i64 = 15;

pub async fn check_in(
    State((pool, config)): State<(PgPool, Config)>,
    Extension(employee): Extension<Employee>,
) -> Result<Json<Value>, AppError> {
    let today = today_local(&config.time_zone);
    let now = local_time(&config.time_zone);

    let existing: Option<(String,)> = sqlx::query_as(
        "SELECT id FROM staff_checkins WHERE employee_id = $1 AND checkin_time >= $2",
    )
    .bind(&employee.id)
    .bind(today.and_hms_opt(0, 0, 0).unwrap().and_utc())
    .fetch_optional(&pool)
    .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Already checked in today".to_string()));
    }

    let status = if employee.is_teacher() {
        let first_start = first_session_start_today(&pool, &employee.id, today).await?;
        teacher_checkin_status(now, first_start)
    } else {
        office_checkin_status(now)?
    };

    let record = StaffCheckin::new(employee.id.clone(), status, Utc::now());
    sqlx::query(
        "INSERT INTO staff_checkins (id, employee_id, status, checkin_time, checkout_time, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(&record.id)
    .bind(&record.employee_id)
    .bind(record.status.as_str())
    .bind(record.checkin_time)
    .bind(record.checkout_time)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(&pool)
    .await?;

    Ok(Json(json!({
        "message": "Check-in successful",
        "checkin_id": record.id,
        "status": record.status.as_str()
    })))
}

pub async fn check_out(
    State((pool, config)): State<(PgPool, Config)>,
) -> Result<Json<Value>, AppError> {
    let now = local_time(&config.time_zone);
    let earliest = NaiveTime::from_hms_opt(CHECKOUT_EARLIEST.0, CHECKOUT_EARLIEST.1, 0).unwrap();
    if now < earliest {
        return Err(AppError::BadRequest(
            "Checkout is only allowed after 8:15 PM".to_string(),
        ));
    }

    let today = today_local(&config.time_zone);
    let result = sqlx::query(
        "UPDATE staff_checkins SET status = $1, checkout_time = $2, updated_at = $2 \
         WHERE checkout_time IS NULL AND checkin_time >= $3",
    )
    .bind(CheckinStatus::NotCheckedIn.as_str())
    .bind(Utc::now())
    .bind(today.and_hms_opt(0, 0, 0).unwrap().and_utc())
    .execute(&pool)
    .await?;

    Ok(Json(json!({
        "message": format!("Checked out {} staff successfully", result.rows_affected())
    })))
}

pub async fn today_checkins(
    State((pool, config)): State<(PgPool, Config)>,
) -> Result<Json<Vec<StaffCheckin>>, AppError> {
    let today = today_local(&config.time_zone);
    let rows = sqlx::query_as::<_, StaffCheckin>(
        "SELECT * FROM staff_checkins WHERE checkin_time >= $1 ORDER BY checkin_time",
    )
    .bind(today.and_hms_opt(0, 0, 0).unwrap().and_utc())
    .fetch_all(&pool)
    .await?;
    Ok(Json(rows))
}

async fn first_session_start_today(
    pool: &PgPool,
    teacher_id: &str,
    today: chrono::NaiveDate,
) -> Result<NaiveTime, AppError> {
    let starts: Vec<(chrono::NaiveDateTime,)> = sqlx::query_as(
        "SELECT session_date FROM class_sessions \
         WHERE teacher_id = $1 AND session_date >= $2 AND session_date < $3 \
         ORDER BY session_date",
    )
    .bind(teacher_id)
    .bind(today.and_hms_opt(0, 0, 0).unwrap())
    .bind((today + Duration::days(1)).and_hms_opt(0, 0, 0).unwrap())
    .fetch_all(pool)
    .await?;

    starts
        .first()
        .map(|(dt,)| dt.time())
        .ok_or_else(|| AppError::NotFound("No classes found for today".to_string()))
}

fn office_checkin_status(now: NaiveTime) -> Result<CheckinStatus, AppError> {
    let opening = NaiveTime::from_hms_opt(OFFICE_OPENING.0, OFFICE_OPENING.1, 0).unwrap();
    let closing = NaiveTime::from_hms_opt(OFFICE_CLOSING.0, OFFICE_CLOSING.1, 0).unwrap();

    if now < opening || now > closing {
        return Err(AppError::BadRequest(
            "Check-in time must be between 9:00 AM and 8:00 PM".to_string(),
        ));
    }

    if now > opening + Duration::minutes(GRACE_MINUTES) {
        Ok(CheckinStatus::Late)
    } else {
        Ok(CheckinStatus::CheckedIn)
    }
}

fn teacher_checkin_status(now: NaiveTime, first_class_start: NaiveTime) -> CheckinStatus {
    if now > first_class_start + Duration::minutes(GRACE_MINUTES) {
        CheckinStatus::Late
    } else {
        CheckinStatus::CheckedIn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn office_checkin_within_grace_is_on_time() {
        assert!(matches!(
            office_checkin_status(t(9, 0)),
            Ok(CheckinStatus::CheckedIn)
        ));
        assert!(matches!(
            office_checkin_status(t(9, 10)),
            Ok(CheckinStatus::CheckedIn)
        ));
        assert!(matches!(
            office_checkin_status(t(9, 15)),
            Ok(CheckinStatus::CheckedIn)
        ));
    }

    #[test]
    fn office_checkin_past_grace_is_late() {
        assert!(matches!(
            office_checkin_status(t(9, 16)),
            Ok(CheckinStatus::Late)
        ));
        assert!(matches!(
            office_checkin_status(t(14, 0)),
            Ok(CheckinStatus::Late)
        ));
    }

    #[test]
    fn office_checkin_outside_hours_is_rejected() {
        assert!(office_checkin_status(t(8, 59)).is_err());
        assert!(office_checkin_status(t(20, 1)).is_err());
    }

    #[test]
    fn teacher_checkin_measured_against_first_class() {
        assert!(matches!(
            teacher_checkin_status(t(13, 55), t(14, 0)),
            CheckinStatus::CheckedIn
        ));
        assert!(matches!(
            teacher_checkin_status(t(14, 15), t(14, 0)),
            CheckinStatus::CheckedIn
        ));
        assert!(matches!(
            teacher_checkin_status(t(14, 16), t(14, 0)),
            CheckinStatus::Late
        ));
    }
}
