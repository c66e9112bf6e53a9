use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// Teacher leave with a named substitute; only managers approve.
pub struct LeaveRequest {
    pub id: String,
    pub employee_id: String,
    pub substitute_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum LeaveStatus {
    Approved,
    #[serde(rename = "Not Approved")]
    #[sqlx(rename = "Not Approved")]
    NotApproved,
}

impl LeaveStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Approved => "Approved",
            LeaveStatus::NotApproved => "Not Approved",
        }
    }
}

impl LeaveRequest {
    pub fn new(
        employee_id: String,
        substitute_id: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            employee_id,
            substitute_id,
            start_date,
            end_date,
            reason,
            status: LeaveStatus::NotApproved,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, LeaveStatus::NotApproved)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateLeaveRequest {
    pub substitute_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(length(min = 1, max = 200))]
    pub reason: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLeaveRequest {
    pub substitute_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[validate(length(min = 1, max = 200))]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_request_is_pending() {
        let request = LeaveRequest::new(
            "EM001".into(),
            "EM003".into(),
            NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 7, 3).unwrap(),
            "family matter".into(),
        );
        assert!(request.is_pending());
    }

    #[test]
    fn status_serde_round_trip() {
        let s: LeaveStatus = serde_json::from_str("\"Not Approved\"").unwrap();
        assert_eq!(s, LeaveStatus::NotApproved);
        assert_eq!(
            serde_json::to_value(LeaveStatus::NotApproved).unwrap(),
            serde_json::json!("Not Approved")
        );
    }
}
