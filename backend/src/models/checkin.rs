use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// Daily staff check-in row; lateness is decided at check-in time.
pub struct StaffCheckin {
    pub id: String,
    pub employee_id: String,
    pub status: CheckinStatus,
    pub checkin_time: Option<DateTime<Utc>>,
    pub checkout_time: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum CheckinStatus {
    #[serde(rename = "Not Checked In")]
    #[sqlx(rename = "Not Checked In")]
    NotCheckedIn,
    #[serde(rename = "Checked In")]
    #[sqlx(rename = "Checked In")]
    CheckedIn,
    Late,
}

impl CheckinStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckinStatus::NotCheckedIn => "Not Checked In",
            CheckinStatus::CheckedIn => "Checked In",
            CheckinStatus::Late => "Late",
        }
    }
}

impl StaffCheckin {
    pub fn new(employee_id: String, status: CheckinStatus, checkin_time: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            employee_id,
            status,
            checkin_time: Some(checkin_time),
            checkout_time: None,
            created_at: now,
            updated_at: now,
        }
    }
}
