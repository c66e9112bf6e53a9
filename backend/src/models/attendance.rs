use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// Per-session presence record. Rows are generated Absent for every
/// enrolment of the course when a session is created.
pub struct StudentAttendance {
    pub id: String,
    pub student_id: String,
    pub session_id: String,
    pub enrolment_id: String,
    pub status: AttendanceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
        }
    }
}

impl StudentAttendance {
    pub fn new(student_id: String, session_id: String, enrolment_id: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            student_id,
            session_id,
            enrolment_id,
            status: AttendanceStatus::Absent,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateAttendance {
    pub session_id: String,
    pub student_id: String,
}

#[derive(Debug, Deserialize)]
pub struct MarkAttendance {
    pub status: AttendanceStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_rows_start_absent() {
        let row = StudentAttendance::new("STU001".into(), "sess-1".into(), "enr-1".into());
        assert_eq!(row.status, AttendanceStatus::Absent);
    }

    #[test]
    fn status_serde_is_title_case() {
        let s: AttendanceStatus = serde_json::from_str("\"Present\"").unwrap();
        assert_eq!(s, AttendanceStatus::Present);
    }
}
