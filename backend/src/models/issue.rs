use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// Problem report filed by a teacher: either about a student's behavior or
/// about a technical fault in a room, never both.
pub struct Issue {
    /// Public sequential identifier (`ISS001`, ...).
    pub id: String,
    pub teacher_id: String,
    pub issue_type: IssueType,
    pub description: String,
    pub status: IssueStatus,
    pub student_id: Option<String>,
    pub room_id: Option<String>,
    pub reported_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum IssueType {
    #[serde(rename = "Student Behavior")]
    #[sqlx(rename = "Student Behavior")]
    StudentBehavior,
    Technical,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::StudentBehavior => "Student Behavior",
            IssueType::Technical => "Technical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum IssueStatus {
    #[serde(rename = "In Progress")]
    #[sqlx(rename = "In Progress")]
    InProgress,
    Done,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueStatus::InProgress => "In Progress",
            IssueStatus::Done => "Done",
        }
    }
}

impl Issue {
    pub fn new(
        id: String,
        teacher_id: String,
        issue_type: IssueType,
        description: String,
        student_id: Option<String>,
        room_id: Option<String>,
        reported_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            teacher_id,
            issue_type,
            description,
            status: IssueStatus::InProgress,
            student_id,
            room_id,
            reported_date,
            created_at: now,
            updated_at: now,
        }
    }

    /// The type/target pairing enforced by the schema CHECK.
    pub fn target_is_consistent(&self) -> bool {
        match self.issue_type {
            IssueType::StudentBehavior => self.student_id.is_some() && self.room_id.is_none(),
            IssueType::Technical => self.student_id.is_none() && self.room_id.is_some(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateIssue {
    pub issue_type: IssueType,
    #[validate(length(min = 1, max = 200))]
    pub description: String,
    pub student_id: Option<String>,
    pub room_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateIssue {
    pub status: IssueStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(issue_type: IssueType, student: Option<&str>, room: Option<&str>) -> Issue {
        Issue::new(
            "ISS001".into(),
            "EM001".into(),
            issue_type,
            "broken projector".into(),
            student.map(str::to_string),
            room.map(str::to_string),
            NaiveDate::from_ymd_opt(2025, 5, 20).unwrap(),
        )
    }

    #[test]
    fn behavior_issue_needs_student_only() {
        assert!(issue(IssueType::StudentBehavior, Some("STU001"), None).target_is_consistent());
        assert!(!issue(IssueType::StudentBehavior, None, Some("ROOM001")).target_is_consistent());
    }

    #[test]
    fn technical_issue_needs_room_only() {
        assert!(issue(IssueType::Technical, None, Some("ROOM001")).target_is_consistent());
        assert!(!issue(IssueType::Technical, Some("STU001"), Some("ROOM001")).target_is_consistent());
    }
}
