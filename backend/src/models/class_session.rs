use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// A scheduled meeting of a course in a room, taught by a teacher.
pub struct ClassSession {
    pub id: String,
    pub course_id: String,
    /// First or second half of the course (1 or 2).
    pub term: i32,
    pub teacher_id: String,
    pub room_id: String,
    /// Wall-clock date and start time in the center's timezone.
    pub session_date: NaiveDateTime,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClassSession {
    pub fn new(
        course_id: String,
        term: i32,
        teacher_id: String,
        room_id: String,
        session_date: NaiveDateTime,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            course_id,
            term,
            teacher_id,
            room_id,
            session_date,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateClassSession {
    pub course_id: String,
    #[validate(range(min = 1, max = 2))]
    pub term: i32,
    pub teacher_id: String,
    pub room_id: String,
    pub session_date: NaiveDateTime,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateClassSession {
    pub course_id: Option<String>,
    #[validate(range(min = 1, max = 2))]
    pub term: Option<i32>,
    pub teacher_id: Option<String>,
    pub room_id: Option<String>,
    pub session_date: Option<NaiveDateTime>,
}
