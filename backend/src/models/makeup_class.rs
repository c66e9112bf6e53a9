use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::course::CourseLevel;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// Remedial session planned for a student who was absent from a class.
pub struct MakeupClass {
    /// Course-derived code plus a sequence, e.g. `MAKENG001-3`.
    pub id: String,
    pub attendance_id: String,
    pub teacher_id: String,
    pub room_id: String,
    pub scheduled_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MakeupClass {
    pub fn new(
        level: CourseLevel,
        sequence: u64,
        attendance_id: String,
        teacher_id: String,
        room_id: String,
        scheduled_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: format!("{}-{}", level.makeup_code(), sequence),
            attendance_id,
            teacher_id,
            room_id,
            scheduled_date,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateMakeupClass {
    /// Catalog name of the course the student missed.
    pub level_choice: CourseLevel,
    pub attendance_id: String,
    pub teacher_id: String,
    pub room_id: String,
    pub scheduled_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn makeup_id_carries_course_code() {
        let makeup = MakeupClass::new(
            CourseLevel::IeltsFoundation,
            4,
            "att-1".into(),
            "EM001".into(),
            "ROOM001".into(),
            NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
        );
        assert_eq!(makeup.id, "MAKENG101-4");
    }
}
