//! Courses come from a fixed catalog of offerings; the catalog also fixes
//! each course's public code (`ENG001`, `MTH101`, ...).

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::validation::rules::validate_schedule_text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum CourseLevel {
    #[serde(rename = "CEFR A1")]
    #[sqlx(rename = "CEFR A1")]
    CefrA1,
    #[serde(rename = "CEFR A2")]
    #[sqlx(rename = "CEFR A2")]
    CefrA2,
    #[serde(rename = "CEFR B1")]
    #[sqlx(rename = "CEFR B1")]
    CefrB1,
    #[serde(rename = "CEFR B2")]
    #[sqlx(rename = "CEFR B2")]
    CefrB2,
    #[serde(rename = "CEFR C1")]
    #[sqlx(rename = "CEFR C1")]
    CefrC1,
    #[serde(rename = "CEFR C2")]
    #[sqlx(rename = "CEFR C2")]
    CefrC2,
    #[serde(rename = "IELTS Foundation")]
    #[sqlx(rename = "IELTS Foundation")]
    IeltsFoundation,
    #[serde(rename = "IELTS Pre-Intermediate")]
    #[sqlx(rename = "IELTS Pre-Intermediate")]
    IeltsPreIntermediate,
    #[serde(rename = "IELTS Intermediate")]
    #[sqlx(rename = "IELTS Intermediate")]
    IeltsIntermediate,
    #[serde(rename = "IELTS Upper-Intermediate")]
    #[sqlx(rename = "IELTS Upper-Intermediate")]
    IeltsUpperIntermediate,
    #[serde(rename = "IELTS Advanced")]
    #[sqlx(rename = "IELTS Advanced")]
    IeltsAdvanced,
    #[serde(rename = "TOEIC Foundation")]
    #[sqlx(rename = "TOEIC Foundation")]
    ToeicFoundation,
    #[serde(rename = "TOEIC Pre-Intermediate")]
    #[sqlx(rename = "TOEIC Pre-Intermediate")]
    ToeicPreIntermediate,
    #[serde(rename = "TOEIC Intermediate")]
    #[sqlx(rename = "TOEIC Intermediate")]
    ToeicIntermediate,
    #[serde(rename = "TOEIC Upper-Intermediate")]
    #[sqlx(rename = "TOEIC Upper-Intermediate")]
    ToeicUpperIntermediate,
    #[serde(rename = "TOEIC Advanced")]
    #[sqlx(rename = "TOEIC Advanced")]
    ToeicAdvanced,
    #[serde(rename = "6th Grade Math")]
    #[sqlx(rename = "6th Grade Math")]
    Math6,
    #[serde(rename = "7th Grade Math")]
    #[sqlx(rename = "7th Grade Math")]
    Math7,
    #[serde(rename = "8th Grade Math")]
    #[sqlx(rename = "8th Grade Math")]
    Math8,
    #[serde(rename = "9th Grade Math")]
    #[sqlx(rename = "9th Grade Math")]
    Math9,
    #[serde(rename = "10th Grade Math")]
    #[sqlx(rename = "10th Grade Math")]
    Math10,
    #[serde(rename = "11th Grade Math")]
    #[sqlx(rename = "11th Grade Math")]
    Math11,
    #[serde(rename = "12th Grade Math")]
    #[sqlx(rename = "12th Grade Math")]
    Math12,
}

impl CourseLevel {
    pub fn name(&self) -> &'static str {
        match self {
            CourseLevel::CefrA1 => "CEFR A1",
            CourseLevel::CefrA2 => "CEFR A2",
            CourseLevel::CefrB1 => "CEFR B1",
            CourseLevel::CefrB2 => "CEFR B2",
            CourseLevel::CefrC1 => "CEFR C1",
            CourseLevel::CefrC2 => "CEFR C2",
            CourseLevel::IeltsFoundation => "IELTS Foundation",
            CourseLevel::IeltsPreIntermediate => "IELTS Pre-Intermediate",
            CourseLevel::IeltsIntermediate => "IELTS Intermediate",
            CourseLevel::IeltsUpperIntermediate => "IELTS Upper-Intermediate",
            CourseLevel::IeltsAdvanced => "IELTS Advanced",
            CourseLevel::ToeicFoundation => "TOEIC Foundation",
            CourseLevel::ToeicPreIntermediate => "TOEIC Pre-Intermediate",
            CourseLevel::ToeicIntermediate => "TOEIC Intermediate",
            CourseLevel::ToeicUpperIntermediate => "TOEIC Upper-Intermediate",
            CourseLevel::ToeicAdvanced => "TOEIC Advanced",
            CourseLevel::Math6 => "6th Grade Math",
            CourseLevel::Math7 => "7th Grade Math",
            CourseLevel::Math8 => "8th Grade Math",
            CourseLevel::Math9 => "9th Grade Math",
            CourseLevel::Math10 => "10th Grade Math",
            CourseLevel::Math11 => "11th Grade Math",
            CourseLevel::Math12 => "12th Grade Math",
        }
    }

    /// Catalog code used as the course's public identifier prefix.
    pub fn code(&self) -> &'static str {
        match self {
            CourseLevel::CefrA1 => "ENG001",
            CourseLevel::CefrA2 => "ENG002",
            CourseLevel::CefrB1 => "ENG003",
            CourseLevel::CefrB2 => "ENG004",
            CourseLevel::CefrC1 => "ENG005",
            CourseLevel::CefrC2 => "ENG006",
            CourseLevel::IeltsFoundation => "ENG101",
            CourseLevel::IeltsPreIntermediate => "ENG102",
            CourseLevel::IeltsIntermediate => "ENG103",
            CourseLevel::IeltsUpperIntermediate => "ENG104",
            CourseLevel::IeltsAdvanced => "ENG105",
            CourseLevel::ToeicFoundation => "ENG201",
            CourseLevel::ToeicPreIntermediate => "ENG202",
            CourseLevel::ToeicIntermediate => "ENG203",
            CourseLevel::ToeicUpperIntermediate => "ENG204",
            CourseLevel::ToeicAdvanced => "ENG205",
            CourseLevel::Math6 => "MTH001",
            CourseLevel::Math7 => "MTH002",
            CourseLevel::Math8 => "MTH003",
            CourseLevel::Math9 => "MTH004",
            CourseLevel::Math10 => "MTH101",
            CourseLevel::Math11 => "MTH102",
            CourseLevel::Math12 => "MTH103",
        }
    }

    /// Makeup classes reuse the catalog code with a `MAK` prefix.
    pub fn makeup_code(&self) -> String {
        format!("MAK{}", self.code())
    }

    pub fn from_name(name: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(name.to_string())).ok()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: String,
    /// Catalog code, unique together with `created_date`.
    pub code: String,
    pub name: CourseLevel,
    pub duration_months: i32,
    pub start_date: NaiveDate,
    /// Derived at write time: `start_date` plus the duration in months.
    pub end_date: NaiveDate,
    pub schedule: String,
    pub learning_advisor_id: String,
    pub fee: i64,
    pub prerequisites: String,
    pub description: Option<String>,
    pub created_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    pub fn end_date_for(start_date: NaiveDate, duration_months: i32) -> NaiveDate {
        start_date
            .checked_add_months(Months::new(duration_months.max(0) as u32))
            .unwrap_or(start_date)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: CourseLevel,
        duration_months: i32,
        start_date: NaiveDate,
        schedule: String,
        learning_advisor_id: String,
        fee: i64,
        prerequisites: String,
        description: Option<String>,
        created_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            code: name.code().to_string(),
            name,
            duration_months,
            start_date,
            end_date: Self::end_date_for(start_date, duration_months),
            schedule,
            learning_advisor_id,
            fee,
            prerequisites,
            description,
            created_date,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCourse {
    pub name: CourseLevel,
    #[validate(range(min = 1, max = 36))]
    pub duration_months: i32,
    pub start_date: NaiveDate,
    #[validate(custom(function = "validate_schedule_text"))]
    pub schedule: String,
    #[validate(range(min = 0))]
    pub fee: i64,
    #[validate(length(max = 20))]
    pub prerequisites: String,
    #[validate(length(max = 200))]
    pub description: Option<String>,
    pub created_date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCourse {
    #[validate(range(min = 1, max = 36))]
    pub duration_months: Option<i32>,
    pub start_date: Option<NaiveDate>,
    #[validate(custom(function = "validate_schedule_text"))]
    pub schedule: Option<String>,
    #[validate(range(min = 0))]
    pub fee: Option<i64>,
    #[validate(length(max = 20))]
    pub prerequisites: Option<String>,
    #[validate(length(max = 200))]
    pub description: Option<String>,
    /// Reassigning a course to another advisor is rejected at the handler.
    pub learning_advisor_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_serde_uses_catalog_names() {
        let level: CourseLevel = serde_json::from_str("\"IELTS Upper-Intermediate\"").unwrap();
        assert_eq!(level, CourseLevel::IeltsUpperIntermediate);
        assert_eq!(level.code(), "ENG104");
        assert_eq!(level.makeup_code(), "MAKENG104");

        let v = serde_json::to_value(CourseLevel::Math10).unwrap();
        assert_eq!(v, serde_json::json!("10th Grade Math"));
    }

    #[test]
    fn from_name_rejects_off_catalog_names() {
        assert_eq!(CourseLevel::from_name("CEFR A1"), Some(CourseLevel::CefrA1));
        assert_eq!(CourseLevel::from_name("Basket Weaving"), None);
    }

    #[test]
    fn end_date_adds_whole_months() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(
            Course::end_date_for(start, 6),
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
        );
        // Clamps to the last day of a shorter month.
        let end_of_jan = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(
            Course::end_date_for(end_of_jan, 1),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
    }
}
