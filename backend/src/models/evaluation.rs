use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::validation::rules::validate_grade;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
/// The fixed set of graded assessments per course.
pub enum AssessmentType {
    #[serde(rename = "Quiz 1")]
    #[sqlx(rename = "Quiz 1")]
    Quiz1,
    #[serde(rename = "Quiz 2")]
    #[sqlx(rename = "Quiz 2")]
    Quiz2,
    #[serde(rename = "Quiz 3")]
    #[sqlx(rename = "Quiz 3")]
    Quiz3,
    #[serde(rename = "Quiz 4")]
    #[sqlx(rename = "Quiz 4")]
    Quiz4,
    #[serde(rename = "Writing Project 1")]
    #[sqlx(rename = "Writing Project 1")]
    WritingProject1,
    #[serde(rename = "Writing Project 2")]
    #[sqlx(rename = "Writing Project 2")]
    WritingProject2,
    #[serde(rename = "Reading Assessment 1")]
    #[sqlx(rename = "Reading Assessment 1")]
    ReadingAssessment1,
    #[serde(rename = "Reading Assessment 2")]
    #[sqlx(rename = "Reading Assessment 2")]
    ReadingAssessment2,
}

impl AssessmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentType::Quiz1 => "Quiz 1",
            AssessmentType::Quiz2 => "Quiz 2",
            AssessmentType::Quiz3 => "Quiz 3",
            AssessmentType::Quiz4 => "Quiz 4",
            AssessmentType::WritingProject1 => "Writing Project 1",
            AssessmentType::WritingProject2 => "Writing Project 2",
            AssessmentType::ReadingAssessment1 => "Reading Assessment 1",
            AssessmentType::ReadingAssessment2 => "Reading Assessment 2",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Evaluation {
    pub id: String,
    pub student_id: String,
    pub course_id: String,
    pub enrolment_id: String,
    pub teacher_id: String,
    pub assessment: AssessmentType,
    pub grade: String,
    pub comment: String,
    pub evaluated_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Evaluation {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        student_id: String,
        course_id: String,
        enrolment_id: String,
        teacher_id: String,
        assessment: AssessmentType,
        grade: String,
        comment: String,
        evaluated_on: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            student_id,
            course_id,
            enrolment_id,
            teacher_id,
            assessment,
            grade,
            comment,
            evaluated_on,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEvaluation {
    pub student_id: String,
    pub course_id: String,
    pub assessment: AssessmentType,
    #[validate(custom(function = "validate_grade"))]
    pub grade: String,
    #[validate(length(min = 1, max = 2000))]
    pub comment: String,
    pub evaluated_on: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEvaluation {
    #[validate(custom(function = "validate_grade"))]
    pub grade: Option<String>,
    #[validate(length(min = 1, max = 2000))]
    pub comment: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assessment_serde_matches_catalog() {
        let a: AssessmentType = serde_json::from_str("\"Writing Project 2\"").unwrap();
        assert_eq!(a, AssessmentType::WritingProject2);
        assert!(serde_json::from_str::<AssessmentType>("\"Quiz 5\"").is_err());
    }
}
