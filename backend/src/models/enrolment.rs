use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// Links a contract to course participation. Student and course are
/// denormalized from the contract so attendance generation stays a single
/// join away.
pub struct Enrolment {
    pub id: String,
    pub contract_id: String,
    pub student_id: String,
    pub course_id: String,
    pub enrolment_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Enrolment {
    pub fn new(
        contract_id: String,
        student_id: String,
        course_id: String,
        enrolment_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            contract_id,
            student_id,
            course_id,
            enrolment_date,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateEnrolment {
    pub contract_id: String,
    pub enrolment_date: Option<NaiveDate>,
}
