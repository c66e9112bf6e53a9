use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// A student's paid enrollment agreement for a course, sold by an advisor.
pub struct Contract {
    pub id: String,
    pub student_id: String,
    /// Advisor who owns the contract.
    pub employee_id: String,
    pub course_id: String,
    pub tuition_fee: i64,
    pub payment_status: PaymentStatus,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum PaymentStatus {
    #[serde(rename = "In Progress")]
    #[sqlx(rename = "In Progress")]
    InProgress,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::InProgress => "In Progress",
            PaymentStatus::Paid => "Paid",
        }
    }
}

impl Contract {
    pub fn new(
        student_id: String,
        employee_id: String,
        course_id: String,
        tuition_fee: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            student_id,
            employee_id,
            course_id,
            tuition_fee,
            payment_status: PaymentStatus::InProgress,
            start_date,
            end_date,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateContract {
    pub student_id: String,
    pub course_id: String,
    #[validate(range(min = 0))]
    pub tuition_fee: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateContract {
    pub student_id: Option<String>,
    pub course_id: Option<String>,
    #[validate(range(min = 0))]
    pub tuition_fee: Option<i64>,
    pub payment_status: Option<PaymentStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_status_serde_matches_db_values() {
        let s: PaymentStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(s, PaymentStatus::InProgress);
        assert_eq!(
            serde_json::to_value(PaymentStatus::Paid).unwrap(),
            serde_json::json!("Paid")
        );
    }

    #[test]
    fn new_contract_starts_in_progress() {
        let c = Contract::new(
            "STU001".into(),
            "EM002".into(),
            "course-1".into(),
            1_200_000,
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
        );
        assert_eq!(c.payment_status, PaymentStatus::InProgress);
    }
}
