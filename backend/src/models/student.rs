use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Student {
    /// Public sequential identifier (`STU001`, ...).
    pub id: String,
    pub full_name: String,
    pub contact_info: String,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    pub fn new(
        id: String,
        full_name: String,
        contact_info: String,
        date_of_birth: Option<NaiveDate>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            full_name,
            contact_info,
            date_of_birth,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateStudent {
    #[validate(length(min = 1, max = 200))]
    pub full_name: String,
    #[validate(length(min = 1, max = 200))]
    pub contact_info: String,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStudent {
    #[validate(length(min = 1, max = 200))]
    pub full_name: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub contact_info: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}
