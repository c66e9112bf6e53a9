use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Room {
    /// Public sequential identifier (`ROOM001`, ...).
    pub id: String,
    pub name: String,
    pub status: RoomStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum RoomStatus {
    Free,
    Occupied,
    Maintenance,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Free => "Free",
            RoomStatus::Occupied => "Occupied",
            RoomStatus::Maintenance => "Maintenance",
        }
    }
}

impl Room {
    pub fn new(id: String, name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            status: RoomStatus::Free,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(self.status, RoomStatus::Free)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoom {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRoom {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub status: Option<RoomStatus>,
}
