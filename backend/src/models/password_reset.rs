use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// Single-use, time-limited password reset. Only the token digest is
/// stored; the plain token is delivered by email.
pub struct PasswordReset {
    pub id: String,
    pub account_id: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl PasswordReset {
    pub fn new(account_id: String, token_hash: String, ttl_minutes: u64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            account_id,
            token_hash,
            expires_at: now + Duration::minutes(ttl_minutes as i64),
            used_at: None,
            created_at: now,
        }
    }

    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.used_at.is_none() && self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_reset_is_usable() {
        let reset = PasswordReset::new("acc-1".into(), "hash".into(), 60);
        assert!(reset.is_usable(Utc::now()));
    }

    #[test]
    fn expired_reset_is_rejected() {
        let reset = PasswordReset::new("acc-1".into(), "hash".into(), 60);
        let later = Utc::now() + Duration::minutes(61);
        assert!(!reset.is_usable(later));
    }

    #[test]
    fn used_reset_is_rejected() {
        let mut reset = PasswordReset::new("acc-1".into(), "hash".into(), 60);
        reset.used_at = Some(Utc::now());
        assert!(!reset.is_usable(Utc::now()));
    }
}
