use anyhow::anyhow;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: u64,
    pub refresh_expiration_days: u64,
    pub reset_token_ttl_minutes: u64,
    pub time_zone: Tz,
    pub bind_port: u16,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/tutorhub".to_string());

        let jwt_secret = env::var("JWT_SECRET")
            .unwrap_or_else(|_| "your-secret-key-change-this-in-production".to_string());

        let jwt_expiration_hours = env::var("JWT_EXPIRATION_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse()
            .unwrap_or(24);

        let refresh_expiration_days = env::var("REFRESH_EXPIRATION_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse()
            .unwrap_or(7);

        let reset_token_ttl_minutes = env::var("RESET_TOKEN_TTL_MINUTES")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .unwrap_or(60);

        let time_zone_name = env::var("APP_TIMEZONE").unwrap_or_else(|_| "UTC".to_string());
        let time_zone: Tz = time_zone_name
            .parse()
            .map_err(|_| anyhow!("Invalid APP_TIMEZONE value: {}", time_zone_name))?;

        let bind_port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .unwrap_or(3000);

        Ok(Config {
            database_url,
            jwt_secret,
            jwt_expiration_hours,
            refresh_expiration_days,
            reset_token_ttl_minutes,
            time_zone,
            bind_port,
        })
    }
}
