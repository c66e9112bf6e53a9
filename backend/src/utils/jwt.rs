use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id.
    pub sub: String,
    /// Employee the account belongs to.
    pub employee_id: String,
    /// Role claim checked by the route middleware.
    pub role: String,
    /// Either `access` or `refresh`.
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
    /// Token id recorded in the blocklist on logout.
    pub jti: String,
}

impl Claims {
    fn new(
        account_id: String,
        employee_id: String,
        role: String,
        token_type: &str,
        lifetime: Duration,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: account_id,
            employee_id,
            role,
            token_type: token_type.to_string(),
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }
}

pub fn create_access_token(
    account_id: String,
    employee_id: String,
    role: String,
    secret: &str,
    expiration_hours: u64,
) -> anyhow::Result<String> {
    let claims = Claims::new(
        account_id,
        employee_id,
        role,
        TOKEN_TYPE_ACCESS,
        Duration::hours(expiration_hours as i64),
    );
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;
    Ok(token)
}

pub fn create_refresh_token(
    account_id: String,
    employee_id: String,
    role: String,
    secret: &str,
    expiration_days: u64,
) -> anyhow::Result<String> {
    let claims = Claims::new(
        account_id,
        employee_id,
        role,
        TOKEN_TYPE_REFRESH,
        Duration::days(expiration_days as i64),
    );
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?;
    Ok(token)
}

pub fn verify_token(token: &str, secret: &str, expected_type: &str) -> anyhow::Result<Claims> {
    let validation = Validation::default();
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &validation,
    )?;

    if token_data.claims.token_type != expected_type {
        anyhow::bail!("Unexpected token type: {}", token_data.claims.token_type);
    }

    Ok(token_data.claims)
}

/// Generates a password-reset token and the sha256 digest stored for it.
/// Only the digest ever touches the database; the plain token goes out by
/// email.
pub fn generate_reset_token() -> (String, String) {
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect();
    let hash = hash_reset_token(&token);
    (token, hash)
}

pub fn hash_reset_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_token_round_trip() {
        let token = create_access_token(
            "ACC001".into(),
            "EM001".into(),
            "Manager".into(),
            "secret",
            1,
        )
        .expect("create token");
        let claims = verify_token(&token, "secret", TOKEN_TYPE_ACCESS).expect("verify token");
        assert_eq!(claims.sub, "ACC001");
        assert_eq!(claims.employee_id, "EM001");
        assert_eq!(claims.role, "Manager");
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn refresh_token_is_not_an_access_token() {
        let token = create_refresh_token(
            "ACC001".into(),
            "EM001".into(),
            "Teacher".into(),
            "secret",
            7,
        )
        .expect("create token");
        assert!(verify_token(&token, "secret", TOKEN_TYPE_ACCESS).is_err());
        assert!(verify_token(&token, "secret", TOKEN_TYPE_REFRESH).is_ok());
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let token = create_access_token(
            "ACC001".into(),
            "EM001".into(),
            "Teacher".into(),
            "secret",
            1,
        )
        .unwrap();
        assert!(verify_token(&token, "other-secret", TOKEN_TYPE_ACCESS).is_err());
    }

    #[test]
    fn reset_token_hash_is_stable_and_hex() {
        let (token, hash) = generate_reset_token();
        assert_eq!(hash, hash_reset_token(&token));
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
