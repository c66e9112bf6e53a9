//! Account, blocklist, and password-reset queries shared between the auth
//! handlers and the auth middleware.

use chrono::Utc;
use sqlx::PgPool;

use crate::models::{account::Account, employee::Employee, password_reset::PasswordReset};

pub async fn find_account_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        "SELECT id, employee_id, username, password_hash, created_at, updated_at \
         FROM accounts WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn find_account_by_id(
    pool: &PgPool,
    account_id: &str,
) -> Result<Option<Account>, sqlx::Error> {
    sqlx::query_as::<_, Account>(
        "SELECT id, employee_id, username, password_hash, created_at, updated_at \
         FROM accounts WHERE id = $1",
    )
    .bind(account_id)
    .fetch_optional(pool)
    .await
}

pub async fn find_employee_by_id(
    pool: &PgPool,
    employee_id: &str,
) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>(
        "SELECT id, full_name, email, phone_number, role, teacher_status, created_at, updated_at \
         FROM employees WHERE id = $1",
    )
    .bind(employee_id)
    .fetch_optional(pool)
    .await
}

pub async fn is_token_revoked(pool: &PgPool, jti: &str) -> Result<bool, sqlx::Error> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT jti FROM token_blocklist WHERE jti = $1")
            .bind(jti)
            .fetch_optional(pool)
            .await?;
    Ok(row.is_some())
}

pub async fn revoke_token(pool: &PgPool, jti: &str) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO token_blocklist (jti, revoked_at) VALUES ($1, $2) \
         ON CONFLICT (jti) DO NOTHING",
    )
    .bind(jti)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn update_password(
    pool: &PgPool,
    account_id: &str,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE accounts SET password_hash = $1, updated_at = $2 WHERE id = $3")
        .bind(password_hash)
        .bind(Utc::now())
        .bind(account_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn insert_password_reset(
    pool: &PgPool,
    reset: &PasswordReset,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO password_resets (id, account_id, token_hash, expires_at, used_at, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(&reset.id)
    .bind(&reset.account_id)
    .bind(&reset.token_hash)
    .bind(reset.expires_at)
    .bind(reset.used_at)
    .bind(reset.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn find_password_reset_by_hash(
    pool: &PgPool,
    token_hash: &str,
) -> Result<Option<PasswordReset>, sqlx::Error> {
    sqlx::query_as::<_, PasswordReset>(
        "SELECT id, account_id, token_hash, expires_at, used_at, created_at \
         FROM password_resets WHERE token_hash = $1",
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await
}

pub async fn mark_password_reset_used(pool: &PgPool, reset_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE password_resets SET used_at = $1 WHERE id = $2")
        .bind(Utc::now())
        .bind(reset_id)
        .execute(pool)
        .await?;
    Ok(())
}
