use axum::{
    extract::{Extension, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use sqlx::PgPool;

use crate::{
    config::Config,
    error::AppError,
    handlers::auth_repo,
    models::account::{
        ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, LoginResponse, LogoutRequest,
        RefreshRequest, ResetPasswordRequest,
    },
    models::employee::EmployeeResponse,
    models::password_reset::PasswordReset,
    utils::{
        email::EmailService,
        jwt::{
            create_access_token, create_refresh_token, generate_reset_token, hash_reset_token,
            verify_token, Claims, TOKEN_TYPE_REFRESH,
        },
        password::{hash_password, verify_password},
    },
};

pub async fn login(
    State((pool, config)): State<(PgPool, Config)>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let account = auth_repo::find_account_by_username(&pool, &payload.username)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid username or password".to_string()))?;

    let matches = verify_password(&payload.password, &account.password_hash)
        .map_err(AppError::InternalServerError)?;
    if !matches {
        return Err(AppError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let employee = auth_repo::find_employee_by_id(&pool, &account.employee_id)
        .await?
        .ok_or_else(|| {
            AppError::Forbidden("No employee profile linked to this account".to_string())
        })?;

    let access_token = create_access_token(
        account.id.clone(),
        employee.id.clone(),
        employee.role.as_str().to_string(),
        &config.jwt_secret,
        config.jwt_expiration_hours,
    )
    .map_err(AppError::InternalServerError)?;

    let refresh_token = create_refresh_token(
        account.id.clone(),
        employee.id.clone(),
        employee.role.as_str().to_string(),
        &config.jwt_secret,
        config.refresh_expiration_days,
    )
    .map_err(AppError::InternalServerError)?;

    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        employee: EmployeeResponse::from(employee),
    }))
}

pub async fn refresh(
    State((pool, config)): State<(PgPool, Config)>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<Value>, AppError> {
    let claims = verify_token(&payload.refresh_token, &config.jwt_secret, TOKEN_TYPE_REFRESH)
        .map_err(|_| AppError::Unauthorized("Invalid or expired refresh token".to_string()))?;

    if auth_repo::is_token_revoked(&pool, &claims.jti).await? {
        return Err(AppError::Unauthorized(
            "Refresh token has been revoked".to_string(),
        ));
    }

    let account = auth_repo::find_account_by_id(&pool, &claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;
    let employee = auth_repo::find_employee_by_id(&pool, &account.employee_id)
        .await?
        .ok_or_else(|| {
            AppError::Forbidden("No employee profile linked to this account".to_string())
        })?;

    let access_token = create_access_token(
        account.id,
        employee.id,
        employee.role.as_str().to_string(),
        &config.jwt_secret,
        config.jwt_expiration_hours,
    )
    .map_err(AppError::InternalServerError)?;

    Ok(Json(json!({ "access_token": access_token })))
}

pub async fn logout(
    State((pool, config)): State<(PgPool, Config)>,
    Extension(claims): Extension<Claims>,
    payload: Option<Json<LogoutRequest>>,
) -> Result<Json<Value>, AppError> {
    auth_repo::revoke_token(&pool, &claims.jti).await?;

    // Also revoke the refresh token when the client hands it over.
    if let Some(Json(LogoutRequest {
        refresh_token: Some(refresh_token),
    })) = payload
    {
        if let Ok(refresh_claims) =
            verify_token(&refresh_token, &config.jwt_secret, TOKEN_TYPE_REFRESH)
        {
            auth_repo::revoke_token(&pool, &refresh_claims.jti).await?;
        }
    }

    Ok(Json(json!({ "message": "Successfully logged out" })))
}

pub async fn change_password(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, AppError> {
    if payload.new_password.len() < 8 {
        return Err(AppError::BadRequest(
            "New password must be at least 8 characters".to_string(),
        ));
    }
    if payload.new_password == payload.current_password {
        return Err(AppError::BadRequest(
            "New password must differ from current password".to_string(),
        ));
    }

    let account = auth_repo::find_account_by_id(&pool, &claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".to_string()))?;

    let matches = verify_password(&payload.current_password, &account.password_hash)
        .map_err(AppError::InternalServerError)?;
    if !matches {
        return Err(AppError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let new_hash = hash_password(&payload.new_password).map_err(AppError::InternalServerError)?;
    auth_repo::update_password(&pool, &account.id, &new_hash).await?;

    Ok(Json(json!({ "message": "Password updated successfully" })))
}

pub async fn forgot_password(
    State((pool, config)): State<(PgPool, Config)>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    // Deliberately identical response whether or not the account exists.
    let acknowledged = json!({
        "message": "If the account exists, a reset link has been sent"
    });

    let Some(account) = auth_repo::find_account_by_username(&pool, &payload.username).await? else {
        return Ok(Json(acknowledged));
    };
    let Some(employee) = auth_repo::find_employee_by_id(&pool, &account.employee_id).await? else {
        return Ok(Json(acknowledged));
    };

    let (token, token_hash) = generate_reset_token();
    let reset = PasswordReset::new(account.id, token_hash, config.reset_token_ttl_minutes);
    auth_repo::insert_password_reset(&pool, &reset).await?;

    match EmailService::new() {
        Ok(service) => {
            if let Err(err) = service.send_password_reset_email(&employee.email, &token) {
                tracing::warn!(error = %err, "failed to send password reset email");
            }
        }
        Err(err) => tracing::warn!(error = %err, "mailer unavailable"),
    }

    Ok(Json(acknowledged))
}

pub async fn reset_password(
    State((pool, _config)): State<(PgPool, Config)>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    if payload.new_password.len() < 8 {
        return Err(AppError::BadRequest(
            "New password must be at least 8 characters".to_string(),
        ));
    }

    let token_hash = hash_reset_token(&payload.token);
    let reset = auth_repo::find_password_reset_by_hash(&pool, &token_hash)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid or expired reset token".to_string()))?;

    if !reset.is_usable(Utc::now()) {
        return Err(AppError::BadRequest(
            "Invalid or expired reset token".to_string(),
        ));
    }

    let new_hash = hash_password(&payload.new_password).map_err(AppError::InternalServerError)?;
    auth_repo::update_password(&pool, &reset.account_id, &new_hash).await?;
    auth_repo::mark_password_reset_used(&pool, &reset.id).await?;

    Ok(Json(json!({ "message": "Password has been reset" })))
}
