//! Bearer-token authentication and role gating.
//!
//! Every protected route passes through one of the `auth_*` layers: the
//! token is verified, its `jti` checked against the blocklist, and the
//! owning employee loaded and injected as a request extension alongside the
//! claims.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use sqlx::PgPool;

use crate::{
    config::Config,
    error::AppError,
    handlers::auth_repo,
    models::employee::{Employee, EmployeeRole},
    utils::jwt::{verify_token, TOKEN_TYPE_ACCESS},
};

pub async fn auth_any(
    State((pool, config)): State<(PgPool, Config)>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(&pool, &config, request, next, None).await
}

pub async fn auth_teacher(
    State((pool, config)): State<(PgPool, Config)>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(&pool, &config, request, next, Some(&[EmployeeRole::Teacher])).await
}

pub async fn auth_advisor(
    State((pool, config)): State<(PgPool, Config)>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(
        &pool,
        &config,
        request,
        next,
        Some(&[EmployeeRole::LearningAdvisor]),
    )
    .await
}

pub async fn auth_manager(
    State((pool, config)): State<(PgPool, Config)>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(&pool, &config, request, next, Some(&[EmployeeRole::Manager])).await
}

pub async fn auth_staff(
    State((pool, config)): State<(PgPool, Config)>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(
        &pool,
        &config,
        request,
        next,
        Some(&[EmployeeRole::LearningAdvisor, EmployeeRole::Manager]),
    )
    .await
}

pub async fn auth_teacher_or_manager(
    State((pool, config)): State<(PgPool, Config)>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(
        &pool,
        &config,
        request,
        next,
        Some(&[EmployeeRole::Teacher, EmployeeRole::Manager]),
    )
    .await
}

pub async fn auth_teacher_or_advisor(
    State((pool, config)): State<(PgPool, Config)>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(
        &pool,
        &config,
        request,
        next,
        Some(&[EmployeeRole::Teacher, EmployeeRole::LearningAdvisor]),
    )
    .await
}

async fn authorize(
    pool: &PgPool,
    config: &Config,
    mut request: Request,
    next: Next,
    allowed_roles: Option<&[EmployeeRole]>,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

    let claims = verify_token(&token, &config.jwt_secret, TOKEN_TYPE_ACCESS)
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))?;

    if auth_repo::is_token_revoked(pool, &claims.jti).await? {
        return Err(AppError::Unauthorized("Token has been revoked".to_string()));
    }

    let employee = auth_repo::find_employee_by_id(pool, &claims.employee_id)
        .await?
        .ok_or_else(|| {
            AppError::Unauthorized("No employee profile linked to this account".to_string())
        })?;

    if let Some(allowed) = allowed_roles {
        if !allowed.contains(&employee.role) {
            return Err(AppError::Forbidden(format!(
                "Access denied for {}",
                employee.role.as_str()
            )));
        }
    }

    request.extensions_mut().insert(claims.clone());
    request.extensions_mut().insert(employee);
    Ok(next.run(request).await)
}

fn bearer_token(headers: &axum::http::HeaderMap) -> Option<String> {
    let header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())?;
    parse_bearer_token(header).map(str::to_string)
}

fn parse_bearer_token(header: &str) -> Option<&str> {
    let (scheme, rest) = header.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") {
        let token = rest.trim();
        if !token.is_empty() {
            return Some(token);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bearer_schemes_case_insensitively() {
        assert_eq!(parse_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(parse_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(parse_bearer_token("BEARER  abc "), Some("abc"));
    }

    #[test]
    fn rejects_other_schemes_and_empty_tokens() {
        assert_eq!(parse_bearer_token("Basic abc"), None);
        assert_eq!(parse_bearer_token("Bearer "), None);
        assert_eq!(parse_bearer_token("token-without-scheme"), None);
    }
}
