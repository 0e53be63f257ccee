//! Authentication endpoints: login, refresh, secret rotation, introspection.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Query},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::app::{AppServices, errors};
use crate::context::AccountContext;

/// Cookie carrying the refresh token: HTTP-only, secure, same-site, root
/// path, lifetime matching the token's.
const REFRESH_COOKIE: &str = "refresh_token";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckQuery {
    /// Comma-separated permission codes; the check passes on any of them.
    pub codes: String,
}

/// POST /auth/login
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(req): Json<LoginRequest>,
) -> axum::response::Response {
    match services.authenticator.login(&req.username, &req.password).await {
        Ok(outcome) => {
            let cookie = refresh_cookie(&outcome.refresh_token, services.codec.refresh_ttl_secs());

            let mut response = (
                StatusCode::OK,
                Json(json!({
                    "access_token": outcome.access_token,
                    "refresh_token": outcome.refresh_token,
                    "account": outcome.account,
                })),
            )
                .into_response();

            match HeaderValue::from_str(&cookie) {
                Ok(value) => {
                    response.headers_mut().insert(header::SET_COOKIE, value);
                }
                Err(e) => {
                    // Unreachable for a JWT value, which is ASCII.
                    tracing::debug!(error = %e, "refresh cookie not set: invalid header value");
                }
            }
            response
        }
        Err(e) => errors::auth_error_response(e),
    }
}

/// POST /auth/refresh
///
/// The refresh token is read from the JSON body when present, otherwise from
/// the refresh cookie set at login.
pub async fn refresh(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    body: Option<Json<RefreshRequest>>,
) -> axum::response::Response {
    let token = body
        .and_then(|Json(req)| req.refresh_token)
        .or_else(|| refresh_token_from_cookies(&headers));

    let Some(token) = token else {
        return errors::json_error(
            StatusCode::UNAUTHORIZED,
            "unauthorized",
            "invalid refresh token",
        );
    };

    match services.refresher.refresh(&token).await {
        Ok(outcome) => (
            StatusCode::OK,
            Json(json!({
                "access_token": outcome.access_token,
                "account_id": outcome.account_id,
            })),
        )
            .into_response(),
        Err(e) => errors::auth_error_response(e),
    }
}

/// GET /auth/me — the verified claims of the presented access token.
pub async fn me(Extension(ctx): Extension<AccountContext>) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(json!({
            "account_id": ctx.account_id(),
            "role_id": ctx.role_id(),
            "employee_id": ctx.employee_id(),
        })),
    )
        .into_response()
}

/// POST /auth/rotate — log out everywhere by rotating the refresh secret.
pub async fn rotate(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AccountContext>,
) -> axum::response::Response {
    match services.authenticator.rotate_secret(ctx.account_id()).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::auth_error_response(e),
    }
}

/// GET /auth/check?codes=a,b — run the authorization gate for the caller.
pub async fn check(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<AccountContext>,
    Query(query): Query<CheckQuery>,
) -> axum::response::Response {
    let codes: Vec<&str> = query
        .codes
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();

    match services.gate.authorize(ctx.account_id(), &codes).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::auth_error_response(e),
    }
}

fn refresh_cookie(token: &str, max_age_secs: i64) -> String {
    format!(
        "{REFRESH_COOKIE}={token}; HttpOnly; Secure; SameSite=Strict; Max-Age={max_age_secs}; Path=/"
    )
}

fn refresh_token_from_cookies(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;

    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == REFRESH_COOKIE).then(|| value.to_string())
    })
}
