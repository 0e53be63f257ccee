use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use comercio_auth::AuthError;

/// Map a core auth failure to its outward-facing response.
///
/// The flattened 401 messages come from the error itself (one fixed message
/// per flow); 403 and 500 deliberately carry no internal detail.
pub fn auth_error_response(err: AuthError) -> axum::response::Response {
    match err {
        AuthError::InvalidCredentials | AuthError::InvalidRefreshToken => {
            json_error(StatusCode::UNAUTHORIZED, "unauthorized", err.to_string())
        }
        AuthError::InvalidToken => {
            // Codec-internal signal; should have been translated inside the
            // core. Treat a leak as a plain 401.
            json_error(StatusCode::UNAUTHORIZED, "unauthorized", "unauthorized")
        }
        AuthError::Forbidden => json_error(StatusCode::FORBIDDEN, "forbidden", "forbidden"),
        AuthError::Internal(detail) => {
            tracing::error!(%detail, "request failed with internal error");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal error",
            )
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
