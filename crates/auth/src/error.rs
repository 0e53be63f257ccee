//! Error taxonomy for the authentication core.

use thiserror::Error;

/// Result type used across the authentication core.
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication/authorization failure.
///
/// Credential and token failures are deliberately flattened to one message per
/// flow: a caller cannot tell a missing username from a wrong password, or a
/// forged refresh token from one signed with a rotated secret. The internal
/// cause is logged before flattening, never returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Login failed. Covers unknown username and password mismatch alike.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Refresh failed. Covers undecodable tokens, unknown accounts, bad
    /// signatures, and elapsed expiry alike.
    #[error("invalid refresh token")]
    InvalidRefreshToken,

    /// Authenticated but lacking every required permission code.
    /// Carries no detail about which codes were missing.
    #[error("forbidden")]
    Forbidden,

    /// Codec-internal verification failure (signature, expiry, payload
    /// shape). Always translated to one of the opaque variants above before
    /// leaving the core.
    #[error("invalid token")]
    InvalidToken,

    /// Store unavailable or other unexpected failure. Surfaced to callers as
    /// a generic failure; the message is for server-side logs only.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<crate::store::StoreError> for AuthError {
    fn from(err: crate::store::StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}
