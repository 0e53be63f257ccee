//! Token claims (transport-agnostic payloads).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use comercio_core::{AccountId, EmployeeId, RoleId};

use crate::error::{AuthError, AuthResult};

/// Claims carried by a short-lived access token.
///
/// Stateless: signature plus time window fully determine validity, no store
/// lookup needed. Timestamps are unix seconds per JWT convention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject: the authenticated account.
    pub sub: AccountId,
    pub role_id: RoleId,
    pub employee_id: EmployeeId,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiry, unix seconds.
    pub exp: i64,
}

/// Claims carried by a long-lived refresh token.
///
/// Only asserts the account; role/employee are re-read from the store when a
/// new access token is minted, so a role change takes effect on next refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject: the account whose secret signed this token.
    pub sub: AccountId,
    pub iat: i64,
    pub exp: i64,
}

/// Deterministically validate a token's time window against `now`.
///
/// The codec disables the JWT library's own expiry check and runs this
/// instead, so validation follows the injected clock.
pub fn validate_time_window(iat: i64, exp: i64, now: DateTime<Utc>) -> AuthResult<()> {
    if exp <= iat {
        return Err(AuthError::InvalidToken);
    }
    if now.timestamp() >= exp {
        return Err(AuthError::InvalidToken);
    }
    Ok(())
}
