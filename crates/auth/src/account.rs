//! Account model (login identity bound to an employee).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use comercio_core::{AccountId, EmployeeId, RoleId};

/// A login identity as stored on the account row.
///
/// `secret` signs only this account's refresh tokens; it is generated once at
/// account creation and rotated on compromise. Rotation invalidates every
/// refresh token issued under the old value. Neither the secret nor the
/// password hash leaves the authentication core: both are skipped on
/// serialization and redacted from `Debug` output.
#[derive(Clone, Serialize)]
pub struct Account {
    pub id: AccountId,
    /// Unique, stored case-normalized (lowercase).
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub secret: String,
    pub role_id: RoleId,
    pub employee_id: EmployeeId,
    pub registered_at: DateTime<Utc>,
}

impl Account {
    /// The publicly shareable view of this account.
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id,
            username: self.username.clone(),
            role_id: self.role_id,
            employee_id: self.employee_id,
        }
    }
}

impl core::fmt::Debug for Account {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .field("secret", &"<redacted>")
            .field("role_id", &self.role_id)
            .field("employee_id", &self.employee_id)
            .field("registered_at", &self.registered_at)
            .finish()
    }
}

/// What a successful login returns about the account: no hash, no secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: AccountId,
    pub username: String,
    pub role_id: RoleId,
    pub employee_id: EmployeeId,
}

/// Normalize a username for lookup and storage: trimmed, lowercased.
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}
