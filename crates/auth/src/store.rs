//! Store contracts consumed by the authentication core.
//!
//! The core never reaches for storage ambiently; every component takes its
//! store as an explicit dependency so implementations (Postgres, in-memory)
//! stay swappable and tests stay hermetic.

use async_trait::async_trait;
use thiserror::Error;

use comercio_core::{AccountId, RoleId};

use crate::account::Account;
use crate::authorize::PermissionGrant;

/// Store failure, opaque to callers of the core.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Account rows: lookup for login/refresh, secret rotation.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Look up by normalized username.
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Replace the account's refresh-signing secret. Single atomic row
    /// update; every refresh token signed with the old secret dies with it.
    async fn update_secret(&self, id: AccountId, secret: &str) -> Result<(), StoreError>;
}

/// Role→permission relations.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    async fn role_id_for_account(&self, id: AccountId) -> Result<Option<RoleId>, StoreError>;

    /// Permissions assigned to the role, filtered to the caller's allow-list
    /// so a check never loads the full permission table.
    async fn permissions_for_role(
        &self,
        role_id: RoleId,
        codes: &[&str],
    ) -> Result<Vec<PermissionGrant>, StoreError>;
}
