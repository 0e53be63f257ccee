//! In-memory account and permission stores.
//!
//! Intended for tests/dev. Not optimized for performance.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use comercio_auth::{Account, AccountStore, PermissionGrant, PermissionStore, StoreError};
use comercio_core::{AccountId, PermissionId, RoleId};

#[derive(Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<AccountId, Account>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account. Registration is outside the auth core's contracts,
    /// so this is a plain helper rather than part of `AccountStore`.
    pub fn insert(&self, account: Account) {
        self.accounts.write().unwrap().insert(account.id, account);
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .accounts
            .read()
            .unwrap()
            .values()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.read().unwrap().get(&id).cloned())
    }

    async fn update_secret(&self, id: AccountId, secret: &str) -> Result<(), StoreError> {
        match self.accounts.write().unwrap().get_mut(&id) {
            Some(account) => {
                account.secret = secret.to_string();
                Ok(())
            }
            None => Err(StoreError::backend(format!("no account row {id}"))),
        }
    }
}

#[derive(Default)]
pub struct InMemoryPermissionStore {
    roles: RwLock<HashMap<AccountId, RoleId>>,
    grants: RwLock<HashMap<RoleId, Vec<PermissionGrant>>>,
}

impl InMemoryPermissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign_role(&self, account_id: AccountId, role_id: RoleId) {
        self.roles.write().unwrap().insert(account_id, role_id);
    }

    pub fn grant(&self, role_id: RoleId, id: PermissionId, code: &str, name: &str) {
        self.grants
            .write()
            .unwrap()
            .entry(role_id)
            .or_default()
            .push(PermissionGrant {
                id,
                code: code.to_string(),
                name: name.to_string(),
            });
    }

    pub fn revoke(&self, role_id: RoleId, code: &str) {
        if let Some(grants) = self.grants.write().unwrap().get_mut(&role_id) {
            grants.retain(|g| g.code != code);
        }
    }
}

#[async_trait]
impl PermissionStore for InMemoryPermissionStore {
    async fn role_id_for_account(&self, id: AccountId) -> Result<Option<RoleId>, StoreError> {
        Ok(self.roles.read().unwrap().get(&id).copied())
    }

    async fn permissions_for_role(
        &self,
        role_id: RoleId,
        codes: &[&str],
    ) -> Result<Vec<PermissionGrant>, StoreError> {
        Ok(self
            .grants
            .read()
            .unwrap()
            .get(&role_id)
            .map(|grants| {
                grants
                    .iter()
                    .filter(|g| codes.contains(&g.code.as_str()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use comercio_core::EmployeeId;

    fn account(id: i64, username: &str) -> Account {
        Account {
            id: AccountId::new(id),
            username: username.to_string(),
            password_hash: String::new(),
            secret: "s1".to_string(),
            role_id: RoleId::new(1),
            employee_id: EmployeeId::new(1),
            registered_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn account_lookup_by_username_and_id() {
        let store = InMemoryAccountStore::new();
        store.insert(account(1, "alice"));

        assert!(store.find_by_username("alice").await.unwrap().is_some());
        assert!(store.find_by_username("bob").await.unwrap().is_none());
        assert!(store.find_by_id(AccountId::new(1)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn update_secret_on_missing_row_is_a_store_error() {
        let store = InMemoryAccountStore::new();
        assert!(
            store
                .update_secret(AccountId::new(404), "new")
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn permissions_filter_to_the_requested_codes() {
        let store = InMemoryPermissionStore::new();
        store.assign_role(AccountId::new(1), RoleId::new(10));
        store.grant(RoleId::new(10), PermissionId::new(1), "a:read", "Read A");
        store.grant(RoleId::new(10), PermissionId::new(2), "b:read", "Read B");

        let grants = store
            .permissions_for_role(RoleId::new(10), &["a:read"])
            .await
            .unwrap();

        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].code, "a:read");
    }
}
