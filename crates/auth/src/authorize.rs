//! Role-based permission resolution and the authorization gate.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use comercio_core::{AccountId, PermissionId};

use crate::error::{AuthError, AuthResult};
use crate::store::PermissionStore;

/// A permission row granted to a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub id: PermissionId,
    /// Short code checked by routes, e.g. `archivos:get-any`.
    pub code: String,
    pub name: String,
}

/// Resolves the permission codes an account's role grants.
///
/// Every call reads the current role→permission assignment; there is no
/// cross-request cache, so revoking a permission takes effect on the next
/// check.
pub struct PermissionResolver {
    store: Arc<dyn PermissionStore>,
}

impl PermissionResolver {
    pub fn new(store: Arc<dyn PermissionStore>) -> Self {
        Self { store }
    }

    /// Permissions granted to the account's role, filtered to `codes`.
    ///
    /// An account without a resolvable role yields the empty set, which the
    /// gate treats as "no permissions" rather than an error (fail-closed).
    pub async fn resolve(
        &self,
        account_id: AccountId,
        codes: &[&str],
    ) -> AuthResult<Vec<PermissionGrant>> {
        let Some(role_id) = self.store.role_id_for_account(account_id).await? else {
            return Ok(Vec::new());
        };

        Ok(self.store.permissions_for_role(role_id, codes).await?)
    }
}

/// Allow/deny check consulted by protected operations.
///
/// Each protected operation declares the list of permission codes that may
/// reach it; the gate passes when the account's role holds **any** of them
/// (a route is often reachable by alternatives such as `read-any` OR
/// `read-own`). An empty requirement list always denies.
pub struct AuthorizationGate {
    resolver: PermissionResolver,
}

impl AuthorizationGate {
    pub fn new(resolver: PermissionResolver) -> Self {
        Self { resolver }
    }

    /// Pass iff the account's role grants at least one of `required`.
    ///
    /// `Forbidden` carries no hint of which codes were missing.
    pub async fn authorize(&self, account_id: AccountId, required: &[&str]) -> AuthResult<()> {
        if required.is_empty() {
            return Err(AuthError::Forbidden);
        }

        let granted = self.resolver.resolve(account_id, required).await?;
        if granted.iter().any(|g| required.contains(&g.code.as_str())) {
            Ok(())
        } else {
            tracing::debug!(account_id = %account_id, "authorization denied");
            Err(AuthError::Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    use async_trait::async_trait;

    use comercio_core::RoleId;

    use crate::store::StoreError;

    /// Role→permissions fixture with live reassignment.
    #[derive(Default)]
    struct StubPermissionStore {
        roles: RwLock<HashMap<i64, i64>>,
        grants: RwLock<HashMap<i64, Vec<PermissionGrant>>>,
    }

    impl StubPermissionStore {
        fn assign_role(&self, account: i64, role: i64) {
            self.roles.write().unwrap().insert(account, role);
        }

        fn grant(&self, role: i64, id: i64, code: &str) {
            self.grants.write().unwrap().entry(role).or_default().push(
                PermissionGrant {
                    id: PermissionId::new(id),
                    code: code.to_string(),
                    name: code.replace(':', " "),
                },
            );
        }

        fn revoke(&self, role: i64, code: &str) {
            if let Some(grants) = self.grants.write().unwrap().get_mut(&role) {
                grants.retain(|g| g.code != code);
            }
        }
    }

    #[async_trait]
    impl PermissionStore for StubPermissionStore {
        async fn role_id_for_account(
            &self,
            id: AccountId,
        ) -> Result<Option<RoleId>, StoreError> {
            Ok(self
                .roles
                .read()
                .unwrap()
                .get(&id.as_i64())
                .copied()
                .map(RoleId::new))
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
                .get(&role_id.as_i64())
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

    fn gate_with(store: Arc<StubPermissionStore>) -> AuthorizationGate {
        AuthorizationGate::new(PermissionResolver::new(store))
    }

    #[tokio::test]
    async fn passes_when_any_required_code_is_granted() {
        let store = Arc::new(StubPermissionStore::default());
        store.assign_role(1, 10);
        store.grant(10, 100, "archivos:get-any");

        let gate = gate_with(store);
        let result = gate
            .authorize(
                AccountId::new(1),
                &["archivos:get-any", "archivos:get-visible"],
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn revoking_the_granting_permission_flips_the_decision() {
        let store = Arc::new(StubPermissionStore::default());
        store.assign_role(1, 10);
        store.grant(10, 100, "archivos:get-any");

        let gate = gate_with(store.clone());
        let required = ["archivos:get-any", "archivos:get-visible"];

        assert!(gate.authorize(AccountId::new(1), &required).await.is_ok());

        store.revoke(10, "archivos:get-any");
        assert_eq!(
            gate.authorize(AccountId::new(1), &required).await,
            Err(AuthError::Forbidden)
        );
    }

    #[tokio::test]
    async fn empty_requirement_list_denies() {
        let store = Arc::new(StubPermissionStore::default());
        store.assign_role(1, 10);
        store.grant(10, 100, "archivos:get-any");

        let gate = gate_with(store);
        assert_eq!(
            gate.authorize(AccountId::new(1), &[]).await,
            Err(AuthError::Forbidden)
        );
    }

    #[tokio::test]
    async fn unknown_account_resolves_to_empty_set_and_denies() {
        let store = Arc::new(StubPermissionStore::default());
        let resolver = PermissionResolver::new(store.clone());

        let grants = resolver
            .resolve(AccountId::new(99), &["archivos:get-any"])
            .await
            .unwrap();
        assert!(grants.is_empty());

        let gate = gate_with(store);
        assert_eq!(
            gate.authorize(AccountId::new(99), &["archivos:get-any"]).await,
            Err(AuthError::Forbidden)
        );
    }

    #[tokio::test]
    async fn resolve_filters_to_the_allow_list() {
        let store = Arc::new(StubPermissionStore::default());
        store.assign_role(1, 10);
        store.grant(10, 100, "archivos:get-any");
        store.grant(10, 101, "ventas:create");

        let resolver = PermissionResolver::new(store);
        let grants = resolver
            .resolve(AccountId::new(1), &["archivos:get-any"])
            .await
            .unwrap();

        assert_eq!(grants.len(), 1);
        assert_eq!(grants[0].code, "archivos:get-any");
    }
}
