//! Silent renewal: exchange a live refresh token for a fresh access token.

use std::sync::Arc;

use serde::Serialize;

use comercio_core::AccountId;

use crate::codec::TokenCodec;
use crate::error::{AuthError, AuthResult};
use crate::store::AccountStore;

/// A successful refresh. The refresh token itself is not renewed; its
/// lifetime is fixed at issuance.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshOutcome {
    pub access_token: String,
    pub account_id: AccountId,
}

/// Validates a presented refresh token and re-issues an access token.
pub struct TokenRefresher {
    accounts: Arc<dyn AccountStore>,
    codec: Arc<TokenCodec>,
}

impl TokenRefresher {
    pub fn new(accounts: Arc<dyn AccountStore>, codec: Arc<TokenCodec>) -> Self {
        Self { accounts, codec }
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The token is first decoded without verification, only to discover
    /// which account's secret to check against; its claims are not trusted
    /// until that secret confirms the signature. Every failure path — an
    /// undecodable token, an unknown account, a bad signature, elapsed
    /// expiry — collapses to the same `InvalidRefreshToken`, so a caller
    /// cannot probe which accounts or tokens exist.
    ///
    /// Role and employee are read from the freshly loaded row, not from any
    /// token, so a role change takes effect here without re-login.
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<RefreshOutcome> {
        let Some(claimed) = self.codec.decode(refresh_token) else {
            tracing::debug!("refresh failed: token did not decode");
            return Err(AuthError::InvalidRefreshToken);
        };

        let Some(account) = self.accounts.find_by_id(claimed.sub).await? else {
            tracing::debug!(account_id = %claimed.sub, "refresh failed: unknown account");
            return Err(AuthError::InvalidRefreshToken);
        };

        if let Err(e) = self
            .codec
            .verify_refresh_token(refresh_token, &account.secret)
        {
            tracing::debug!(account_id = %account.id, error = %e, "refresh failed: verification");
            return Err(AuthError::InvalidRefreshToken);
        }

        let access_token =
            self.codec
                .sign_access_token(account.id, account.role_id, account.employee_id)?;

        tracing::debug!(account_id = %account.id, "access token refreshed");

        Ok(RefreshOutcome {
            access_token,
            account_id: account.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use comercio_core::RoleId;

    use crate::codec::random_secret;
    use crate::codec::tests::TestClock;
    use crate::login::Authenticator;
    use crate::login::tests::{StubAccountStore, seeded_account, test_codec};

    async fn logged_in(
        store: &Arc<StubAccountStore>,
        codec: &Arc<TokenCodec>,
        username: &str,
        password: &str,
    ) -> String {
        Authenticator::new(store.clone(), codec.clone())
            .login(username, password)
            .await
            .unwrap()
            .refresh_token
    }

    #[tokio::test]
    async fn refresh_issues_a_new_access_token_for_the_same_account() {
        let store = Arc::new(StubAccountStore::default());
        store.insert(seeded_account(1, "alice", "pw"));

        let clock = TestClock::at(1_000);
        let codec = test_codec(&clock);
        let refresh_token = logged_in(&store, &codec, "alice", "pw").await;

        let refresher = TokenRefresher::new(store, codec.clone());
        let outcome = refresher.refresh(&refresh_token).await.unwrap();

        assert_eq!(outcome.account_id, AccountId::new(1));

        let claims = codec.verify_access_token(&outcome.access_token).unwrap();
        assert_eq!(claims.sub, AccountId::new(1));
    }

    #[tokio::test]
    async fn refresh_picks_up_a_role_change_from_the_store() {
        let store = Arc::new(StubAccountStore::default());
        let mut account = seeded_account(1, "alice", "pw");
        account.role_id = RoleId::new(1);
        store.insert(account);

        let clock = TestClock::at(1_000);
        let codec = test_codec(&clock);
        let refresh_token = logged_in(&store, &codec, "alice", "pw").await;

        // Reassign the role behind the refresher's back.
        let mut changed = seeded_account(1, "alice", "pw");
        changed.role_id = RoleId::new(9);
        changed.secret = store.secret_of(AccountId::new(1));
        store.insert(changed);

        let refresher = TokenRefresher::new(store, codec.clone());
        let outcome = refresher.refresh(&refresh_token).await.unwrap();

        let claims = codec.verify_access_token(&outcome.access_token).unwrap();
        assert_eq!(claims.role_id, RoleId::new(9));
    }

    #[tokio::test]
    async fn rotating_the_secret_invalidates_outstanding_refresh_tokens() {
        let store = Arc::new(StubAccountStore::default());
        store.insert(seeded_account(1, "alice", "pw"));

        let clock = TestClock::at(1_000);
        let codec = test_codec(&clock);
        let refresh_token = logged_in(&store, &codec, "alice", "pw").await;

        let refresher = TokenRefresher::new(store.clone(), codec.clone());
        assert!(refresher.refresh(&refresh_token).await.is_ok());

        Authenticator::new(store, codec)
            .rotate_secret(AccountId::new(1))
            .await
            .unwrap();

        assert_eq!(
            refresher.refresh(&refresh_token).await.unwrap_err(),
            AuthError::InvalidRefreshToken
        );
    }

    #[tokio::test]
    async fn expired_refresh_token_is_rejected() {
        let store = Arc::new(StubAccountStore::default());
        store.insert(seeded_account(1, "alice", "pw"));

        let clock = TestClock::at(1_000);
        let codec = test_codec(&clock);
        let refresh_token = logged_in(&store, &codec, "alice", "pw").await;

        clock.advance(codec.refresh_ttl_secs() + 1);

        let refresher = TokenRefresher::new(store, codec);
        assert_eq!(
            refresher.refresh(&refresh_token).await.unwrap_err(),
            AuthError::InvalidRefreshToken
        );
    }

    #[tokio::test]
    async fn failure_paths_collapse_to_one_opaque_error() {
        let store = Arc::new(StubAccountStore::default());
        store.insert(seeded_account(1, "alice", "pw"));

        let clock = TestClock::at(1_000);
        let codec = test_codec(&clock);
        let refresher = TokenRefresher::new(store, codec.clone());

        // Garbage that is not even a token.
        let garbage = refresher.refresh("not-a-token").await.unwrap_err();

        // Well-formed token for an account that does not exist.
        let phantom = codec
            .sign_refresh_token(AccountId::new(999), &random_secret())
            .unwrap();
        let unknown = refresher.refresh(&phantom).await.unwrap_err();

        // Well-formed token for a real account, wrong signing secret.
        let forged = codec
            .sign_refresh_token(AccountId::new(1), &random_secret())
            .unwrap();
        let bad_signature = refresher.refresh(&forged).await.unwrap_err();

        assert_eq!(garbage, AuthError::InvalidRefreshToken);
        assert_eq!(garbage, unknown);
        assert_eq!(unknown, bad_signature);
    }
}
