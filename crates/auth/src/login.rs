//! Login orchestration: credentials in, token pair out.

use std::sync::Arc;

use serde::Serialize;

use comercio_core::AccountId;

use crate::account::{AccountSummary, normalize_username};
use crate::codec::{TokenCodec, random_secret};
use crate::error::{AuthError, AuthResult};
use crate::password;
use crate::store::AccountStore;

/// A successful login: tokens plus the public view of the account.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub access_token: String,
    pub refresh_token: String,
    pub account: AccountSummary,
}

/// Verifies credentials and mints the access/refresh token pair.
///
/// Read-only against the account store during login; nothing is persisted
/// because the account's refresh secret already exists from registration.
pub struct Authenticator {
    accounts: Arc<dyn AccountStore>,
    codec: Arc<TokenCodec>,
}

impl Authenticator {
    pub fn new(accounts: Arc<dyn AccountStore>, codec: Arc<TokenCodec>) -> Self {
        Self { accounts, codec }
    }

    /// Authenticate a username/password pair.
    ///
    /// An unknown username and a wrong password return the same
    /// `InvalidCredentials` value, so responses cannot be used to enumerate
    /// usernames.
    pub async fn login(&self, username: &str, password: &str) -> AuthResult<LoginOutcome> {
        let username = normalize_username(username);

        let Some(account) = self.accounts.find_by_username(&username).await? else {
            tracing::debug!(%username, "login failed: unknown username");
            return Err(AuthError::InvalidCredentials);
        };

        if !password::compare(password, &account.password_hash) {
            tracing::debug!(account_id = %account.id, "login failed: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let access_token =
            self.codec
                .sign_access_token(account.id, account.role_id, account.employee_id)?;
        let refresh_token = self.codec.sign_refresh_token(account.id, &account.secret)?;

        tracing::info!(account_id = %account.id, "login succeeded");

        Ok(LoginOutcome {
            access_token,
            refresh_token,
            account: account.summary(),
        })
    }

    /// Replace the account's refresh-signing secret with a fresh random one.
    ///
    /// Coarse-grained revocation: every refresh token issued under the old
    /// secret stops verifying at once. Used on suspected compromise or as a
    /// "log out everywhere".
    pub async fn rotate_secret(&self, account_id: AccountId) -> AuthResult<()> {
        let secret = random_secret();
        self.accounts.update_secret(account_id, &secret).await?;
        tracing::info!(%account_id, "refresh secret rotated");
        Ok(())
    }
}
