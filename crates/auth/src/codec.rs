//! Signed token creation and parsing.
//!
//! Two token kinds flow through here: short-lived access tokens signed with
//! one process-wide secret, and long-lived refresh tokens signed with the
//! secret stored on the account row they belong to. `decode` is an untrusted
//! peek (no signature check) used to discover which account's secret to
//! verify against; nothing from it is trusted until `verify_refresh` confirms
//! it with the matching secret.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::RngCore;
use rand::rngs::OsRng;

use comercio_core::{AccountId, EmployeeId, RoleId};

use crate::claims::{AccessClaims, RefreshClaims, validate_time_window};
use crate::clock::Clock;
use crate::error::{AuthError, AuthResult};

/// Byte length of a per-account refresh signing secret (hex-encoded to 64
/// characters for storage).
const SECRET_LEN: usize = 32;

/// Token configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Process-wide secret used to sign access tokens.
    pub secret: String,
    /// Access token lifetime in seconds.
    pub access_ttl_secs: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_ttl_secs: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: String::new(), // must be supplied by the caller
            access_ttl_secs: 15 * 60,
            refresh_ttl_secs: 7 * 24 * 60 * 60,
        }
    }
}

impl AuthConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> AuthResult<()> {
        if self.secret.is_empty() {
            return Err(AuthError::internal("signing secret is not configured"));
        }
        if self.secret.len() < 32 {
            tracing::warn!("signing secret is shorter than recommended (32 bytes)");
        }
        if self.access_ttl_secs <= 0 || self.refresh_ttl_secs <= 0 {
            return Err(AuthError::internal("token ttls must be positive"));
        }
        Ok(())
    }
}

/// Creates and parses signed tokens (HS256).
///
/// Signing and verification are pure and in-memory; the only inputs besides
/// the token are the configured/supplied secrets and the injected clock.
pub struct TokenCodec {
    config: AuthConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    clock: Arc<dyn Clock>,
}

impl TokenCodec {
    pub fn new(config: AuthConfig, clock: Arc<dyn Clock>) -> AuthResult<Self> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Ok(Self {
            config,
            encoding_key,
            decoding_key,
            clock,
        })
    }

    pub fn access_ttl_secs(&self) -> i64 {
        self.config.access_ttl_secs
    }

    pub fn refresh_ttl_secs(&self) -> i64 {
        self.config.refresh_ttl_secs
    }

    /// Sign a short-lived access token with the process-wide secret.
    pub fn sign_access_token(
        &self,
        sub: AccountId,
        role_id: RoleId,
        employee_id: EmployeeId,
    ) -> AuthResult<String> {
        let iat = self.clock.now().timestamp();
        let claims = AccessClaims {
            sub,
            role_id,
            employee_id,
            iat,
            exp: iat + self.config.access_ttl_secs,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::internal(format!("failed to sign access token: {e}")))
    }

    /// Sign a long-lived refresh token with the account's own secret.
    pub fn sign_refresh_token(&self, sub: AccountId, secret: &str) -> AuthResult<String> {
        let iat = self.clock.now().timestamp();
        let claims = RefreshClaims {
            sub,
            iat,
            exp: iat + self.config.refresh_ttl_secs,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .map_err(|e| AuthError::internal(format!("failed to sign refresh token: {e}")))
    }

    /// Generate a fresh account secret and sign a refresh token with it.
    ///
    /// Used at account creation, before the account row has a secret to sign
    /// with. Returns `(token, secret)`; the caller persists the secret.
    pub fn sign_refresh_token_with_new_secret(
        &self,
        sub: AccountId,
    ) -> AuthResult<(String, String)> {
        let secret = random_secret();
        let token = self.sign_refresh_token(sub, &secret)?;
        Ok((token, secret))
    }

    /// Untrusted peek at a refresh token's payload.
    ///
    /// No signature or expiry check; malformed input yields `None`. The
    /// claims are only good for deciding which account to load.
    pub fn decode(&self, token: &str) -> Option<RefreshClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;

        decode::<RefreshClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .ok()
            .map(|data| data.claims)
    }

    /// Fully validate an access token against the process-wide secret.
    pub fn verify_access_token(&self, token: &str) -> AuthResult<AccessClaims> {
        let data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation())
            .map_err(|e| {
                tracing::debug!(error = %e, "access token verification failed");
                AuthError::InvalidToken
            })?;

        validate_time_window(data.claims.iat, data.claims.exp, self.clock.now())?;
        Ok(data.claims)
    }

    /// Fully validate a refresh token against the given account secret.
    pub fn verify_refresh_token(&self, token: &str, secret: &str) -> AuthResult<RefreshClaims> {
        let data = decode::<RefreshClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &self.validation(),
        )
        .map_err(|e| {
            tracing::debug!(error = %e, "refresh token verification failed");
            AuthError::InvalidToken
        })?;

        validate_time_window(data.claims.iat, data.claims.exp, self.clock.now())?;
        Ok(data.claims)
    }

    // Expiry is validated against the injected clock, not the library's
    // wall-clock check.
    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation
    }
}

impl core::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("access_ttl_secs", &self.config.access_ttl_secs)
            .field("refresh_ttl_secs", &self.config.refresh_ttl_secs)
            .finish()
    }
}

/// Cryptographically strong random secret, fixed length, hex-encoded.
pub fn random_secret() -> String {
    let mut bytes = [0u8; SECRET_LEN];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
