//! `comercio-auth` — authentication and authorization core.
//!
//! Token issuance/rotation (access + per-account refresh tokens), credential
//! verification, and the role→permission authorization gate. Storage is
//! reached only through the contracts in [`store`]; HTTP lives elsewhere.

pub mod account;
pub mod authorize;
pub mod claims;
pub mod clock;
pub mod codec;
pub mod error;
pub mod login;
pub mod password;
pub mod refresh;
pub mod store;

pub use account::{Account, AccountSummary};
pub use authorize::{AuthorizationGate, PermissionGrant, PermissionResolver};
pub use claims::{AccessClaims, RefreshClaims};
pub use clock::{Clock, SystemClock};
pub use codec::{AuthConfig, TokenCodec};
pub use error::{AuthError, AuthResult};
pub use login::{Authenticator, LoginOutcome};
pub use refresh::{RefreshOutcome, TokenRefresher};
pub use store::{AccountStore, PermissionStore, StoreError};
