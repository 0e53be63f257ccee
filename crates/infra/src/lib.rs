//! `comercio-infra` — implementations of the store contracts the
//! authentication core consumes.
//!
//! Postgres-backed stores for deployment, in-memory stores for dev/tests.

pub mod stores;

pub use stores::in_memory::{InMemoryAccountStore, InMemoryPermissionStore};
pub use stores::postgres::{PgAccountStore, PgPermissionStore};
