//! Postgres-backed account and permission stores.
//!
//! Thin query layer over the `accounts`, `permissions`, and
//! `role_permissions` tables. Uses the SQLx connection pool, which is
//! thread-safe; every operation is a single statement, so there is no
//! partial-commit state to roll back on cancellation.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};

use comercio_auth::{Account, AccountStore, PermissionGrant, PermissionStore, StoreError};
use comercio_core::{AccountId, PermissionId, RoleId};

pub struct PgAccountStore {
    pool: Arc<PgPool>,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

const ACCOUNT_COLUMNS: &str =
    "id, username, password_hash, secret, role_id, employee_id, registered_at";

fn account_from_row(row: &sqlx::postgres::PgRow) -> Result<Account, StoreError> {
    Ok(Account {
        id: AccountId::new(try_get(row, "id")?),
        username: try_get(row, "username")?,
        password_hash: try_get(row, "password_hash")?,
        secret: try_get(row, "secret")?,
        role_id: RoleId::new(try_get(row, "role_id")?),
        employee_id: comercio_core::EmployeeId::new(try_get(row, "employee_id")?),
        registered_at: try_get::<DateTime<Utc>>(row, "registered_at")?,
    })
}

fn try_get<'r, T>(row: &'r sqlx::postgres::PgRow, column: &str) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column)
        .map_err(|e| StoreError::backend(format!("column {column}: {e}")))
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE username = $1");
        let row = sqlx::query(&sql)
            .bind(username)
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.as_i64())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn update_secret(&self, id: AccountId, secret: &str) -> Result<(), StoreError> {
        sqlx::query("UPDATE accounts SET secret = $2 WHERE id = $1")
            .bind(id.as_i64())
            .bind(secret)
            .execute(&*self.pool)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;

        Ok(())
    }
}

pub struct PgPermissionStore {
    pool: Arc<PgPool>,
}

impl PgPermissionStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl PermissionStore for PgPermissionStore {
    async fn role_id_for_account(&self, id: AccountId) -> Result<Option<RoleId>, StoreError> {
        let row = sqlx::query("SELECT role_id FROM accounts WHERE id = $1")
            .bind(id.as_i64())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;

        row.map(|r| Ok(RoleId::new(try_get(&r, "role_id")?)))
            .transpose()
    }

    async fn permissions_for_role(
        &self,
        role_id: RoleId,
        codes: &[&str],
    ) -> Result<Vec<PermissionGrant>, StoreError> {
        let codes: Vec<String> = codes.iter().map(|c| c.to_string()).collect();

        let rows = sqlx::query(
            r#"
            SELECT p.id, p.code, p.name
            FROM permissions p
            JOIN role_permissions rp ON rp.permission_id = p.id
            WHERE rp.role_id = $1 AND p.code = ANY($2)
            "#,
        )
        .bind(role_id.as_i64())
        .bind(&codes)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| StoreError::backend(e.to_string()))?;

        rows.iter()
            .map(|row| {
                Ok(PermissionGrant {
                    id: PermissionId::new(try_get(row, "id")?),
                    code: try_get(row, "code")?,
                    name: try_get(row, "name")?,
                })
            })
            .collect()
    }
}
