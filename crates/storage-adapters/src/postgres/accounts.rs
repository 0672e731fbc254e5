use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::{Account, AccountRepository, DomainError, DomainResult};
use sqlx::postgres::PgRow;
use sqlx::Row;
use uuid::Uuid;

use super::{store_error, PostgresStore};
use crate::timeout::with_timeout;

fn account_from_row(row: &PgRow) -> Result<Account, sqlx::Error> {
    Ok(Account {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl AccountRepository for PostgresStore {
    async fn insert(&self, account: Account) -> DomainResult<Account> {
        with_timeout(self.timeout, "insert account", async {
            let row = sqlx::query(
                "INSERT INTO accounts (id, email, password_hash, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5) RETURNING *",
            )
            .bind(account.id)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(account.created_at)
            .bind(account.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match store_error(e) {
                DomainError::Conflict(_) => DomainError::conflict(format!(
                    "An account with email {} already exists",
                    account.email
                )),
                other => other,
            })?;
            account_from_row(&row).map_err(store_error)
        })
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Account>> {
        with_timeout(self.timeout, "find account", async {
            let row = sqlx::query("SELECT * FROM accounts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(store_error)?;
            row.as_ref().map(account_from_row).transpose().map_err(store_error)
        })
        .await
    }

    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Account>> {
        with_timeout(self.timeout, "find account by email", async {
            let row = sqlx::query("SELECT * FROM accounts WHERE lower(email) = lower($1)")
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(store_error)?;
            row.as_ref().map(account_from_row).transpose().map_err(store_error)
        })
        .await
    }

    async fn set_password_hash(
        &self,
        id: Uuid,
        password_hash: String,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<Account> {
        with_timeout(self.timeout, "update password", async {
            let row = sqlx::query(
                "UPDATE accounts SET password_hash = $2, updated_at = $3 WHERE id = $1 RETURNING *",
            )
            .bind(id)
            .bind(&password_hash)
            .bind(updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?
            .ok_or_else(|| DomainError::not_found("User no longer exists."))?;
            account_from_row(&row).map_err(store_error)
        })
        .await
    }
}
