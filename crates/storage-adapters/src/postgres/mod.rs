//! # PostgreSQL store
//!
//! One pool serves all three repository ports. Every call is bounded by
//! [`with_timeout`](crate::timeout::with_timeout); the pool's acquire timeout
//! uses the same bound.

mod accounts;
mod applications;
mod opportunities;

use std::time::Duration;

use domains::{DomainError, DomainResult, TimeWindow};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};

/// Postgres-backed implementation of every repository port.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
    timeout: Duration,
}

impl PostgresStore {
    /// Connects and verifies the server answers within `timeout`.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        timeout: Duration,
    ) -> DomainResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(timeout)
            .connect(database_url)
            .await
            .map_err(|e| DomainError::unavailable(format!("cannot reach database: {}", e)))?;
        tracing::info!(max_connections, timeout_ms = timeout.as_millis() as u64, "postgres pool ready");
        Ok(Self { pool, timeout })
    }

    /// Applies the embedded migrations.
    pub async fn migrate(&self) -> DomainResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DomainError::internal(format!("migration failed: {}", e)))?;
        tracing::info!("migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Translates driver errors into domain errors.
fn store_error(e: sqlx::Error) -> DomainError {
    match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DomainError::conflict("A record with that value already exists")
        }
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            DomainError::unavailable(e.to_string())
        }
        other => {
            tracing::error!(error = %other, "postgres call failed");
            DomainError::internal(other.to_string())
        }
    }
}

/// A stored value that no longer parses as its domain type.
fn corrupt(column: &str, e: DomainError) -> DomainError {
    DomainError::internal(format!("corrupt `{}` column: {}", column, e.message()))
}

fn push_window(qb: &mut QueryBuilder<'_, Postgres>, column: &'static str, window: &TimeWindow) {
    if let Some(start) = window.start {
        qb.push(" AND ").push(column).push(" >= ").push_bind(start);
    }
    if let Some(end) = window.end {
        let op = if window.end_inclusive { " <= " } else { " < " };
        qb.push(" AND ").push(column).push(op).push_bind(end);
    }
}
