//! # storage-adapters
//!
//! Implementations of the repository ports.
//!
//! - [`memory`] is always compiled. It backs the test suite and a server
//!   started without a database URL.
//! - `postgres` (feature `db-postgres`) is the durable store, with embedded
//!   migrations.

pub mod memory;
pub mod timeout;

#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use memory::{MemoryAccountRepository, MemoryApplicationRepository, MemoryOpportunityRepository};
#[cfg(feature = "db-postgres")]
pub use postgres::PostgresStore;
