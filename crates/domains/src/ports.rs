//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be wired into the server.
//! Implementations must be cheap to share behind an `Arc` across requests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::DomainResult;
use crate::models::{
    Account, Application, ApplicationCount, ApplicationFilter, ApplicationStatus, Opportunity,
    OpportunityCount, OpportunityQuery,
};

/// Credential store.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Persists a new account. Fails with `Conflict` when the email is taken.
    async fn insert(&self, account: Account) -> DomainResult<Account>;
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Account>>;
    /// `email` is expected to be normalized already.
    async fn find_by_email(&self, email: &str) -> DomainResult<Option<Account>>;
    /// Replaces the stored hash. Fails with `NotFound` when the account is gone.
    async fn set_password_hash(
        &self,
        id: Uuid,
        password_hash: String,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<Account>;
}

/// Opportunity persistence.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait OpportunityRepository: Send + Sync {
    async fn list(&self, query: &OpportunityQuery) -> DomainResult<Vec<Opportunity>>;
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Opportunity>>;
    /// Batch lookup; ids without a record are simply absent from the result.
    async fn find_many(&self, ids: &[Uuid]) -> DomainResult<Vec<Opportunity>>;
    async fn insert(&self, opportunity: Opportunity) -> DomainResult<Opportunity>;
    /// Overwrites an existing record. Returns `None` when it does not exist.
    async fn replace(&self, opportunity: Opportunity) -> DomainResult<Option<Opportunity>>;
    /// Hard delete. Returns whether a record was removed.
    async fn delete(&self, id: Uuid) -> DomainResult<bool>;
    async fn count(&self, predicate: &OpportunityCount) -> DomainResult<u64>;
}

/// Application persistence.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn insert(&self, application: Application) -> DomainResult<Application>;
    /// Newest first.
    async fn list(&self, filter: &ApplicationFilter) -> DomainResult<Vec<Application>>;
    /// `admin_notes: None` keeps the stored notes. Returns `None` when the
    /// application does not exist.
    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
        admin_notes: Option<String>,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<Option<Application>>;
    async fn count(&self, predicate: &ApplicationCount) -> DomainResult<u64>;
}

/// One-way password hashing.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> DomainResult<String>;
    /// Uses the algorithm's own verification routine; a malformed stored hash
    /// verifies as `false`.
    async fn verify(&self, password: &str, password_hash: &str) -> DomainResult<bool>;
}

/// Signed, time-limited bearer tokens.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TokenService: Send + Sync {
    fn issue(&self, account_id: Uuid) -> DomainResult<String>;
    /// Fails with `Unauthorized` on a bad signature, malformed token or
    /// elapsed expiry.
    fn verify(&self, token: &str) -> DomainResult<Uuid>;
}
