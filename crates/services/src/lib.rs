//! # services
//!
//! Use-case layer. Each service owns `Arc`s of the ports it needs and turns
//! requests into port calls; none of them know which adapter sits behind a
//! port.

pub mod applications;
pub mod auth;
pub mod dashboard;
pub mod opportunities;

pub use applications::ApplicationService;
pub use auth::{AuthService, SessionToken};
pub use dashboard::DashboardService;
pub use opportunities::OpportunityService;

use domains::{DomainError, DomainResult};
use uuid::Uuid;

/// Parses a path identifier. A malformed id cannot name an existing record,
/// so it reports the same `NotFound` as a missing one.
pub(crate) fn parse_id(raw: &str, not_found: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| DomainError::not_found(not_found))
}
