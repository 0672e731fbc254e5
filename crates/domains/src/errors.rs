//! # DomainError
//!
//! Centralized error handling for the RightPool ecosystem.
//! Every port and service returns these; the API layer maps each variant to
//! exactly one HTTP status.

use thiserror::Error;

/// The primary error type for all domain operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed, missing, or out-of-enum input
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing, invalid, or expired credentials
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found (e.g., Opportunity, Application)
    #[error("not found: {0}")]
    NotFound(String),

    /// Resource already exists (e.g., duplicate account email)
    #[error("conflict: {0}")]
    Conflict(String),

    /// The backing store did not answer in time or refused the connection
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Infrastructure failure (e.g., unexpected store error)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// The human-readable message without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m)
            | Self::Unauthorized(m)
            | Self::NotFound(m)
            | Self::Conflict(m)
            | Self::Unavailable(m)
            | Self::Internal(m) => m,
        }
    }

    /// True for failures caused by infrastructure rather than the caller.
    pub fn is_server_side(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Internal(_))
    }
}

/// A specialized Result type for domain logic.
pub type DomainResult<T> = std::result::Result<T, DomainError>;
