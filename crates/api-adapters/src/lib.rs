//! # api-adapters
//!
//! HTTP surface for the portal. The axum adapter lives behind the
//! `web-axum` feature; the envelope and metrics types are framework-neutral.

pub mod envelope;
pub mod metrics;

#[cfg(feature = "web-axum")]
pub mod web;

pub use envelope::Envelope;
pub use metrics::HttpMetrics;
