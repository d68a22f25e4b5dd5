//! Auth URL provisioning service.
//!
//! Wraps Google Secret Manager behind a single HTTP operation: given a tenant
//! and an OAuth provider name, store a deterministic authentication URL as a
//! secret with a 7-day TTL, or return the one already stored together with its
//! remaining lifetime.

#![forbid(unsafe_code)]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod provision;
pub mod vault;

// Re-exports for convenience
pub use config::Config;
pub use error::ServiceError;
pub use provision::Provisioner;
