//! Secret vault integration.
//!
//! `SecretStore` is the seam the provisioner depends on;
//! `SecretManagerClient` is the production implementation against the Google
//! Secret Manager REST API.

pub mod client;
pub mod config;
pub mod error;
pub mod store;
pub mod types;

pub use client::SecretManagerClient;
pub use config::VaultConfig;
pub use error::{VaultError, VaultResult};
pub use store::{SecretRecord, SecretStore};
