//! Generic secret store trait.
//!
//! The provisioner depends on this trait rather than on the concrete Secret
//! Manager client, so tests can substitute an in-memory store and the client
//! handle can be built once in `main` and injected.

use crate::vault::error::VaultResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::time::Duration;

/// Metadata for a stored secret, as reported by the vault.
#[derive(Debug, Clone)]
pub struct SecretRecord {
    /// Secret identifier within the project
    pub secret_id: String,
    /// Creation timestamp
    pub create_time: Option<DateTime<Utc>>,
    /// Vault-enforced expiry timestamp
    pub expire_time: Option<DateTime<Utc>>,
    /// User labels attached at creation
    pub labels: HashMap<String, String>,
}

/// Key-value secret store with per-entry TTL.
#[async_trait]
pub trait SecretStore: Send + Sync {
    /// Fetch a secret's metadata. Fails with `SecretNotFound` if absent.
    async fn get_secret(&self, secret_id: &str) -> VaultResult<SecretRecord>;

    /// Create a secret entry with a TTL and labels. Fails with
    /// `AlreadyExists` if another writer got there first.
    async fn create_secret(
        &self,
        secret_id: &str,
        ttl: Duration,
        labels: HashMap<String, String>,
    ) -> VaultResult<()>;

    /// Store a new value for an existing secret.
    async fn put_value(&self, secret_id: &str, data: &[u8]) -> VaultResult<()>;

    /// Fetch the current value of a secret.
    async fn get_value(&self, secret_id: &str) -> VaultResult<Vec<u8>>;
}
