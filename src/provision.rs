//! Idempotent secret provisioning workflow.
//!
//! Maps `(tenant, provider)` to a stored authentication URL: read the
//! per-tenant secret if it exists, otherwise create it with a fixed 7-day TTL
//! and store the freshly built URL as its first value. The secret key is
//! per tenant only; the provider is recorded as a label, so a repeat call with
//! a different provider reuses the same slot.

use crate::error::ServiceError;
use crate::vault::{SecretRecord, SecretStore, VaultError};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// TTL applied to newly created secrets: 7 days.
pub const SECRET_TTL: Duration = Duration::from_secs(604_800);

/// Hours subtracted from "now" before computing remaining lifetime.
///
/// Clock-skew/grace buffer between this service and the vault's authoritative
/// expiry. Kept exactly as the service has always computed it.
const EXPIRY_SKEW_HOURS: i64 = 6;

/// Outcome of a provisioning call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvisionStatus {
    /// A live secret was already stored; nothing was modified
    Exists,
    /// A new secret was created with the full TTL
    Created,
}

/// Response body of the provisioning operation.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionResult {
    /// `exists` or `created`
    pub status: ProvisionStatus,
    /// Human-readable summary
    pub message: String,
    /// The per-tenant secret key
    pub secret_id: String,
    /// The stored (or freshly built) authentication URL
    pub url: String,
    /// Remaining lifetime; absent on the create path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_seconds: Option<i64>,
}

/// Provisions per-tenant auth URL secrets against an injected store.
pub struct Provisioner {
    store: Arc<dyn SecretStore>,
    base_url: String,
}

impl Provisioner {
    /// Create a provisioner over the given store.
    pub fn new(store: Arc<dyn SecretStore>, base_url: impl Into<String>) -> Self {
        Self {
            store,
            base_url: base_url.into(),
        }
    }

    /// Derive the per-tenant secret key.
    #[must_use]
    pub fn secret_id(tenant_id: i64) -> String {
        format!("auth_url_{tenant_id}")
    }

    /// Read-or-create the auth URL secret for a tenant.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty provider, `Forbidden` when the vault denies
    /// access, `Vault` for any other store failure.
    pub async fn provision(
        &self,
        tenant_id: i64,
        provider: &str,
    ) -> Result<ProvisionResult, ServiceError> {
        let provider = normalize_provider(provider)?;
        let secret_id = Self::secret_id(tenant_id);

        match self.store.get_secret(&secret_id).await {
            Ok(record) => self.existing(record).await,
            Err(VaultError::SecretNotFound(_)) => {
                self.create(tenant_id, &provider, &secret_id).await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn create(
        &self,
        tenant_id: i64,
        provider: &str,
        secret_id: &str,
    ) -> Result<ProvisionResult, ServiceError> {
        let url = format!(
            "{}/auth/{provider}/start?client_id={tenant_id}",
            self.base_url
        );
        let labels = HashMap::from([
            ("type".to_string(), "auth_url".to_string()),
            ("provider".to_string(), provider.to_string()),
        ]);

        match self.store.create_secret(secret_id, SECRET_TTL, labels).await {
            Ok(()) => {
                self.store.put_value(secret_id, url.as_bytes()).await?;
                info!(secret_id, provider, "Provisioned auth URL secret");
                Ok(ProvisionResult {
                    status: ProvisionStatus::Created,
                    message: "Created secret with 7-day TTL.".to_string(),
                    secret_id: secret_id.to_string(),
                    url,
                    expires_in_seconds: None,
                })
            }
            // Lost the read-then-create race; the concurrent creation wins.
            Err(VaultError::AlreadyExists(_)) => {
                debug!(secret_id, "Secret created concurrently, returning stored value");
                let record = self.store.get_secret(secret_id).await?;
                self.existing(record).await
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn existing(&self, record: SecretRecord) -> Result<ProvisionResult, ServiceError> {
        let expires_in_seconds = record
            .expire_time
            .map(|expire| remaining_seconds(expire, Utc::now()));

        let value = self.store.get_value(&record.secret_id).await?;
        let url = String::from_utf8(value)
            .map_err(|e| ServiceError::Vault(format!("Stored URL is not UTF-8: {e}")))?;

        Ok(ProvisionResult {
            status: ProvisionStatus::Exists,
            message: "URL already stored in Secret Manager; left unchanged.".to_string(),
            secret_id: record.secret_id,
            url,
            expires_in_seconds,
        })
    }
}

/// Trim and lowercase the provider name; empty input is rejected.
pub fn normalize_provider(raw: &str) -> Result<String, ServiceError> {
    let provider = raw.trim().to_lowercase();
    if provider.is_empty() {
        return Err(ServiceError::validation(
            "'provider' must be a non-empty string",
        ));
    }
    Ok(provider)
}

/// Seconds left before expiry, measured against `now` pulled back by the
/// 6-hour skew buffer. Clamped to zero.
#[must_use]
pub fn remaining_seconds(expire_time: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let adjusted_now = now - ChronoDuration::hours(EXPIRY_SKEW_HOURS);
    (expire_time - adjusted_now).num_seconds().max(0)
}
