//! Secret Manager client configuration.

use secrecy::SecretString;
use std::time::Duration;

/// Default Secret Manager REST endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://secretmanager.googleapis.com";

/// Default GCE metadata server, used to mint OAuth access tokens.
pub const DEFAULT_METADATA_HOST: &str = "http://metadata.google.internal";

/// Secret Manager client configuration.
#[derive(Debug, Clone)]
pub struct VaultConfig {
    /// Secret Manager REST endpoint
    pub endpoint: String,
    /// GCP project the secrets live under
    pub project_id: String,
    /// Metadata server address for token minting
    pub metadata_host: String,
    /// Static access token override (development and tests)
    pub access_token: Option<SecretString>,
    /// Request timeout
    pub timeout: Duration,
    /// Refresh the cached token when less than this much lifetime remains
    pub token_grace_period: Duration,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            endpoint: std::env::var("SECRET_MANAGER_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            project_id: std::env::var("PROJECT_ID").unwrap_or_default(),
            metadata_host: std::env::var("GCP_METADATA_HOST")
                .unwrap_or_else(|_| DEFAULT_METADATA_HOST.to_string()),
            access_token: std::env::var("GCP_ACCESS_TOKEN")
                .ok()
                .map(SecretString::from),
            timeout: Duration::from_secs(30),
            token_grace_period: Duration::from_secs(300),
        }
    }
}

impl VaultConfig {
    /// Create a new configuration for the given project.
    #[must_use]
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            ..Default::default()
        }
    }

    /// Set the REST endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the metadata server address.
    #[must_use]
    pub fn with_metadata_host(mut self, host: impl Into<String>) -> Self {
        self.metadata_host = host.into();
        self
    }

    /// Set a static access token, bypassing the metadata server.
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(SecretString::from(token.into()));
        self
    }

    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
