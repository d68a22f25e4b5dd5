//! Secret Manager REST client.
//!
//! Talks to the Google Secret Manager v1 surface over plain REST. Access
//! tokens are minted from the GCE metadata server and cached until shortly
//! before expiry; a static token can be injected for development and tests.

use crate::vault::{
    config::VaultConfig,
    error::{VaultError, VaultResult},
    store::{SecretRecord, SecretStore},
    types::{AccessResponse, AddVersionBody, Automatic, CreateSecretBody, Payload, Replication,
        Secret, TokenResponse},
};
use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

/// Secret Manager client with cached metadata-server tokens.
pub struct SecretManagerClient {
    config: VaultConfig,
    http: Client,
    token: Arc<RwLock<Option<String>>>,
    token_expiry: Arc<RwLock<Option<std::time::Instant>>>,
}

impl SecretManagerClient {
    /// Create a new client.
    pub fn new(config: VaultConfig) -> VaultResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(VaultError::Http)?;

        Ok(Self {
            config,
            http,
            token: Arc::new(RwLock::new(None)),
            token_expiry: Arc::new(RwLock::new(None)),
        })
    }

    /// Mint a fresh access token from the metadata server.
    #[instrument(skip(self))]
    pub async fn authenticate(&self) -> VaultResult<()> {
        let url = format!(
            "{}/computeMetadata/v1/instance/service-accounts/default/token",
            self.config.metadata_host
        );

        let response = self
            .http
            .get(&url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| VaultError::auth_failed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(VaultError::auth_failed(format!("Status {status}: {text}")));
        }

        let token_response: TokenResponse = response.json().await?;
        let ttl = Duration::from_secs(token_response.expires_in);
        let expiry = std::time::Instant::now() + ttl;

        *self.token.write().await = Some(token_response.access_token);
        *self.token_expiry.write().await = Some(expiry);

        info!(ttl_secs = ttl.as_secs(), "Minted Secret Manager access token");
        Ok(())
    }

    async fn get_token(&self) -> VaultResult<String> {
        if let Some(token) = &self.config.access_token {
            return Ok(token.expose_secret().to_string());
        }

        let needs_auth = {
            let token = self.token.read().await;
            let expiry = self.token_expiry.read().await;

            match (&*token, &*expiry) {
                (Some(_), Some(exp)) => {
                    let remaining = exp.saturating_duration_since(std::time::Instant::now());
                    remaining < self.config.token_grace_period
                }
                _ => true,
            }
        };

        if needs_auth {
            self.authenticate().await?;
        }

        self.token
            .read()
            .await
            .clone()
            .ok_or_else(|| VaultError::auth_failed("No token available"))
    }

    /// Verify the client can obtain credentials. Used as a non-fatal
    /// startup probe.
    pub async fn probe(&self) -> VaultResult<()> {
        self.get_token().await.map(|_| ())
    }

    fn project_path(&self) -> VaultResult<String> {
        if self.config.project_id.is_empty() {
            return Err(VaultError::InvalidConfig(
                "project_id is not set".to_string(),
            ));
        }
        Ok(format!("projects/{}", self.config.project_id))
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> VaultResult<T> {
        let token = self.get_token().await?;
        let url = format!("{}/v1/{}", self.config.endpoint, path);

        let mut request = self.http.request(method, &url).bearer_auth(token);

        if let Some(b) = body {
            request = request.json(&b);
        }

        let response = request
            .send()
            .await
            .map_err(|e| VaultError::unavailable(e.to_string()))?;

        let status = response.status();
        match status.as_u16() {
            404 => return Err(VaultError::not_found(path)),
            403 => return Err(VaultError::PermissionDenied(path.to_string())),
            409 => return Err(VaultError::already_exists(path)),
            429 => return Err(VaultError::RateLimited),
            _ if !status.is_success() => {
                let text = response.text().await.unwrap_or_default();
                return Err(VaultError::unavailable(format!("Status {status}: {text}")));
            }
            _ => {}
        }

        response.json().await.map_err(VaultError::from)
    }
}

#[async_trait]
impl SecretStore for SecretManagerClient {
    #[instrument(skip(self), fields(secret_id))]
    async fn get_secret(&self, secret_id: &str) -> VaultResult<SecretRecord> {
        debug!(secret_id, "Fetching secret metadata");

        let path = format!("{}/secrets/{secret_id}", self.project_path()?);
        let secret: Secret = self.request(reqwest::Method::GET, &path, None).await?;

        Ok(SecretRecord {
            secret_id: secret.secret_id(),
            create_time: secret.create_time,
            expire_time: secret.expire_time,
            labels: secret.labels,
        })
    }

    #[instrument(skip(self, labels), fields(secret_id))]
    async fn create_secret(
        &self,
        secret_id: &str,
        ttl: Duration,
        labels: HashMap<String, String>,
    ) -> VaultResult<()> {
        let path = format!("{}/secrets?secretId={secret_id}", self.project_path()?);
        let body = CreateSecretBody {
            replication: Replication {
                automatic: Automatic {},
            },
            ttl: format!("{}s", ttl.as_secs()),
            labels,
        };

        self.request::<serde_json::Value>(
            reqwest::Method::POST,
            &path,
            Some(serde_json::to_value(&body)?),
        )
        .await?;

        info!(secret_id, ttl_secs = ttl.as_secs(), "Created secret");
        Ok(())
    }

    async fn put_value(&self, secret_id: &str, data: &[u8]) -> VaultResult<()> {
        let path = format!("{}/secrets/{secret_id}:addVersion", self.project_path()?);
        let body = AddVersionBody {
            payload: Payload {
                data: base64::engine::general_purpose::STANDARD.encode(data),
            },
        };

        self.request::<serde_json::Value>(
            reqwest::Method::POST,
            &path,
            Some(serde_json::to_value(&body)?),
        )
        .await?;
        Ok(())
    }

    async fn get_value(&self, secret_id: &str) -> VaultResult<Vec<u8>> {
        debug!(secret_id, "Accessing latest secret version");

        let path = format!(
            "{}/secrets/{secret_id}/versions/latest:access",
            self.project_path()?
        );
        let response: AccessResponse = self.request(reqwest::Method::GET, &path, None).await?;

        base64::engine::general_purpose::STANDARD
            .decode(response.payload.data)
            .map_err(|e| VaultError::unavailable(format!("Invalid payload encoding: {e}")))
    }
}
