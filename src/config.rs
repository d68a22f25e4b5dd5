//! Centralized configuration for the service.
//!
//! All configuration is loaded from environment variables (with `.env`
//! support) once at startup.

use crate::error::ServiceError;
use secrecy::SecretString;
use std::env;
use std::time::Duration;

/// API version prefix for all routes.
pub const API_V1: &str = "/api/v1";

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// GCP project holding the secrets; may be empty, in which case
    /// provisioning requests fail with a configuration error
    pub project_id: String,
    /// Static API key expected in `X-API-KEY`
    pub api_key: SecretString,
    /// Allowed CORS origins; `["*"]` allows any origin
    pub cors_origins: Vec<String>,
    /// Base URL the generated auth URLs point at
    pub auth_base_url: String,
    /// Vault request timeout
    pub vault_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ServiceError> {
        dotenvy::dotenv().ok();

        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_env("PORT", 8080)?;

        let project_id = env::var("PROJECT_ID").unwrap_or_default();
        let api_key = SecretString::from(
            env::var("LOCAL_API_KEY").unwrap_or_else(|_| "default_api_key".to_string()),
        );

        let cors_origins = parse_origins(
            &env::var("BACKEND_CORS_ORIGINS").unwrap_or_else(|_| "[\"*\"]".to_string()),
        )?;

        let auth_base_url = env::var("AUTH_BASE_URL")
            .unwrap_or_else(|_| "https://celestial-gecko-449316-d2.uc.r.appspot.com".to_string());

        let vault_timeout = Duration::from_secs(parse_env("VAULT_TIMEOUT_SECS", 30)?);

        Ok(Self {
            host,
            port,
            project_id,
            api_key,
            cors_origins,
            auth_base_url,
            vault_timeout,
        })
    }
}

/// Parse environment variable with default value.
fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ServiceError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) => val
            .parse()
            .map_err(|e| ServiceError::NotConfigured(format!("Invalid {name}: {e}"))),
        Err(_) => Ok(default),
    }
}

/// Parse the CORS origin list: either a JSON array of strings or a
/// comma-separated list.
fn parse_origins(raw: &str) -> Result<Vec<String>, ServiceError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(vec![]);
    }
    if raw.starts_with('[') {
        return serde_json::from_str(raw).map_err(|e| {
            ServiceError::NotConfigured(format!("Invalid BACKEND_CORS_ORIGINS: {e}"))
        });
    }
    Ok(raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}
