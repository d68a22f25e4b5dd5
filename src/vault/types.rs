//! Secret Manager REST request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Secret resource as returned by `GET /v1/projects/{p}/secrets/{id}`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    /// Full resource name, `projects/{p}/secrets/{id}`
    pub name: String,
    #[serde(default)]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expire_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

/// Body for secret creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSecretBody {
    pub replication: Replication,
    /// Duration string, e.g. `"604800s"`
    pub ttl: String,
    pub labels: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct Replication {
    pub automatic: Automatic,
}

#[derive(Debug, Serialize)]
pub struct Automatic {}

/// Body for `:addVersion`.
#[derive(Debug, Serialize)]
pub struct AddVersionBody {
    pub payload: Payload,
}

/// Base64-encoded secret payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct Payload {
    /// Standard base64 of the raw bytes
    pub data: String,
}

/// Response of `versions/latest:access`.
#[derive(Debug, Deserialize)]
pub struct AccessResponse {
    pub payload: Payload,
}

/// Metadata-server token response.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Seconds until the token expires
    pub expires_in: u64,
}

impl Secret {
    /// Extract the short secret id from the full resource name.
    #[must_use]
    pub fn secret_id(&self) -> String {
        self.name
            .rsplit('/')
            .next()
            .unwrap_or(&self.name)
            .to_string()
    }
}
