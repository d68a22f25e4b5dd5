//! Auth URL provisioning endpoint.

use crate::api::AppState;
use crate::auth::require_api_key;
use crate::error::ServiceError;
use crate::provision::ProvisionResult;
use axum::{
    extract::{Query, State},
    http::HeaderMap,
    Json,
};
use serde::Deserialize;

/// Query parameters of `POST /generate_url`.
#[derive(Debug, Deserialize)]
pub struct GenerateUrlParams {
    /// Tenant identifier
    pub client_id: i64,
    /// OAuth provider name, normalized to lowercase
    pub provider: String,
}

/// `POST /api/v1/generate_url?client_id=<int>&provider=<string>`
///
/// Generate an authentication URL and store it in the secret vault, or return
/// the one already stored with its remaining lifetime.
pub async fn generate_url(
    State(state): State<AppState>,
    Query(params): Query<GenerateUrlParams>,
    headers: HeaderMap,
) -> Result<Json<ProvisionResult>, ServiceError> {
    require_api_key(&headers, &state.api_key)?;

    if state.project_id.is_empty() {
        return Err(ServiceError::NotConfigured("PROJECT_ID is not set".into()));
    }

    let result = state
        .provisioner
        .provision(params.client_id, &params.provider)
        .await?;
    Ok(Json(result))
}
