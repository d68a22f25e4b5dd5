//! HTTP routing layer.

pub mod health;
pub mod providers;

use crate::config::API_V1;
use crate::provision::Provisioner;
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use secrecy::SecretString;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

/// Shared state for request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The provisioning workflow, holding the injected vault client
    pub provisioner: Arc<Provisioner>,
    /// Expected `X-API-KEY` value
    pub api_key: SecretString,
    /// Configured project id; empty means provisioning is not configured
    pub project_id: String,
}

/// Assemble the application router: all routes live under `/api/v1`.
pub fn app(state: AppState, cors_origins: &[String]) -> Router {
    let api = Router::new()
        .route("/generate_url", post(providers::generate_url))
        .route("/health", get(health::health_check));

    Router::new()
        .nest(API_V1, api)
        .with_state(state)
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// Build the CORS layer from the configured origin list. A `*` entry allows
/// any origin (without credentials); otherwise only the listed origins are
/// allowed, with credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Skipping invalid CORS origin");
                None
            }
        })
        .collect();

    // Credentials cannot combine with wildcard methods/headers, so the
    // explicit-origin branch enumerates what the API actually accepts.
    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-api-key"),
        ])
        .allow_credentials(true)
}
