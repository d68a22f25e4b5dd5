//! Service entry point.

use auth_url_service::api::{self, AppState};
use auth_url_service::config::Config;
use auth_url_service::provision::Provisioner;
use auth_url_service::vault::{SecretManagerClient, VaultConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .json()
        .init();

    info!("Starting auth-url-service");

    let config = Config::from_env()?;

    let vault_config = VaultConfig {
        project_id: config.project_id.clone(),
        timeout: config.vault_timeout,
        ..VaultConfig::default()
    };
    let client = Arc::new(SecretManagerClient::new(vault_config)?);

    // Optional startup check; credentials may legitimately be unavailable in
    // local development, so failure is not fatal.
    if let Err(e) = client.probe().await {
        warn!(error = %e, "Secret Manager probe failed, continuing anyway");
    }

    let provisioner = Arc::new(Provisioner::new(client, config.auth_base_url.clone()));
    let state = AppState {
        provisioner,
        api_key: config.api_key.clone(),
        project_id: config.project_id.clone(),
    };

    let app = api::app(state, &config.cors_origins);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("auth-url-service listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}
