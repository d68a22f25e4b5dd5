//! Caller authentication.
//!
//! Requests must carry the configured key in `X-API-KEY`, with two exemptions
//! recognized purely by header shape: App Engine cron/task markers and the
//! Cloud Tasks HTTP-target user agent.

use crate::error::ServiceError;
use axum::http::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;
use tracing::warn;

/// How the caller was identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerIdentity {
    /// Valid `X-API-KEY` header
    ApiKey,
    /// App Engine cron or task headers present
    CronTask,
    /// Cloud Tasks HTTP target, recognized by user agent
    CloudTask,
}

/// User-agent prefix sent by Cloud Tasks HTTP targets.
const CLOUD_TASKS_UA_PREFIX: &str = "Google-Cloud-Tasks";

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Authenticate a request from its headers.
///
/// # Errors
///
/// Returns `ServiceError::Auth` when no exemption applies and `X-API-KEY` is
/// missing or does not match the configured key.
pub fn require_api_key(
    headers: &HeaderMap,
    expected: &SecretString,
) -> Result<CallerIdentity, ServiceError> {
    // 1) App Engine cron / task target
    if header_str(headers, "x-appengine-cron") == Some("true")
        || headers.contains_key("x-appengine-taskname")
    {
        return Ok(CallerIdentity::CronTask);
    }

    // 1b) Cloud Tasks HTTP target (no App Engine headers, but a telltale UA)
    if header_str(headers, "user-agent")
        .is_some_and(|ua| ua.starts_with(CLOUD_TASKS_UA_PREFIX))
    {
        return Ok(CallerIdentity::CloudTask);
    }

    // 2) Everything else requires X-API-KEY
    let provided = header_str(headers, "x-api-key").unwrap_or_default();
    let valid: bool = provided
        .as_bytes()
        .ct_eq(expected.expose_secret().as_bytes())
        .into();

    if provided.is_empty() || !valid {
        warn!("No valid API key provided");
        return Err(ServiceError::auth("Invalid or missing local API key"));
    }

    Ok(CallerIdentity::ApiKey)
}
