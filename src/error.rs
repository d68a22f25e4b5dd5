//! Service-level error taxonomy and HTTP response mapping.

use crate::vault::VaultError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

/// Errors surfaced to HTTP callers.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Bad request input (empty provider, malformed parameters)
    #[error("{0}")]
    Validation(String),

    /// Missing or invalid API key
    #[error("{0}")]
    Auth(String),

    /// Vault denied access
    #[error("Forbidden accessing Secret Manager")]
    Forbidden,

    /// Required configuration is missing
    #[error("Service not configured: {0}")]
    NotConfigured(String),

    /// Any other vault failure, message passed through
    #[error("Secret Manager error: {0}")]
    Vault(String),
}

impl ServiceError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an authentication error.
    #[must_use]
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotConfigured(_) | Self::Vault(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<VaultError> for ServiceError {
    fn from(err: VaultError) -> Self {
        match err {
            VaultError::PermissionDenied(_) => Self::Forbidden,
            other => Self::Vault(other.to_string()),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        let body = serde_json::json!({ "detail": self.to_string() });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ServiceError::validation("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::auth("no key").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ServiceError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ServiceError::NotConfigured("PROJECT_ID".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServiceError::Vault("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_vault_error_mapping() {
        let err: ServiceError = VaultError::PermissionDenied("p".into()).into();
        assert!(matches!(err, ServiceError::Forbidden));

        let err: ServiceError = VaultError::unavailable("down").into();
        assert!(matches!(err, ServiceError::Vault(_)));
        assert_eq!(err.to_string(), "Secret Manager error: Vault unavailable: down");
    }
}
