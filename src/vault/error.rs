//! Vault error types using thiserror 2.0.
//!
//! Secret-store-specific errors; the HTTP boundary maps these onto response
//! status codes in `crate::error`.

use thiserror::Error;

/// Errors from the external secret vault.
#[derive(Error, Debug)]
pub enum VaultError {
    /// Vault unreachable or returned a server-side failure
    #[error("Vault unavailable: {0}")]
    Unavailable(String),

    /// Authentication against the vault failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Secret does not exist
    #[error("Secret not found: {0}")]
    SecretNotFound(String),

    /// Secret already exists (create raced with another writer)
    #[error("Secret already exists: {0}")]
    AlreadyExists(String),

    /// Caller lacks permission on the secret or project
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Rate limited
    #[error("Rate limited")]
    RateLimited,

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for vault operations.
pub type VaultResult<T> = Result<T, VaultError>;

impl VaultError {
    /// Create an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create an authentication failed error.
    #[must_use]
    pub fn auth_failed(msg: impl Into<String>) -> Self {
        Self::AuthenticationFailed(msg.into())
    }

    /// Create a secret not found error.
    #[must_use]
    pub fn not_found(secret_id: impl Into<String>) -> Self {
        Self::SecretNotFound(secret_id.into())
    }

    /// Create an already-exists error.
    #[must_use]
    pub fn already_exists(secret_id: impl Into<String>) -> Self {
        Self::AlreadyExists(secret_id.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VaultError::unavailable("connection refused");
        assert_eq!(err.to_string(), "Vault unavailable: connection refused");

        let err = VaultError::not_found("auth_url_42");
        assert_eq!(err.to_string(), "Secret not found: auth_url_42");

        let err = VaultError::already_exists("auth_url_42");
        assert_eq!(err.to_string(), "Secret already exists: auth_url_42");
    }
}
