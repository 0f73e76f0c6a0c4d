//! Error types for authentication operations
//!
//! This module defines the errors raised by login, session tokens and
//! session storage.

use thiserror::Error;

/// Authentication error types.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email/password pair did not match any account
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Session token has expired
    #[error("Token has expired")]
    TokenExpired,

    /// Session token is invalid (malformed, bad signature, etc.)
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// No user is signed in
    #[error("Not signed in")]
    NotAuthenticated,

    /// Account already registered in the credential directory
    #[error("Account already exists: {0}")]
    DuplicateAccount(String),

    /// Session storage failed to read or write
    #[error("Session storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

impl AuthError {
    /// Check if this error should be logged at error level.
    ///
    /// Bad passwords and stale sessions are expected and are not.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            AuthError::Internal(_) | AuthError::ConfigError(_) | AuthError::Storage(_)
        )
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::InvalidCredentials
            | AuthError::TokenExpired
            | AuthError::InvalidToken(_)
            | AuthError::NotAuthenticated => 401,

            AuthError::DuplicateAccount(_) => 409,

            AuthError::Storage(_) | AuthError::ConfigError(_) | AuthError::Internal(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::TokenExpired => "TOKEN_EXPIRED",
            AuthError::InvalidToken(_) => "INVALID_TOKEN",
            AuthError::NotAuthenticated => "NOT_AUTHENTICATED",
            AuthError::DuplicateAccount(_) => "DUPLICATE_ACCOUNT",
            AuthError::Storage(_) => "STORAGE_ERROR",
            AuthError::ConfigError(_) => "CONFIG_ERROR",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<std::io::Error> for AuthError {
    fn from(err: std::io::Error) -> Self {
        AuthError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        AuthError::Storage(format!("Invalid session data: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
        assert_eq!(AuthError::DuplicateAccount("a@b.c".into()).status_code(), 409);
        assert_eq!(AuthError::Storage("disk full".into()).status_code(), 500);
    }

    #[test]
    fn test_server_errors() {
        assert!(!AuthError::InvalidCredentials.is_server_error());
        assert!(!AuthError::TokenExpired.is_server_error());
        assert!(AuthError::Storage("x".into()).is_server_error());
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AuthError = io.into();
        assert_eq!(err.error_code(), "STORAGE_ERROR");
    }
}
