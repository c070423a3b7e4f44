//! Process-level error type.
//!
//! Request handling uses the per-module enums (`AuthError`,
//! `SessionError`, `GuardError`, `StoreError`); `WicketError` covers
//! configuration, provisioning and server startup, where those sources
//! converge.

use thiserror::Error;

use crate::auth::PasswordError;
use crate::store::StoreError;

/// Error for the paths that wire the process together.
#[derive(Error, Debug)]
pub enum WicketError {
    /// Filesystem or socket failure during startup.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Rejected configuration or seed data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Credential store failure during provisioning.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Seed password hashing failure.
    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Result type alias for wicket operations.
pub type Result<T> = std::result::Result<T, WicketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message() {
        let err = WicketError::Validation("auth.secret is not set".to_string());
        assert_eq!(err.to_string(), "validation error: auth.secret is not set");
    }

    #[test]
    fn test_io_error_wraps_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: WicketError = io_err.into();
        assert!(matches!(err, WicketError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_store_error_passes_through() {
        let err: WicketError = StoreError::Backend("down".to_string()).into();
        assert_eq!(err.to_string(), "credential store backend error: down");
    }

    #[test]
    fn test_password_error_passes_through() {
        let err: WicketError = PasswordError::Mismatch.into();
        assert_eq!(err.to_string(), "password verification failed");
    }
}
