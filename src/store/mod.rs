//! Credential store for wicket.
//!
//! The authentication core talks to user storage through the
//! [`CredentialStore`] trait, so backends are pluggable: an in-memory map
//! for tests and small deployments, SQLite for persistence. Lookup is
//! always by exact, case-sensitive username.

pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod user;

pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
pub use user::{Role, UserRecord};

use thiserror::Error;

/// Errors from a credential store backend.
///
/// These are infrastructure faults, not authentication outcomes: a failed
/// lookup because the backend is down is reported here, while an absent
/// user is a successful `Ok(None)` lookup.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend failed (connection, query, I/O).
    #[error("credential store backend error: {0}")]
    Backend(String),

    /// A stored record could not be interpreted (e.g. unknown role text).
    #[error("corrupt credential record: {0}")]
    Corrupt(String),
}

#[cfg(feature = "sqlite")]
impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// Abstraction over user credential persistence.
///
/// Implementations must be cheap to share behind an `Arc` and safe to call
/// from concurrent request handlers.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up a user by exact username.
    ///
    /// The match is case-sensitive: `"Admin"` and `"admin"` are different
    /// keys. Returns `Ok(None)` when no such user exists.
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError>;

    /// List all users, ordered by username.
    async fn list(&self) -> Result<Vec<UserRecord>, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Backend("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "credential store backend error: connection refused"
        );

        let err = StoreError::Corrupt("unknown role: root".to_string());
        assert_eq!(err.to_string(), "corrupt credential record: unknown role: root");
    }
}
