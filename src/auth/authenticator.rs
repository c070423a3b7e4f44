//! Credential authentication for wicket.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use super::identity::Identity;
use super::password::{verify_password, PasswordError};
use crate::store::{CredentialStore, StoreError};

/// Authentication errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Username unknown or password wrong.
    ///
    /// One variant with one message for both causes, so a caller (or an
    /// attacker reading responses) cannot tell which part failed.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The credential store failed; not an authentication outcome.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The verification task failed to run.
    #[error("authentication service error: {0}")]
    Internal(String),
}

/// Checks username/password pairs against a credential store.
#[derive(Clone)]
pub struct Authenticator {
    store: Arc<dyn CredentialStore>,
}

impl Authenticator {
    /// Create an authenticator over the given store.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }

    /// Authenticate a username/password pair.
    ///
    /// Returns the established [`Identity`] on success. Unknown usernames
    /// and wrong passwords both return [`AuthError::InvalidCredentials`];
    /// a corrupt stored hash does too, after logging it as a
    /// data-integrity warning.
    ///
    /// Unknown usernames fail fast: no dummy hash is verified on the miss
    /// path, so that path returns measurably quicker than a wrong-password
    /// attempt. Running a dummy verification would close that timing
    /// channel at the cost of an Argon2 pass per probe.
    ///
    /// Password verification is memory-hard and CPU-bound, so it runs on
    /// the blocking thread pool rather than stalling the async workers.
    pub async fn login(&self, username: &str, password: &str) -> Result<Identity, AuthError> {
        let record = match self.store.find_by_username(username).await? {
            Some(record) => record,
            None => {
                warn!(username = %username, "Login failed: user not found");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let attempt = password.to_string();
        let stored_hash = record.password_hash.clone();
        let verified = tokio::task::spawn_blocking(move || verify_password(&attempt, &stored_hash))
            .await
            .map_err(|e| AuthError::Internal(format!("verification task failed: {e}")))?;

        match verified {
            Ok(()) => {
                info!(username = %record.username, role = %record.role, "Login successful");
                Ok(Identity::from(&record))
            }
            Err(PasswordError::CorruptVerifier) => {
                warn!(
                    username = %record.username,
                    "Login failed: stored password hash is corrupt"
                );
                Err(AuthError::InvalidCredentials)
            }
            Err(_) => {
                warn!(username = %username, "Login failed: wrong password");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::store::{MemoryStore, Role, UserRecord};

    fn seeded_store() -> Arc<MemoryStore> {
        let store = MemoryStore::new();
        store.insert(
            UserRecord::new("admin", "Administrator", hash_password("admin123").unwrap())
                .with_role(Role::Admin),
        );
        store.insert(UserRecord::new(
            "usuario",
            "Usuario Normal",
            hash_password("pass123").unwrap(),
        ));
        Arc::new(store)
    }

    #[tokio::test]
    async fn test_login_success() {
        let auth = Authenticator::new(seeded_store());

        let identity = auth.login("admin", "admin123").await.unwrap();
        assert_eq!(identity.username, "admin");
        assert_eq!(identity.display_name, "Administrator");
        assert_eq!(identity.role, Role::Admin);
    }

    #[tokio::test]
    async fn test_login_user_role() {
        let auth = Authenticator::new(seeded_store());

        let identity = auth.login("usuario", "pass123").await.unwrap();
        assert_eq!(identity.role, Role::User);
    }

    #[tokio::test]
    async fn test_wrong_password() {
        let auth = Authenticator::new(seeded_store());

        let result = auth.login("admin", "not-the-password").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let auth = Authenticator::new(seeded_store());

        let result = auth.login("nobody", "admin123").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_unknown_user_and_wrong_password_indistinguishable() {
        let auth = Authenticator::new(seeded_store());

        let unknown = auth.login("nobody", "whatever").await.unwrap_err();
        let wrong = auth.login("admin", "whatever").await.unwrap_err();

        // Same variant, same message: the response carries no hint of
        // which half of the pair was bad
        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_username_case_mismatch_fails() {
        let auth = Authenticator::new(seeded_store());

        let result = auth.login("Admin", "admin123").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_corrupt_stored_hash_is_invalid_credentials() {
        let store = MemoryStore::new();
        store.insert(UserRecord::new("broken", "Broken User", "garbage-not-a-phc"));
        let auth = Authenticator::new(Arc::new(store));

        let result = auth.login("broken", "any-password").await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_store_fault_is_not_invalid_credentials() {
        struct FailingStore;

        #[async_trait::async_trait]
        impl CredentialStore for FailingStore {
            async fn find_by_username(
                &self,
                _username: &str,
            ) -> Result<Option<UserRecord>, StoreError> {
                Err(StoreError::Backend("connection refused".to_string()))
            }

            async fn list(&self) -> Result<Vec<UserRecord>, StoreError> {
                Err(StoreError::Backend("connection refused".to_string()))
            }
        }

        let auth = Authenticator::new(Arc::new(FailingStore));
        let result = auth.login("admin", "admin123").await;
        assert!(matches!(result, Err(AuthError::Store(_))));
    }
}
