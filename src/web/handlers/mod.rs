//! Page handlers for the web UI.

pub mod admin;
pub mod protected;
pub mod public;

pub use admin::*;
pub use protected::*;
pub use public::*;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::auth::{Authenticator, LoginLimiter, SessionStore};
use crate::store::CredentialStore;
use crate::web::cookies::CookieSettings;

/// Thread-safe login lockout tracker shared across handlers.
pub type SharedLimiter = Arc<Mutex<LoginLimiter>>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Credential store backend.
    pub store: Arc<dyn CredentialStore>,
    /// Credential checker over the store.
    pub authenticator: Authenticator,
    /// Session token issuer/resolver.
    pub sessions: Arc<SessionStore>,
    /// Per-username failed-login lockout.
    pub limiter: SharedLimiter,
    /// Session cookie attributes.
    pub cookies: CookieSettings,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        sessions: Arc<SessionStore>,
        cookies: CookieSettings,
    ) -> Self {
        Self {
            authenticator: Authenticator::new(store.clone()),
            limiter: Arc::new(Mutex::new(LoginLimiter::new())),
            store,
            sessions,
            cookies,
        }
    }

    /// Replace the default lockout policy.
    pub fn with_limiter(mut self, limiter: LoginLimiter) -> Self {
        self.limiter = Arc::new(Mutex::new(limiter));
        self
    }
}
