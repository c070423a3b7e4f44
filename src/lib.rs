//! wicket - Session-based login and role gate for small web apps.
//!
//! Authenticates users against a pluggable credential store, issues
//! signed session cookies, and gates a small set of pages by role.

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod store;
pub mod web;

pub use auth::{
    hash_password, validate_password, verify_password, AccessGuard, AuthError, Authenticator,
    GuardError, Identity, LimitResult, LoginLimiter, PasswordError, SessionError, SessionStore,
};
pub use config::Config;
pub use error::{Result, WicketError};
pub use store::{CredentialStore, MemoryStore, Role, StoreError, UserRecord};
#[cfg(feature = "sqlite")]
pub use store::SqliteStore;
pub use web::WebServer;
