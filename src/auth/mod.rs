//! Authentication module for wicket.
//!
//! This module provides password hashing, credential checking, signed
//! session tokens, role-gated access decisions, and login rate limiting.

mod authenticator;
mod guard;
mod identity;
mod limiter;
mod password;
mod session;

pub use authenticator::{AuthError, Authenticator};
pub use guard::{AccessGuard, GuardError};
pub use identity::Identity;
pub use limiter::{LimitResult, LoginLimiter, LOCKOUT_DURATION_SECS, MAX_LOGIN_ATTEMPTS};
pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use session::{Claims, SessionError, SessionStore, DEFAULT_SESSION_TTL_SECS};
