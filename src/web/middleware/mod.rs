//! Middleware for the web UI.

pub mod auth;
pub mod rate_limit;

pub use auth::{session_layer, AdminUser, CurrentUser, OptionalUser};
pub use rate_limit::{login_rate_limit, RateLimitState};
