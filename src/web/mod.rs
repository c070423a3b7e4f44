//! Web UI for wicket.
//!
//! Serves the login form, the session-cookie exchange, and the small
//! set of role-gated pages on top of the auth core.

pub mod cookies;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod pages;
pub mod router;
pub mod server;

pub use error::PageError;
pub use router::create_router;
pub use server::WebServer;
