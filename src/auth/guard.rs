//! Access decisions for wicket.
//!
//! The guard turns a raw session token (usually pulled from a cookie)
//! into an authorization outcome. There are exactly three: the resolved
//! identity, `Unauthenticated` (no usable session, send the user to the
//! login page), or `Forbidden` (live session, wrong role, terminal
//! denial). Handlers never inspect tokens themselves; they make one
//! guard call and match on the result.

use std::sync::Arc;

use thiserror::Error;

use super::identity::Identity;
use super::session::SessionStore;
use crate::store::Role;

/// Access decision errors.
#[derive(Error, Debug)]
pub enum GuardError {
    /// No session token, or a token that failed resolution.
    ///
    /// Absent, malformed, tampered and expired tokens all land here;
    /// the caller cannot tell them apart.
    #[error("authentication required")]
    Unauthenticated,

    /// The session is valid but its role does not match.
    ///
    /// This is terminal: re-authenticating as the same user would not
    /// change the outcome, so callers render a denial instead of
    /// redirecting to login.
    #[error("access denied: requires {required} role")]
    Forbidden {
        /// The role the resource demands.
        required: Role,
    },
}

/// Gate over protected resources.
#[derive(Debug)]
pub struct AccessGuard {
    sessions: Arc<SessionStore>,
}

impl AccessGuard {
    /// Create a guard over the given session store.
    pub fn new(sessions: Arc<SessionStore>) -> Self {
        Self { sessions }
    }

    /// Require a valid session, whatever its role.
    pub fn require_identity(&self, token: Option<&str>) -> Result<Identity, GuardError> {
        let token = token.ok_or(GuardError::Unauthenticated)?;
        self.sessions
            .resolve(token)
            .map_err(|_| GuardError::Unauthenticated)
    }

    /// Require a valid session whose role equals `required`.
    ///
    /// Resolves the identity first, so a missing session reports
    /// `Unauthenticated`, never `Forbidden`. The role check is a plain
    /// equality test: the role set is flat, and an admin does not pass a
    /// check demanding `Role::User`.
    pub fn require_role(&self, token: Option<&str>, required: Role) -> Result<Identity, GuardError> {
        let identity = self.require_identity(token)?;
        if identity.role == required {
            Ok(identity)
        } else {
            Err(GuardError::Forbidden { required })
        }
    }

    /// Resolve a session if present and valid, without requiring one.
    pub fn identity(&self, token: Option<&str>) -> Option<Identity> {
        self.require_identity(token).ok()
    }
}
