//! Signed session tokens for wicket.
//!
//! A session is a self-contained HS256 JWT carrying the authenticated
//! identity plus issue/expiry timestamps. The server keeps no session
//! table: possession of a token that verifies against the process-wide
//! signing secret is the session. Logout therefore only clears the
//! client's cookie; a copied token stays valid until its expiry, which
//! is why the TTL is kept short and configurable.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use super::identity::Identity;
use crate::store::Role;

/// Default session duration (24 hours).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60;

/// Session token errors.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Token missing, malformed, tampered with, or expired.
    ///
    /// All resolution failures collapse into this one variant so callers
    /// cannot branch on why a token was rejected; the cause is logged at
    /// DEBUG level instead.
    #[error("invalid session token")]
    Invalid,

    /// Token could not be issued.
    #[error("failed to issue session token: {0}")]
    Issue(String),
}

/// Claims embedded in a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username).
    pub sub: String,
    /// Display name.
    pub name: String,
    /// Role.
    pub role: Role,
    /// Issued at timestamp.
    pub iat: u64,
    /// Expiration timestamp.
    pub exp: u64,
    /// Token ID (unique per issued token, reserved for a revocation list).
    pub jti: String,
}

/// Issues and resolves signed session tokens.
///
/// Constructed once at startup from the configured signing secret and
/// shared behind an `Arc`; the secret is fixed for the process lifetime,
/// so restarting the server invalidates all outstanding sessions.
pub struct SessionStore {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl SessionStore {
    /// Create a session store from a signing secret and token lifetime.
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        // Expiry is exact: no clock-skew allowance
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Create a session store with the default 24 hour lifetime.
    pub fn with_default_ttl(secret: &str) -> Self {
        Self::new(secret, Duration::from_secs(DEFAULT_SESSION_TTL_SECS))
    }

    /// Token lifetime, used for the session cookie's Max-Age.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a signed token for an authenticated identity.
    pub fn issue(&self, identity: &Identity) -> Result<String, SessionError> {
        let now = Utc::now().timestamp() as u64;
        let claims = Claims {
            sub: identity.username.clone(),
            name: identity.display_name.clone(),
            role: identity.role,
            iat: now,
            exp: now + self.ttl.as_secs(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| SessionError::Issue(e.to_string()))
    }

    /// Resolve a token back into the identity it was issued for.
    ///
    /// Verifies the signature and expiry. Any failure, including an
    /// unknown role string inside an otherwise well-signed token, yields
    /// `SessionError::Invalid`.
    pub fn resolve(&self, token: &str) -> Result<Identity, SessionError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!("Session token rejected: {}", e);
            SessionError::Invalid
        })?;

        Ok(Identity {
            username: data.claims.sub,
            display_name: data.claims.name,
            role: data.claims.role,
        })
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("ttl", &self.ttl)
            .finish()
    }
}
