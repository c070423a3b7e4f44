//! Stored user records and roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// User role for access control.
///
/// The role set is closed and flat: there are exactly two roles and no
/// hierarchy between them. Access checks compare for equality, so an
/// admin does not implicitly pass a check that requires `Role::User`.
/// Adding a role means adding a variant here, which makes every match
/// over roles fail to compile until it handles the new case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular user.
    #[default]
    User,
    /// Administrator.
    Admin,
}

impl Role {
    /// Storage form of the role, as written by the backends.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Human-readable form shown on pages.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Admin => "Administrator",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("user") {
            Ok(Role::User)
        } else if s.eq_ignore_ascii_case("admin") {
            Ok(Role::Admin)
        } else {
            Err(format!("unknown role: {s}"))
        }
    }
}

/// A stored user identity.
///
/// Records are created at provisioning time and never mutated by the
/// authentication flow. The `password_hash` field holds an Argon2id PHC
/// string, never the raw secret.
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Login username (unique key, matched case-sensitively).
    pub username: String,
    /// Human-readable name shown on pages.
    pub display_name: String,
    /// Argon2id PHC hash of the password.
    pub password_hash: String,
    /// Role for access control.
    pub role: Role,
    /// Email address (optional).
    pub email: Option<String>,
}

impl UserRecord {
    /// Record with the minimal required fields, defaulting to `Role::User`.
    pub fn new(
        username: impl Into<String>,
        display_name: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            display_name: display_name.into(),
            password_hash: password_hash.into(),
            role: Role::User,
            email: None,
        }
    }

    /// Set the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Set the email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}
