//! Authenticated identity value.

use serde::{Deserialize, Serialize};

use crate::store::{Role, UserRecord};

/// The identity established by a successful login.
///
/// This is the only user data a session carries: the subset of a
/// [`UserRecord`] that pages are allowed to see. It never contains the
/// password hash or any other secret material, so issuing it into a
/// client-held token is safe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Login username.
    pub username: String,
    /// Human-readable name shown on pages.
    pub display_name: String,
    /// Role for access control.
    pub role: Role,
}

impl From<&UserRecord> for Identity {
    fn from(record: &UserRecord) -> Self {
        Self {
            username: record.username.clone(),
            display_name: record.display_name.clone(),
            role: record.role,
        }
    }
}
