//! Error responses for the web UI.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::auth::GuardError;
use crate::store::{Role, StoreError};

use super::pages;

/// Error type for page handlers.
///
/// Auth outcomes map onto browser-friendly responses: a missing or
/// invalid session becomes a redirect to the login form, an
/// insufficient role becomes a terminal 403 page, and backend faults
/// collapse into a generic 500.
#[derive(Debug)]
pub enum PageError {
    /// No valid session. `next` carries the originally requested path so
    /// the login handler can send the browser back after sign-in.
    RedirectToLogin {
        /// Path (and query) the client asked for.
        next: String,
    },
    /// Valid session, wrong role. Terminal: re-authenticating as the
    /// same user cannot change the outcome, so this never redirects.
    Forbidden {
        /// Role the resource demands.
        required: Role,
    },
    /// Unexpected fault. The detail is logged, never sent to the client.
    Internal(String),
}

impl PageError {
    /// Create a redirect-to-login error preserving the requested path.
    pub fn unauthenticated(next: impl Into<String>) -> Self {
        Self::RedirectToLogin { next: next.into() }
    }

    /// Create a forbidden error.
    pub fn forbidden(required: Role) -> Self {
        Self::Forbidden { required }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Map a guard decision onto a page response, keeping the requested
    /// path for the post-login redirect.
    pub fn from_guard(err: GuardError, next: &str) -> Self {
        match err {
            GuardError::Unauthenticated => Self::unauthenticated(next),
            GuardError::Forbidden { required } => Self::forbidden(required),
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::RedirectToLogin { next } => {
                let target = format!("/login?next={}", urlencoding::encode(&next));
                Redirect::to(&target).into_response()
            }
            PageError::Forbidden { required } => (
                StatusCode::FORBIDDEN,
                Html(pages::forbidden_page(required)),
            )
                .into_response(),
            PageError::Internal(message) => {
                tracing::error!("Request failed: {}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(pages::error_page()),
                )
                    .into_response()
            }
        }
    }
}

impl std::fmt::Display for PageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageError::RedirectToLogin { next } => {
                write!(f, "unauthenticated (requested {})", next)
            }
            PageError::Forbidden { required } => write!(f, "forbidden (requires {})", required),
            PageError::Internal(message) => write!(f, "internal error: {}", message),
        }
    }
}

impl std::error::Error for PageError {}

impl From<StoreError> for PageError {
    fn from(err: StoreError) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::LOCATION;

    #[test]
    fn test_from_guard_unauthenticated() {
        let err = PageError::from_guard(GuardError::Unauthenticated, "/dashboard");
        match err {
            PageError::RedirectToLogin { next } => assert_eq!(next, "/dashboard"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_from_guard_forbidden() {
        let err = PageError::from_guard(
            GuardError::Forbidden {
                required: Role::Admin,
            },
            "/admin",
        );
        match err {
            PageError::Forbidden { required } => assert_eq!(required, Role::Admin),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_unauthenticated_redirects_to_login() {
        let resp = PageError::unauthenticated("/reports").into_response();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            resp.headers().get(LOCATION).unwrap(),
            "/login?next=%2Freports"
        );
    }

    #[test]
    fn test_redirect_encodes_query() {
        let resp = PageError::unauthenticated("/reports?year=2025&q=a b").into_response();
        let location = resp.headers().get(LOCATION).unwrap().to_str().unwrap();
        assert_eq!(location, "/login?next=%2Freports%3Fyear%3D2025%26q%3Da%20b");
    }

    #[test]
    fn test_forbidden_is_403_not_redirect() {
        let resp = PageError::forbidden(Role::Admin).into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert!(resp.headers().get(LOCATION).is_none());
    }

    #[test]
    fn test_internal_is_500() {
        let resp = PageError::internal("pool exhausted").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_store_error_maps_to_internal() {
        let err = PageError::from(StoreError::Backend("disk full".to_string()));
        match err {
            PageError::Internal(message) => assert!(message.contains("disk full")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
