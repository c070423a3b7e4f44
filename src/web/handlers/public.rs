//! Public page handlers: landing, login, logout.

use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::auth::{AuthError, LimitResult};
use crate::web::cookies;
use crate::web::error::PageError;
use crate::web::middleware::OptionalUser;
use crate::web::pages;

use super::AppState;

/// Query parameters for the login form.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    /// Path to return to after a successful login.
    pub next: Option<String>,
    /// Set to `"1"` to render the generic failure line.
    pub error: Option<String>,
}

/// Form body for POST /login.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Submitted username.
    pub username: String,
    /// Submitted password.
    pub password: String,
    /// Hidden field carrying the post-login redirect target.
    pub next: Option<String>,
}

/// Pick the post-login redirect target.
///
/// Only same-site absolute paths are accepted; anything else (external
/// URLs, protocol-relative `//host` forms, missing value) falls back to
/// the dashboard.
fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(next) if next.starts_with('/') && !next.starts_with("//") => next,
        _ => "/dashboard",
    }
}

fn set_cookie_headers(value: String) -> Result<HeaderMap, PageError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        SET_COOKIE,
        HeaderValue::try_from(value)
            .map_err(|e| PageError::internal(format!("invalid cookie header: {}", e)))?,
    );
    Ok(headers)
}

/// GET / - public landing page.
pub async fn home(user: OptionalUser) -> Html<String> {
    Html(pages::home_page(user.0.as_ref()))
}

/// GET /login - login form.
///
/// Signed-in visitors are sent straight to the dashboard.
pub async fn login_form(user: OptionalUser, Query(query): Query<LoginQuery>) -> Response {
    if user.0.is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    let show_error = query.error.as_deref() == Some("1");
    Html(pages::login_page(show_error, query.next.as_deref())).into_response()
}

/// POST /login - credential check and session issuance.
///
/// Success sets the session cookie and redirects (303) to the validated
/// `next` target. Failure re-renders the form with one generic message
/// and issues no cookie. A locked-out username is answered before the
/// credential store is consulted.
pub async fn login_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<Response, PageError> {
    if form.username.is_empty() || form.password.is_empty() {
        return Ok(failure_response(form.next.as_deref()));
    }

    {
        let mut limiter = state.limiter.lock().await;
        if let LimitResult::Locked(retry_in) = limiter.check(&form.username) {
            tracing::warn!(
                username = %form.username,
                retry_secs = retry_in.as_secs(),
                "Login attempt while locked out"
            );
            return Ok((
                StatusCode::TOO_MANY_REQUESTS,
                "Too many login attempts. Please try again later.",
            )
                .into_response());
        }
    }

    match state.authenticator.login(&form.username, &form.password).await {
        Ok(identity) => {
            state.limiter.lock().await.clear(&identity.username);

            let token = state.sessions.issue(&identity).map_err(|e| {
                tracing::error!(username = %identity.username, "Failed to issue session token: {}", e);
                PageError::internal("session issuance failed")
            })?;
            let headers = set_cookie_headers(cookies::session_cookie(
                &token,
                state.sessions.ttl().as_secs(),
                &state.cookies,
            ))?;

            Ok((headers, Redirect::to(safe_next(form.next.as_deref()))).into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            state.limiter.lock().await.record_failure(&form.username);
            Ok(failure_response(form.next.as_deref()))
        }
        Err(AuthError::Store(err)) => Err(PageError::from(err)),
        Err(AuthError::Internal(message)) => Err(PageError::internal(message)),
    }
}

/// 401 re-render of the login form with the generic failure line.
fn failure_response(next: Option<&str>) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Html(pages::login_page(true, next)),
    )
        .into_response()
}

/// GET /logout - clear the session cookie and return to the landing page.
///
/// Idempotent: logging out without a session is the same redirect with
/// the same (already expired) clear-cookie header.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    user: OptionalUser,
) -> Result<Response, PageError> {
    if let Some(identity) = user.0 {
        tracing::info!(username = %identity.username, "User logged out");
    }
    let headers = set_cookie_headers(cookies::clear_session_cookie(&state.cookies))?;
    Ok((headers, Redirect::to("/")).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next_accepts_site_paths() {
        assert_eq!(safe_next(Some("/reports")), "/reports");
        assert_eq!(safe_next(Some("/admin?tab=users")), "/admin?tab=users");
    }

    #[test]
    fn test_safe_next_rejects_external_targets() {
        assert_eq!(safe_next(Some("https://evil.example")), "/dashboard");
        assert_eq!(safe_next(Some("//evil.example/phish")), "/dashboard");
        assert_eq!(safe_next(Some("evil")), "/dashboard");
        assert_eq!(safe_next(Some("")), "/dashboard");
        assert_eq!(safe_next(None), "/dashboard");
    }

    #[test]
    fn test_failure_response_is_401_without_cookie() {
        let resp = failure_response(Some("/reports"));
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.headers().get(SET_COOKIE).is_none());
    }
}
