//! Session middleware and identity extractors.
//!
//! A middleware layer injects the shared [`AccessGuard`] into request
//! extensions; the extractors read the session cookie, feed it to the
//! guard, and hand the resolved [`Identity`] to handlers as a plain
//! value. Handlers never look at the cookie themselves.

use axum::{
    body::Body,
    extract::FromRequestParts,
    http::{request::Parts, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::{AccessGuard, Identity};
use crate::store::Role;

use crate::web::cookies;
use crate::web::error::PageError;

/// Middleware function to inject the access guard into request extensions.
pub async fn session_layer(
    guard: Arc<AccessGuard>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    request.extensions_mut().insert(guard);
    next.run(request).await
}

/// Path and query of the current request, used as the `next` target for
/// the post-login redirect.
fn requested_path(parts: &Parts) -> String {
    parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string())
}

fn guard_from_parts(parts: &Parts) -> Result<Arc<AccessGuard>, PageError> {
    parts
        .extensions
        .get::<Arc<AccessGuard>>()
        .cloned()
        .ok_or_else(|| PageError::internal("access guard not configured"))
}

/// Extractor for authenticated users.
///
/// Use this extractor to require a valid session for a handler. The
/// handler receives the resolved identity; without one the request is
/// redirected to the login form with the current path as `next`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Identity);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = PageError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let next = requested_path(parts);
            let guard = guard_from_parts(parts)?;
            let token = cookies::session_token(&parts.headers);

            let identity = guard
                .require_identity(token.as_deref())
                .map_err(|err| PageError::from_guard(err, &next))?;

            Ok(CurrentUser(identity))
        })
    }
}

/// Extractor for admin users.
///
/// Resolves the session and then requires the admin role. An invalid
/// session redirects to login; a valid non-admin session gets the
/// terminal 403 page.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Identity);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = PageError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let next = requested_path(parts);
            let guard = guard_from_parts(parts)?;
            let token = cookies::session_token(&parts.headers);

            let identity = guard
                .require_role(token.as_deref(), Role::Admin)
                .map_err(|err| PageError::from_guard(err, &next))?;

            Ok(AdminUser(identity))
        })
    }
}

/// Optional session extractor.
///
/// Similar to [`CurrentUser`] but never rejects; public pages use it to
/// adjust navigation for signed-in visitors.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<Identity>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = PageError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let guard = match parts.extensions.get::<Arc<AccessGuard>>() {
                Some(guard) => guard.clone(),
                None => return Ok(OptionalUser(None)),
            };
            let token = cookies::session_token(&parts.headers);

            Ok(OptionalUser(guard.identity(token.as_deref())))
        })
    }
}
