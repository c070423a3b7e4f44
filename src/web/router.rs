//! Route tables for the web UI.

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::auth::AccessGuard;

use super::handlers::{
    admin_panel, dashboard, home, login_form, login_submit, logout, profile, reports, AppState,
};
use super::middleware::{login_rate_limit, session_layer, RateLimitState};

/// Assemble the page router.
///
/// Every route passes through the session layer, which resolves the
/// cookie into request extensions without rejecting anything; the
/// handlers decide what their page requires. Only `/login` carries the
/// per-IP throttle, and that middleware ignores everything but POST.
pub fn create_router(
    app_state: Arc<AppState>,
    guard: Arc<AccessGuard>,
    rate_limit: Arc<RateLimitState>,
) -> Router {
    let login_routes = Router::new()
        .route("/login", get(login_form).post(login_submit))
        .route_layer(middleware::from_fn(move |req, next| {
            let state = rate_limit.clone();
            login_rate_limit(state, req, next)
        }));

    let public_routes = Router::new()
        .route("/", get(home))
        .route("/logout", get(logout));

    let session_routes = Router::new()
        .route("/dashboard", get(dashboard))
        .route("/profile", get(profile))
        .route("/reports", get(reports));

    let admin_routes = Router::new().route("/admin", get(admin_panel));

    Router::new()
        .merge(public_routes)
        .merge(login_routes)
        .merge(session_routes)
        .merge(admin_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(move |req, next| {
                    let guard = guard.clone();
                    session_layer(guard, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

async fn health_check() -> &'static str {
    "OK"
}
