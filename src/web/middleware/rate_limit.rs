//! Per-IP rate limiting for the login endpoint.
//!
//! Complements the per-username lockout in [`crate::auth::LoginLimiter`]:
//! the lockout slows attacks on one account, this layer slows one client
//! hammering many accounts. Neither changes the login contract; a
//! throttled request never reaches the authenticator.

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    num::NonZeroU32,
    sync::{Arc, RwLock},
    time::Duration,
};

/// Seconds between sweeps of the limiter map.
const CLEANUP_INTERVAL_SECS: u64 = 300;

/// Token-bucket limiter for a single client.
pub type IpRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Login throttle state, one token bucket per client IP.
#[derive(Clone)]
pub struct RateLimitState {
    /// Buckets keyed by client IP.
    limiters: Arc<RwLock<HashMap<String, Arc<IpRateLimiter>>>>,
    /// Quota applied to every bucket.
    quota: Quota,
}

impl RateLimitState {
    /// State allowing `per_minute` login submissions per client.
    ///
    /// A zero quota is clamped to one per minute.
    pub fn new(per_minute: u32) -> Self {
        let per_minute = NonZeroU32::new(per_minute).unwrap_or(NonZeroU32::MIN);
        Self {
            limiters: Arc::new(RwLock::new(HashMap::new())),
            quota: Quota::per_minute(per_minute),
        }
    }

    /// Bucket for one client, created on first sight.
    fn limiter_for(&self, ip: &str) -> Arc<IpRateLimiter> {
        if let Some(limiter) = self
            .limiters
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(ip)
        {
            return limiter.clone();
        }

        let mut map = self.limiters.write().unwrap_or_else(|e| e.into_inner());
        map.entry(ip.to_string())
            .or_insert_with(|| Arc::new(RateLimiter::direct(self.quota)))
            .clone()
    }

    /// Whether a login submission from this client may proceed.
    pub fn allow(&self, ip: &str) -> bool {
        self.limiter_for(ip).check().is_ok()
    }

    /// Drop buckets no in-flight request currently holds.
    pub fn cleanup(&self) {
        let mut map = self.limiters.write().unwrap_or_else(|e| e.into_inner());
        map.retain(|_, limiter| Arc::strong_count(limiter) > 1);
    }

    /// Sweep the bucket map on a fixed interval.
    pub fn start_cleanup_task(self: Arc<Self>) {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(CLEANUP_INTERVAL_SECS));
            loop {
                ticker.tick().await;
                self.cleanup();
            }
        });
    }
}

/// Best available client address for keying the throttle.
fn get_client_ip(req: &Request<Body>) -> String {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    };

    // Proxies append to X-Forwarded-For; the first entry names the client
    if let Some(forwarded) = header("X-Forwarded-For") {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    if let Some(real_ip) = header("X-Real-IP") {
        return real_ip.to_string();
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Rate limiting middleware for the login route.
///
/// Only credential submissions count against the quota; rendering the
/// form with GET is free.
pub async fn login_rate_limit(
    state: Arc<RateLimitState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if req.method() != Method::POST {
        return next.run(req).await;
    }

    let ip = get_client_ip(&req);

    if !state.allow(&ip) {
        tracing::warn!(ip = %ip, "Login rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            "Too many login attempts. Please try again later.",
        )
            .into_response();
    }

    next.run(req).await
}
