//! Session cookie handling.
//!
//! The session token travels in an `HttpOnly` cookie. Handlers build
//! `Set-Cookie` values and read inbound tokens through this module only,
//! so the cookie name and attributes live in one place.

use axum::http::HeaderMap;
use axum_extra::extract::cookie::CookieJar;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "wicket_session";

/// Transport attributes for the session cookie.
#[derive(Debug, Clone, Default)]
pub struct CookieSettings {
    /// Set the `Secure` flag so the cookie only travels over HTTPS.
    /// Off by default; development deployments run plain HTTP.
    pub secure: bool,
}

/// Build the `Set-Cookie` value that delivers a session token.
///
/// `HttpOnly` keeps the token away from page scripts, `SameSite=Lax`
/// still lets top-level navigations carry it, and `Max-Age` matches the
/// token TTL so the browser drops the cookie once the token inside it
/// has expired anyway.
pub fn session_cookie(token: &str, max_age_secs: u64, settings: &CookieSettings) -> String {
    let mut value = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, token, max_age_secs
    );
    if settings.secure {
        value.push_str("; Secure");
    }
    value
}

/// Build the `Set-Cookie` value that removes the session cookie.
///
/// Empty value plus an epoch `Expires` makes the browser discard the
/// cookie immediately.
pub fn clear_session_cookie(settings: &CookieSettings) -> String {
    let mut value = format!(
        "{}=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT; HttpOnly; SameSite=Lax",
        SESSION_COOKIE
    );
    if settings.secure {
        value.push_str("; Secure");
    }
    value
}

/// Extract the session token from the request's `Cookie` header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}
