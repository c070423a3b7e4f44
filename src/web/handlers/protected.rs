//! Authenticated page handlers.
//!
//! Each handler receives the resolved identity from the [`CurrentUser`]
//! extractor; requests without a valid session never reach these
//! functions.

use axum::response::Html;

use crate::web::middleware::CurrentUser;
use crate::web::pages;

/// GET /dashboard - authenticated landing page.
pub async fn dashboard(CurrentUser(identity): CurrentUser) -> Html<String> {
    Html(pages::dashboard_page(&identity))
}

/// GET /profile - the signed-in user's own details.
pub async fn profile(CurrentUser(identity): CurrentUser) -> Html<String> {
    Html(pages::profile_page(&identity))
}

/// GET /reports - authenticated-only content page.
pub async fn reports(CurrentUser(identity): CurrentUser) -> Html<String> {
    Html(pages::reports_page(&identity))
}
