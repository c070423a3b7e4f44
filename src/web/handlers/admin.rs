//! Admin-only page handlers.

use axum::{extract::State, response::Html};
use std::sync::Arc;

use crate::web::error::PageError;
use crate::web::middleware::AdminUser;
use crate::web::pages;

use super::AppState;

/// GET /admin - administration panel listing provisioned users.
///
/// The [`AdminUser`] extractor has already enforced the role; a store
/// fault here surfaces as the generic 500 page.
pub async fn admin_panel(
    State(state): State<Arc<AppState>>,
    AdminUser(identity): AdminUser,
) -> Result<Html<String>, PageError> {
    let users = state.store.list().await?;
    Ok(Html(pages::admin_page(&identity, &users)))
}
