//! Route definitions for template management.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::templates;
use crate::state::AppState;

/// Template routes mounted at `/templates`.
///
/// ```text
/// GET    /                   -> list_templates
/// POST   /                   -> upload_template (multipart)
/// GET    /{id}               -> get_template
/// DELETE /{id}               -> delete_template
/// POST   /{id}/memberships   -> add_template_membership
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(templates::list_templates).post(templates::upload_template),
        )
        .route(
            "/{id}",
            get(templates::get_template).delete(templates::delete_template),
        )
        .route(
            "/{id}/memberships",
            post(templates::add_template_membership),
        )
}
