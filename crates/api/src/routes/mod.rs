pub mod health;
pub mod instances;
pub mod memberships;
pub mod templates;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /templates                       list, upload (multipart)
/// /templates/{id}                  get, delete
/// /templates/{id}/memberships      add required membership (POST)
///
/// /instances                       list active, request provisioning
/// /instances/{id}                  retire (DELETE)
/// /instances/{id}/terminate        terminate process (POST)
///
/// /memberships                     list, add, remove (global list)
/// /memberships/clear               clear all (POST)
/// /memberships/check               membership check (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/templates", templates::router())
        .nest("/instances", instances::router())
        .nest("/memberships", memberships::router())
}
