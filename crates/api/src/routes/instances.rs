//! Route definitions for instance provisioning and lifecycle.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::instances;
use crate::state::AppState;

/// Instance routes mounted at `/instances`.
///
/// ```text
/// GET    /                 -> list_instances
/// POST   /                 -> request_provisioning
/// DELETE /{id}             -> retire_instance
/// POST   /{id}/terminate   -> terminate_instance
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(instances::list_instances).post(instances::request_provisioning),
        )
        .route("/{id}", delete(instances::retire_instance))
        .route("/{id}/terminate", post(instances::terminate_instance))
}
