//! Route definitions for the global required-membership list.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::memberships;
use crate::state::AppState;

/// Global membership routes mounted at `/memberships`.
///
/// ```text
/// GET    /         -> list_memberships
/// POST   /         -> add_membership
/// DELETE /         -> remove_membership
/// POST   /clear    -> clear_memberships
/// GET    /check    -> check_membership
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(memberships::list_memberships)
                .post(memberships::add_membership)
                .delete(memberships::remove_membership),
        )
        .route("/clear", post(memberships::clear_memberships))
        .route("/check", get(memberships::check_membership))
}
