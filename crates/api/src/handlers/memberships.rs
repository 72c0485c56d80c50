//! Handlers for the global required-membership list and membership checks.
//!
//! All mutations go through the membership gate so cache invalidation is
//! synchronous with the catalog write.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// JSON body naming a single membership identifier.
#[derive(Debug, Deserialize)]
pub struct MembershipBody {
    pub identifier: String,
}

/// Query parameters for the membership check endpoint.
#[derive(Debug, Deserialize)]
pub struct CheckParams {
    pub identity: String,
}

/// Result payload for the membership check endpoint.
#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub identity: String,
    pub satisfied: bool,
}

/// GET /api/v1/memberships
pub async fn list_memberships(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let required = state.provisioner.gate().global_required().await?;
    Ok(Json(DataResponse {
        data: required.to_vec(),
    }))
}

/// POST /api/v1/memberships
///
/// Add an identifier to the global required list. Returns whether it was
/// newly added; re-adding an existing identifier is not an error.
pub async fn add_membership(
    State(state): State<AppState>,
    Json(body): Json<MembershipBody>,
) -> AppResult<Json<DataResponse<bool>>> {
    let added = state.provisioner.gate().add_global(&body.identifier).await?;

    tracing::info!(identifier = %body.identifier, added, "Global membership added");

    Ok(Json(DataResponse { data: added }))
}

/// DELETE /api/v1/memberships
///
/// Remove an identifier from the global required list. Returns whether it
/// was present.
pub async fn remove_membership(
    State(state): State<AppState>,
    Json(body): Json<MembershipBody>,
) -> AppResult<Json<DataResponse<bool>>> {
    let removed = state
        .provisioner
        .gate()
        .remove_global(&body.identifier)
        .await?;

    tracing::info!(identifier = %body.identifier, removed, "Global membership removed");

    Ok(Json(DataResponse { data: removed }))
}

/// POST /api/v1/memberships/clear
pub async fn clear_memberships(State(state): State<AppState>) -> AppResult<StatusCode> {
    state.provisioner.gate().clear_global().await?;

    tracing::info!("Global memberships cleared");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/memberships/check?identity=...
///
/// Whether `identity` satisfies the current global required list. Lookup
/// failures read as "not satisfied", never as errors.
pub async fn check_membership(
    State(state): State<AppState>,
    Query(params): Query<CheckParams>,
) -> AppResult<Json<DataResponse<CheckResult>>> {
    let satisfied = state.provisioner.check_membership(&params.identity).await?;

    Ok(Json(DataResponse {
        data: CheckResult {
            identity: params.identity,
            satisfied,
        },
    }))
}
