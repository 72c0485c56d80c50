//! Handlers for instance provisioning and lifecycle.
//!
//! Provisioning, termination, and retirement all go through the
//! orchestrator; listing reads the catalog directly.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use botforge_core::types::{InstanceId, TemplateId};
use botforge_db::models::instance::Instance;
use botforge_db::repositories::InstanceRepo;
use botforge_provision::ProvisionRequest;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// JSON body for the provisioning endpoint.
#[derive(Debug, Deserialize)]
pub struct ProvisionBody {
    pub template_id: TemplateId,
    pub identity: String,
    pub secret: String,
    pub operator_id: Option<String>,
}

/// Result payload for the terminate endpoint.
#[derive(Debug, Serialize)]
pub struct TerminateResult {
    /// Whether a kill signal was issued. `false` means no live handle was
    /// registered for the instance (it may predate a server restart).
    pub terminated: bool,
}

/// POST /api/v1/instances
///
/// Request provisioning of a new instance. Rejected with 403 when the
/// identity does not satisfy the global required memberships.
pub async fn request_provisioning(
    State(state): State<AppState>,
    Json(body): Json<ProvisionBody>,
) -> AppResult<(StatusCode, Json<DataResponse<Instance>>)> {
    let instance = state
        .provisioner
        .request_provisioning(&ProvisionRequest {
            template_id: body.template_id,
            identity: body.identity,
            secret: body.secret,
            operator_id: body.operator_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: instance })))
}

/// GET /api/v1/instances
///
/// List active instances, newest first.
pub async fn list_instances(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Instance>>>> {
    let instances = InstanceRepo::list_active(&state.pool).await?;
    Ok(Json(DataResponse { data: instances }))
}

/// POST /api/v1/instances/{id}/terminate
pub async fn terminate_instance(
    State(state): State<AppState>,
    Path(id): Path<InstanceId>,
) -> AppResult<Json<DataResponse<TerminateResult>>> {
    let terminated = state.provisioner.terminate_instance(id).await?;
    Ok(Json(DataResponse {
        data: TerminateResult { terminated },
    }))
}

/// DELETE /api/v1/instances/{id}
///
/// Retire an instance: best-effort terminate and file cleanup, then
/// deactivation in the catalog.
pub async fn retire_instance(
    State(state): State<AppState>,
    Path(id): Path<InstanceId>,
) -> AppResult<StatusCode> {
    state.provisioner.retire_instance(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
