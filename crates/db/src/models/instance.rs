//! Instance models and DTOs.

use botforge_core::types::{InstanceId, TemplateId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// An instance row from the `instances` table.
///
/// `template_id` is `None` once the owning template has been deleted; the
/// instance keeps running from its own copy of the source text. The live
/// process handle is transient state owned by the lifecycle manager and
/// is deliberately absent here.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Instance {
    pub id: InstanceId,
    pub template_id: Option<TemplateId>,
    /// Primary credential issued by the requesting user.
    pub secret: String,
    /// Optional operator identity embedded alongside the secret.
    pub operator_id: Option<String>,
    /// Location of the instance's derived source text.
    pub file_path: String,
    pub is_active: bool,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Input for recording a freshly provisioned instance.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInstance {
    pub id: InstanceId,
    pub template_id: Option<TemplateId>,
    pub secret: String,
    pub operator_id: Option<String>,
    pub file_path: String,
}
