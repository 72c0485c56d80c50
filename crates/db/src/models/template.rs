//! Template models and DTOs.

use botforge_core::types::{TemplateId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A template row from the `templates` table.
///
/// Immutable after creation except for hard deletion, which cascades to
/// the template's membership requirements and nulls the references of
/// surviving instances.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    /// Location of the uploaded source text.
    pub file_path: String,
    /// Original upload filename.
    pub filename: String,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Create DTO
// ---------------------------------------------------------------------------

/// Input for recording a newly uploaded template.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplate {
    pub id: TemplateId,
    pub name: String,
    pub file_path: String,
    pub filename: String,
}
