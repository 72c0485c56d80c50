//! Handlers for template management.
//!
//! Templates are uploaded as multipart form data (a `name` field plus the
//! source file), stored on disk under the configured templates directory,
//! and recorded in the catalog.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use botforge_core::types::TemplateId;
use botforge_db::models::template::{CreateTemplate, Template};
use botforge_db::repositories::TemplateRepo;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// A template together with its required memberships, for list responses.
#[derive(Debug, Serialize)]
pub struct TemplateWithMemberships {
    #[serde(flatten)]
    pub template: Template,
    pub required_memberships: Vec<String>,
}

/// POST /api/v1/templates
///
/// Multipart upload: a `name` field and a `file` field holding the source
/// text. The file is stored under the templates directory keyed by the new
/// template's id; the original filename is kept for display only.
pub async fn upload_template(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Template>>)> {
    let mut name: Option<String> = None;
    let mut filename: Option<String> = None;
    let mut source: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        match field.name() {
            Some("name") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                name = Some(value);
            }
            Some("file") => {
                filename = field.file_name().map(ToString::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                source = Some(data.to_vec());
            }
            _ => {}
        }
    }

    let name = name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing template name".to_string()))?;
    let source =
        source.ok_or_else(|| AppError::BadRequest("Missing template file".to_string()))?;
    let filename = filename.unwrap_or_else(|| format!("{name}.py"));

    tokio::fs::create_dir_all(&state.config.templates_dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create templates dir: {e}")))?;

    let id: TemplateId = Uuid::new_v4();
    let file_path = std::path::Path::new(&state.config.templates_dir).join(format!("{id}.py"));

    tokio::fs::write(&file_path, &source)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store template file: {e}")))?;

    let template = TemplateRepo::create(
        &state.pool,
        &CreateTemplate {
            id,
            name,
            file_path: file_path.to_string_lossy().into_owned(),
            filename,
        },
    )
    .await?;

    tracing::info!(
        template_id = %template.id,
        name = %template.name,
        "Template uploaded",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: template })))
}

/// GET /api/v1/templates
///
/// List all templates with their required memberships.
pub async fn list_templates(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<TemplateWithMemberships>>>> {
    let templates = TemplateRepo::list(&state.pool).await?;

    let mut items = Vec::with_capacity(templates.len());
    for template in templates {
        let required_memberships = TemplateRepo::memberships(&state.pool, template.id).await?;
        items.push(TemplateWithMemberships {
            template,
            required_memberships,
        });
    }

    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/templates/{id}
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<TemplateId>,
) -> AppResult<Json<DataResponse<TemplateWithMemberships>>> {
    let template = TemplateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
        .map_err(AppError::Database)?;

    let required_memberships = TemplateRepo::memberships(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: TemplateWithMemberships {
            template,
            required_memberships,
        },
    }))
}

/// DELETE /api/v1/templates/{id}
///
/// Hard delete. The stored file is removed best-effort before the row;
/// membership requirements cascade with the row, and surviving instances
/// keep running with their template reference nulled.
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<TemplateId>,
) -> AppResult<impl IntoResponse> {
    let template = TemplateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
        .map_err(AppError::Database)?;

    match tokio::fs::remove_file(&template.file_path).await {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            tracing::warn!(
                template_id = %id,
                path = %template.file_path,
                error = %err,
                "Failed to delete template file",
            );
        }
    }

    TemplateRepo::delete(&state.pool, id).await?;

    tracing::info!(template_id = %id, "Template deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// JSON body naming a required membership identifier.
#[derive(Debug, Deserialize)]
pub struct AddMembershipBody {
    pub identifier: String,
}

/// POST /api/v1/templates/{id}/memberships
///
/// Add a required membership to a template. Duplicate adds are no-ops.
pub async fn add_template_membership(
    State(state): State<AppState>,
    Path(id): Path<TemplateId>,
    Json(body): Json<AddMembershipBody>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    TemplateRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
        .map_err(AppError::Database)?;

    TemplateRepo::add_membership(&state.pool, id, &body.identifier).await?;

    tracing::info!(
        template_id = %id,
        identifier = %body.identifier,
        "Template membership added",
    );

    let required_memberships = TemplateRepo::memberships(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: required_memberships,
    }))
}
