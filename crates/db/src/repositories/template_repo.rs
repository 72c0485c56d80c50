//! Repository for the `templates` and `template_memberships` tables.

use botforge_core::types::TemplateId;
use sqlx::PgPool;

use crate::models::template::{CreateTemplate, Template};

/// Column list for template queries.
const COLUMNS: &str = "id, name, file_path, filename, created_at";

/// Provides CRUD operations for uploaded templates.
pub struct TemplateRepo;

impl TemplateRepo {
    /// Insert a new template, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateTemplate) -> Result<Template, sqlx::Error> {
        let query = format!(
            "INSERT INTO templates (id, name, file_path, filename)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Template>(&query)
            .bind(input.id)
            .bind(&input.name)
            .bind(&input.file_path)
            .bind(&input.filename)
            .fetch_one(pool)
            .await
    }

    /// Find a template by its primary key.
    pub async fn find_by_id(
        pool: &PgPool,
        id: TemplateId,
    ) -> Result<Option<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates WHERE id = $1");
        sqlx::query_as::<_, Template>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all templates, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Template>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM templates ORDER BY created_at DESC");
        sqlx::query_as::<_, Template>(&query).fetch_all(pool).await
    }

    /// Hard-delete a template. Returns `true` if a row was deleted.
    ///
    /// Foreign-key actions take care of the rest: the template's own
    /// membership requirements are cascaded away and surviving instances
    /// have their `template_id` nulled.
    pub async fn delete(pool: &PgPool, id: TemplateId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM templates WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Add a required membership to a template. Duplicate adds are no-ops.
    pub async fn add_membership(
        pool: &PgPool,
        id: TemplateId,
        identifier: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO template_memberships (template_id, identifier)
             VALUES ($1, $2)
             ON CONFLICT (template_id, identifier) DO NOTHING",
        )
        .bind(id)
        .bind(identifier)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// List a template's required memberships in insertion order.
    pub async fn memberships(pool: &PgPool, id: TemplateId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT identifier FROM template_memberships
             WHERE template_id = $1
             ORDER BY added_at, id",
        )
        .bind(id)
        .fetch_all(pool)
        .await
    }
}
