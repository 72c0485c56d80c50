//! Repository for the `instances` and `instance_memberships` tables.

use botforge_core::types::InstanceId;
use sqlx::PgPool;

use crate::models::instance::{CreateInstance, Instance};

/// Column list for instance queries.
const COLUMNS: &str = "id, template_id, secret, operator_id, file_path, is_active, created_at";

/// Provides CRUD operations for provisioned instances.
pub struct InstanceRepo;

impl InstanceRepo {
    /// Insert a new instance, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateInstance) -> Result<Instance, sqlx::Error> {
        let query = format!(
            "INSERT INTO instances (id, template_id, secret, operator_id, file_path)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Instance>(&query)
            .bind(input.id)
            .bind(input.template_id)
            .bind(&input.secret)
            .bind(&input.operator_id)
            .bind(&input.file_path)
            .fetch_one(pool)
            .await
    }

    /// Find an instance by its primary key, active or not.
    pub async fn find_by_id(
        pool: &PgPool,
        id: InstanceId,
    ) -> Result<Option<Instance>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM instances WHERE id = $1");
        sqlx::query_as::<_, Instance>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List active instances, newest first.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Instance>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM instances WHERE is_active = TRUE ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Instance>(&query).fetch_all(pool).await
    }

    /// Soft-delete an instance by flagging it inactive. Returns `true` if
    /// a row was updated. The row itself is retained.
    pub async fn deactivate(pool: &PgPool, id: InstanceId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE instances SET is_active = FALSE WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bind a membership requirement to an instance. Idempotent: binding
    /// the same identifier twice is a no-op, not an error.
    pub async fn bind_membership(
        pool: &PgPool,
        id: InstanceId,
        identifier: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO instance_memberships (instance_id, identifier)
             VALUES ($1, $2)
             ON CONFLICT (instance_id, identifier) DO NOTHING",
        )
        .bind(id)
        .bind(identifier)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// List the memberships bound to an instance in insertion order.
    pub async fn memberships(pool: &PgPool, id: InstanceId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT identifier FROM instance_memberships
             WHERE instance_id = $1
             ORDER BY added_at, id",
        )
        .bind(id)
        .fetch_all(pool)
        .await
    }
}
