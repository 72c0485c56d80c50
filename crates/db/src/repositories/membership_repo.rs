//! Repository for the `global_memberships` table.
//!
//! The global required-membership list is read through the gate's cache;
//! callers mutating it must invalidate that cache in the same operation
//! (the gate's wrapper methods do this).

use sqlx::PgPool;

/// Provides operations on the global required-membership list.
pub struct MembershipRepo;

impl MembershipRepo {
    /// Add an identifier to the global list. Returns `false` if it was
    /// already present.
    pub async fn add(pool: &PgPool, identifier: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO global_memberships (identifier)
             VALUES ($1)
             ON CONFLICT (identifier) DO NOTHING",
        )
        .bind(identifier)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove an identifier from the global list. Returns `false` if it
    /// was absent.
    pub async fn remove(pool: &PgPool, identifier: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM global_memberships WHERE identifier = $1")
            .bind(identifier)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List the global required memberships in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT identifier FROM global_memberships ORDER BY added_at, id")
            .fetch_all(pool)
            .await
    }

    /// Remove every identifier from the global list.
    pub async fn clear(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM global_memberships")
            .execute(pool)
            .await?;
        Ok(())
    }
}
