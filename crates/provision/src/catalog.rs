//! Catalog store access contract and its PostgreSQL implementation.
//!
//! The orchestrator and gate talk to the catalog through [`CatalogStore`]
//! so they can be exercised against in-memory doubles; production wires in
//! [`PgCatalog`], a thin delegation to the `botforge-db` repositories.

use async_trait::async_trait;
use botforge_core::types::{InstanceId, TemplateId};
use botforge_db::models::instance::{CreateInstance, Instance};
use botforge_db::models::template::{CreateTemplate, Template};
use botforge_db::repositories::{InstanceRepo, MembershipRepo, TemplateRepo};
use botforge_db::DbPool;

/// Durable record of templates, instances, and membership requirements.
///
/// Per-row operations are the unit of consistency: no implementation is
/// expected to provide cross-row transactions, and the orchestrator does
/// not rely on any.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn create_template(&self, input: &CreateTemplate) -> Result<Template, sqlx::Error>;
    async fn get_template(&self, id: TemplateId) -> Result<Option<Template>, sqlx::Error>;
    async fn list_templates(&self) -> Result<Vec<Template>, sqlx::Error>;
    /// Hard delete. Cascades to the template's own membership rows and
    /// nulls surviving instances' references.
    async fn delete_template(&self, id: TemplateId) -> Result<bool, sqlx::Error>;

    async fn create_instance(&self, input: &CreateInstance) -> Result<Instance, sqlx::Error>;
    async fn get_instance(&self, id: InstanceId) -> Result<Option<Instance>, sqlx::Error>;
    async fn list_active_instances(&self) -> Result<Vec<Instance>, sqlx::Error>;
    /// Soft delete: the row is flagged inactive, never removed.
    async fn deactivate_instance(&self, id: InstanceId) -> Result<bool, sqlx::Error>;

    /// Returns `false` if the identifier was already present.
    async fn add_global_membership(&self, identifier: &str) -> Result<bool, sqlx::Error>;
    /// Returns `false` if the identifier was absent.
    async fn remove_global_membership(&self, identifier: &str) -> Result<bool, sqlx::Error>;
    /// Insertion order.
    async fn list_global_memberships(&self) -> Result<Vec<String>, sqlx::Error>;
    async fn clear_global_memberships(&self) -> Result<(), sqlx::Error>;

    /// Idempotent: duplicate bindings are a no-op, not an error.
    async fn bind_membership_to_instance(
        &self,
        instance_id: InstanceId,
        identifier: &str,
    ) -> Result<(), sqlx::Error>;
    /// Memberships bound to an instance, in insertion order.
    async fn instance_memberships(&self, id: InstanceId) -> Result<Vec<String>, sqlx::Error>;
}

/// PostgreSQL-backed catalog store.
#[derive(Clone)]
pub struct PgCatalog {
    pool: DbPool,
}

impl PgCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalog {
    async fn create_template(&self, input: &CreateTemplate) -> Result<Template, sqlx::Error> {
        TemplateRepo::create(&self.pool, input).await
    }

    async fn get_template(&self, id: TemplateId) -> Result<Option<Template>, sqlx::Error> {
        TemplateRepo::find_by_id(&self.pool, id).await
    }

    async fn list_templates(&self) -> Result<Vec<Template>, sqlx::Error> {
        TemplateRepo::list(&self.pool).await
    }

    async fn delete_template(&self, id: TemplateId) -> Result<bool, sqlx::Error> {
        TemplateRepo::delete(&self.pool, id).await
    }

    async fn create_instance(&self, input: &CreateInstance) -> Result<Instance, sqlx::Error> {
        InstanceRepo::create(&self.pool, input).await
    }

    async fn get_instance(&self, id: InstanceId) -> Result<Option<Instance>, sqlx::Error> {
        InstanceRepo::find_by_id(&self.pool, id).await
    }

    async fn list_active_instances(&self) -> Result<Vec<Instance>, sqlx::Error> {
        InstanceRepo::list_active(&self.pool).await
    }

    async fn deactivate_instance(&self, id: InstanceId) -> Result<bool, sqlx::Error> {
        InstanceRepo::deactivate(&self.pool, id).await
    }

    async fn add_global_membership(&self, identifier: &str) -> Result<bool, sqlx::Error> {
        MembershipRepo::add(&self.pool, identifier).await
    }

    async fn remove_global_membership(&self, identifier: &str) -> Result<bool, sqlx::Error> {
        MembershipRepo::remove(&self.pool, identifier).await
    }

    async fn list_global_memberships(&self) -> Result<Vec<String>, sqlx::Error> {
        MembershipRepo::list(&self.pool).await
    }

    async fn clear_global_memberships(&self) -> Result<(), sqlx::Error> {
        MembershipRepo::clear(&self.pool).await
    }

    async fn bind_membership_to_instance(
        &self,
        instance_id: InstanceId,
        identifier: &str,
    ) -> Result<(), sqlx::Error> {
        InstanceRepo::bind_membership(&self.pool, instance_id, identifier).await
    }

    async fn instance_memberships(&self, id: InstanceId) -> Result<Vec<String>, sqlx::Error> {
        InstanceRepo::memberships(&self.pool, id).await
    }
}
