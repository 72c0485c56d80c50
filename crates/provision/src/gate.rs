//! Membership gate: fail-closed membership checks plus the cached global
//! required-membership list.
//!
//! The cache is owned by the gate, not module-global state. It is
//! unbounded in lifetime and invalidated explicitly: every mutation of the
//! global list goes through the gate's wrapper methods, which invalidate
//! synchronously before returning. Readers and invalidation may interleave
//! freely because the list is replaced wholesale behind an `Arc`, never
//! mutated in place.

use std::sync::Arc;

use botforge_core::error::ProvisionError;
use tokio::sync::RwLock;

use crate::catalog::CatalogStore;
use crate::platform::MembershipClient;

/// Decides whether an identity satisfies the required membership set.
pub struct MembershipGate {
    catalog: Arc<dyn CatalogStore>,
    client: Arc<dyn MembershipClient>,
    /// Memoized global required-membership list. `None` means "not yet
    /// loaded" or "invalidated"; the next read repopulates it.
    cache: RwLock<Option<Arc<[String]>>>,
}

impl MembershipGate {
    pub fn new(catalog: Arc<dyn CatalogStore>, client: Arc<dyn MembershipClient>) -> Self {
        Self {
            catalog,
            client,
            cache: RwLock::new(None),
        }
    }

    /// The current global required-membership list, served from cache
    /// after the first read.
    pub async fn global_required(&self) -> Result<Arc<[String]>, ProvisionError> {
        if let Some(list) = self.cache.read().await.as_ref() {
            return Ok(Arc::clone(list));
        }

        let list: Arc<[String]> = self
            .catalog
            .list_global_memberships()
            .await
            .map_err(ProvisionError::catalog)?
            .into();

        // Concurrent misses may each load once; last write wins and every
        // reader sees a complete list.
        *self.cache.write().await = Some(Arc::clone(&list));
        Ok(list)
    }

    /// Drop the cached list. The next read reloads from the catalog.
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }

    /// Whether `identity` satisfies `required` (or the global list when
    /// `None`). An empty set trivially satisfies. Any lookup failure is
    /// treated as non-membership: an unreachable membership platform
    /// denies access rather than waving requests through.
    pub async fn satisfies(
        &self,
        identity: &str,
        required: Option<&[String]>,
    ) -> Result<bool, ProvisionError> {
        let global;
        let required = match required {
            Some(list) => list,
            None => {
                global = self.global_required().await?;
                &global
            }
        };

        for group in required {
            match self.client.membership_status(group, identity).await {
                Ok(status) if status.is_member() => {}
                Ok(_) => return Ok(false),
                Err(err) => {
                    tracing::warn!(
                        group = %group,
                        identity = %identity,
                        error = %err,
                        "Membership lookup failed; treating as not a member",
                    );
                    return Ok(false);
                }
            }
        }
        Ok(true)
    }

    // -- Global list mutations ------------------------------------------
    //
    // Each wrapper pairs the catalog write with a synchronous cache
    // invalidation, so the cached view never outlives a mutation.

    /// Add an identifier to the global list. Returns `false` if it was
    /// already present.
    pub async fn add_global(&self, identifier: &str) -> Result<bool, ProvisionError> {
        let added = self
            .catalog
            .add_global_membership(identifier)
            .await
            .map_err(ProvisionError::catalog)?;
        self.invalidate().await;
        Ok(added)
    }

    /// Remove an identifier from the global list. Returns `false` if it
    /// was absent.
    pub async fn remove_global(&self, identifier: &str) -> Result<bool, ProvisionError> {
        let removed = self
            .catalog
            .remove_global_membership(identifier)
            .await
            .map_err(ProvisionError::catalog)?;
        self.invalidate().await;
        Ok(removed)
    }

    /// Clear the global list.
    pub async fn clear_global(&self) -> Result<(), ProvisionError> {
        self.catalog
            .clear_global_memberships()
            .await
            .map_err(ProvisionError::catalog)?;
        self.invalidate().await;
        Ok(())
    }
}
