//! Provisioning orchestrator.
//!
//! Composes the membership gate, injection engine, lifecycle manager, and
//! catalog store. Each request runs the sequence
//! `Requested -> GateChecked -> TemplateRead -> Injected -> Spawned -> Recorded`
//! synchronously; no step is retried, and a failure at any step is
//! terminal for that request only.
//!
//! There is no transaction across the sequence: a process can exist whose
//! catalog write then fails, and that partial completion is accepted
//! rather than rolled back.

use std::sync::Arc;

use botforge_core::error::ProvisionError;
use botforge_core::inject::inject;
use botforge_core::types::{InstanceId, TemplateId};
use botforge_db::models::instance::{CreateInstance, Instance};
use tokio::fs;

use crate::catalog::CatalogStore;
use crate::gate::MembershipGate;
use crate::lifecycle::LifecycleManager;

/// A user's request for a new instance of a template.
#[derive(Debug, Clone)]
pub struct ProvisionRequest {
    pub template_id: TemplateId,
    /// The requesting identity, checked against the membership gate.
    pub identity: String,
    /// Primary credential to embed in the instance source.
    pub secret: String,
    /// Optional operator identity to embed; when absent, operator
    /// declarations are stripped from the template instead.
    pub operator_id: Option<String>,
}

/// The four operations exposed to the interaction layer.
pub struct Provisioner {
    catalog: Arc<dyn CatalogStore>,
    gate: Arc<MembershipGate>,
    lifecycle: Arc<LifecycleManager>,
}

impl Provisioner {
    pub fn new(
        catalog: Arc<dyn CatalogStore>,
        gate: Arc<MembershipGate>,
        lifecycle: Arc<LifecycleManager>,
    ) -> Self {
        Self {
            catalog,
            gate,
            lifecycle,
        }
    }

    pub fn gate(&self) -> &MembershipGate {
        &self.gate
    }

    /// Provision a new instance from a template.
    ///
    /// The gate is re-checked on every attempt against the current global
    /// required-membership list. Rejection happens before any side
    /// effect: no file is written, no process spawned, no row created.
    pub async fn request_provisioning(
        &self,
        request: &ProvisionRequest,
    ) -> Result<Instance, ProvisionError> {
        // Requested -> GateChecked
        if !self.gate.satisfies(&request.identity, None).await? {
            tracing::info!(
                template_id = %request.template_id,
                identity = %request.identity,
                "Provisioning rejected by membership gate",
            );
            return Err(ProvisionError::GateRejected);
        }

        // GateChecked -> TemplateRead
        let template = self
            .catalog
            .get_template(request.template_id)
            .await
            .map_err(ProvisionError::catalog)?
            .ok_or(ProvisionError::TemplateNotFound(request.template_id))?;

        // A template whose source file is gone is as unavailable as one
        // that was never recorded.
        let source = fs::read_to_string(&template.file_path)
            .await
            .map_err(|err| {
                tracing::warn!(
                    template_id = %template.id,
                    path = %template.file_path,
                    error = %err,
                    "Template source unreadable",
                );
                ProvisionError::TemplateNotFound(template.id)
            })?;

        // TemplateRead -> Injected
        let rewritten = inject(&source, &request.secret, request.operator_id.as_deref());

        // Injected -> Spawned
        let unit = self.lifecycle.provision(&rewritten).await?;

        // Spawned -> Recorded
        let instance = self
            .catalog
            .create_instance(&CreateInstance {
                id: unit.id,
                template_id: Some(template.id),
                secret: request.secret.clone(),
                operator_id: request.operator_id.clone(),
                file_path: unit.source_path.to_string_lossy().into_owned(),
            })
            .await
            .map_err(ProvisionError::catalog)?;

        // Bind the current global snapshot to the instance. Best-effort:
        // a failed binding is logged, never retried, and never rolls back
        // the instance.
        match self.gate.global_required().await {
            Ok(required) => {
                for identifier in required.iter() {
                    if let Err(err) = self
                        .catalog
                        .bind_membership_to_instance(instance.id, identifier)
                        .await
                    {
                        tracing::warn!(
                            instance_id = %instance.id,
                            identifier = %identifier,
                            error = %err,
                            "Failed to bind membership to instance",
                        );
                    }
                }
            }
            Err(err) => {
                tracing::warn!(
                    instance_id = %instance.id,
                    error = %err,
                    "Failed to read global memberships for binding",
                );
            }
        }

        tracing::info!(
            instance_id = %instance.id,
            template_id = %template.id,
            "Instance provisioned",
        );

        Ok(instance)
    }

    /// Request termination of an instance's process.
    ///
    /// Returns whether a kill signal was issued. `false` with no error
    /// means no live handle was present (the instance may predate a
    /// restart). Unknown ids are reported as [`ProvisionError::InstanceNotFound`].
    pub async fn terminate_instance(&self, id: InstanceId) -> Result<bool, ProvisionError> {
        self.catalog
            .get_instance(id)
            .await
            .map_err(ProvisionError::catalog)?
            .ok_or(ProvisionError::InstanceNotFound(id))?;

        Ok(self.lifecycle.terminate(id).await)
    }

    /// Retire an instance: best-effort terminate and file cleanup, then
    /// catalog deactivation. Deactivation always runs, whatever the
    /// earlier sub-steps did; only an unknown id aborts (with no catalog
    /// mutation at all).
    pub async fn retire_instance(&self, id: InstanceId) -> Result<(), ProvisionError> {
        let instance = self
            .catalog
            .get_instance(id)
            .await
            .map_err(ProvisionError::catalog)?
            .ok_or(ProvisionError::InstanceNotFound(id))?;

        self.lifecycle
            .retire(id, std::path::Path::new(&instance.file_path))
            .await;

        self.catalog
            .deactivate_instance(id)
            .await
            .map_err(ProvisionError::catalog)?;

        tracing::info!(instance_id = %id, "Instance retired");
        Ok(())
    }

    /// Whether `identity` satisfies the current global required set.
    pub async fn check_membership(&self, identity: &str) -> Result<bool, ProvisionError> {
        self.gate.satisfies(identity, None).await
    }
}
