use crate::types::{InstanceId, TemplateId};

/// Errors surfaced by the provisioning core.
///
/// Every variant is scoped to a single request; none is fatal to the
/// process. Best-effort sub-steps (retirement cleanup, membership
/// binding) log their failures instead of raising them, so they never
/// appear here.
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    /// The requester does not satisfy the required membership set.
    /// User-recoverable by joining the required groups.
    #[error("Requester does not satisfy the required membership set")]
    GateRejected,

    #[error("Template not found: {0}")]
    TemplateNotFound(TemplateId),

    #[error("Instance not found: {0}")]
    InstanceNotFound(InstanceId),

    /// The process host failed to launch the instance. Terminal for the
    /// request; no retry, no catalog write.
    #[error("Failed to launch instance process: {0}")]
    SpawnFailed(#[source] std::io::Error),

    /// Writing template or instance source text failed. Terminal.
    #[error("Failed to write instance source: {0}")]
    StorageWriteFailed(#[source] std::io::Error),

    /// A catalog store operation failed.
    #[error("Catalog error: {0}")]
    Catalog(String),
}

impl ProvisionError {
    /// Wrap a catalog store failure. The store's concrete error type is
    /// flattened to a message so this crate stays persistence-agnostic.
    pub fn catalog(err: impl std::fmt::Display) -> Self {
        Self::Catalog(err.to_string())
    }
}
