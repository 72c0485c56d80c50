//! Provisioning subsystem: catalog access contract, membership gate,
//! process lifecycle manager, and the orchestrator composing them.
//!
//! The orchestrator exposes exactly four operations to the surrounding
//! interaction layer: request provisioning, terminate, retire, and check
//! membership. Everything else here exists to serve those four.

pub mod catalog;
pub mod gate;
pub mod lifecycle;
pub mod orchestrator;
pub mod platform;

pub use catalog::{CatalogStore, PgCatalog};
pub use gate::MembershipGate;
pub use lifecycle::LifecycleManager;
pub use orchestrator::{ProvisionRequest, Provisioner};
pub use platform::{MembershipClient, MembershipStatus, TelegramClient};
