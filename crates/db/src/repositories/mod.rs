pub mod instance_repo;
pub mod membership_repo;
pub mod template_repo;

pub use instance_repo::InstanceRepo;
pub use membership_repo::MembershipRepo;
pub use template_repo::TemplateRepo;
