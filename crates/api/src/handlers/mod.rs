pub mod instances;
pub mod memberships;
pub mod templates;
