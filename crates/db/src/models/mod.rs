pub mod instance;
pub mod template;
