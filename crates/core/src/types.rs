/// Templates and instances are identified by UUIDv4, generated at creation.
pub type TemplateId = uuid::Uuid;

/// Instance ids share the same keyspace convention as template ids.
pub type InstanceId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
