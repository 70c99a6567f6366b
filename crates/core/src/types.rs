/// Backend primary keys are opaque strings (UUIDs in production).
pub type EntityId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
