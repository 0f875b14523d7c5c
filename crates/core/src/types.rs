/// File record ids are UUIDv7 strings (timestamp-ordered, collision-resistant).
pub type FileId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
