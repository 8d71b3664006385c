use chrono::{DateTime, Utc};

/// Generate a new random ID (UUIDv4, no dashes, lowercase hex).
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Get the current time in UTC.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}
