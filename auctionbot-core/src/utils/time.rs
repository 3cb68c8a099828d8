use chrono::{DateTime, Utc};

/// Convert a UTC timestamp to epoch seconds.
pub fn to_epoch(dt: DateTime<Utc>) -> i64 {
    dt.timestamp()
}

/// Convert epoch seconds back to UTC, falling back to 1970-01-01 when out of range.
pub fn from_epoch(epoch: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(epoch, 0).unwrap_or_default()
}

/// Returns the current epoch seconds.
pub fn current_epoch() -> i64 {
    Utc::now().timestamp()
}
