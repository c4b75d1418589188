//! Session expiration arithmetic.
//!
//! Expirations are stored as local wall-clock time in [`EXPIRATION_FORMAT`].
//! A timestamp that fails to parse counts as expired.

use chrono::{DateTime, Local, NaiveDateTime, Utc};

/// On-disk format of a session's `expiration` field.
pub const EXPIRATION_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Text shown in place of a remaining time once a session has expired.
pub const EXPIRED: &str = "Expired";

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Parses a stored expiration timestamp.
pub fn parse_expiration(timestamp: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(timestamp.trim(), EXPIRATION_FORMAT).ok()
}

/// Formats an expiry instant returned by STS as local time.
pub fn format_expiration(expiration: DateTime<Utc>) -> String {
    expiration
        .with_timezone(&Local)
        .format(EXPIRATION_FORMAT)
        .to_string()
}

/// Whether `timestamp` is at or before the current local time.
pub fn is_expired(timestamp: &str) -> bool {
    is_expired_at(timestamp, now())
}

/// Whether `timestamp` is at or before `now`.
pub fn is_expired_at(timestamp: &str, now: NaiveDateTime) -> bool {
    parse_expiration(timestamp).is_none_or(|expiration| expiration <= now)
}

/// Time left until `timestamp`, as `"{h}h {m}m {s}s"`, or [`EXPIRED`].
pub fn remaining_time(timestamp: &str) -> String {
    remaining_time_at(timestamp, now())
}

/// Time left between `now` and `timestamp`.
pub fn remaining_time_at(timestamp: &str, now: NaiveDateTime) -> String {
    match parse_expiration(timestamp) {
        Some(expiration) if expiration > now => {
            let total = (expiration - now).num_seconds();
            format!("{}h {}m {}s", total / 3600, (total % 3600) / 60, total % 60)
        }
        _ => EXPIRED.to_string(),
    }
}
