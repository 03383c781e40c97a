//! Server-side timestamp assignment shared by the store backends.

use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use serde_json::{Map, Value};
use std::sync::Mutex;

use super::traits::{FieldValue, Fields};

/// Hands out strictly increasing UTC timestamps at microsecond precision
#[derive(Debug, Default)]
pub struct ServerClock {
    last_issued: Mutex<Option<DateTime<Utc>>>,
}

impl ServerClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next timestamp; never equal to or earlier than one already issued
    pub fn next(&self) -> DateTime<Utc> {
        let mut last_issued = self.last_issued.lock().unwrap_or_else(|e| e.into_inner());
        let mut now = Utc::now().trunc_subsecs(6);
        if let Some(last) = *last_issued {
            if now <= last {
                now = last + Duration::microseconds(1);
            }
        }
        *last_issued = Some(now);
        now
    }
}

/// Wire format of stored timestamps; sorts lexicographically in time order
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Replace server-timestamp placeholders and flatten to stored JSON fields
pub fn resolve_fields(fields: Fields, timestamp: DateTime<Utc>) -> Map<String, Value> {
    fields
        .into_iter()
        .map(|(name, value)| {
            let value = match value {
                FieldValue::Value(v) => v,
                FieldValue::ServerTimestamp => Value::String(format_timestamp(timestamp)),
            };
            (name, value)
        })
        .collect()
}
