//! Stored instants.
//!
//! Records are written with RFC 3339 strings. Older store files carry Unix
//! epoch seconds as JSON numbers (fractional part allowed); both read back
//! as the same `DateTime<Utc>`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInstant {
    Text(DateTime<Utc>),
    EpochSeconds(f64),
}

pub(crate) fn lenient<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    match RawInstant::deserialize(deserializer)? {
        RawInstant::Text(at) => Ok(at),
        RawInstant::EpochSeconds(secs) => from_epoch_seconds(secs)
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp {secs} out of range"))),
    }
}

fn from_epoch_seconds(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * NANOS_PER_SEC).round().min(NANOS_PER_SEC - 1.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos)
}
