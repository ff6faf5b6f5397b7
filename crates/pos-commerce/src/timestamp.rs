//! Timestamp normalization.
//!
//! Documents carry time fields in more than one shape: the document
//! service writes structured `{seconds, nanoseconds}` values, locally
//! saved drafts store raw epoch milliseconds, and some older records hold
//! RFC 3339 text. Everything that sorts or displays by time goes through
//! [`Timestamp::to_epoch_millis`].

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// A point in time in any of the stored shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// `{ "seconds": .., "nanoseconds": .. }`
    Structured {
        seconds: i64,
        #[serde(default)]
        nanoseconds: i64,
    },
    /// Whole epoch milliseconds, the shape locally saved records use.
    EpochMillis(i64),
    /// Epoch milliseconds with a fractional part.
    Millis(f64),
    /// RFC 3339 text.
    Text(String),
}

impl Timestamp {
    /// Structured timestamp for the current instant.
    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    /// Raw milliseconds for the current instant.
    pub fn now_millis() -> Self {
        Self::EpochMillis(Utc::now().timestamp_millis())
    }

    /// Milliseconds since the Unix epoch.
    ///
    /// Unparseable text and non-finite numbers normalize to `0`, which
    /// sorts them as the oldest entries.
    pub fn to_epoch_millis(&self) -> i64 {
        match self {
            Timestamp::Structured {
                seconds,
                nanoseconds,
            } => seconds
                .saturating_mul(1000)
                .saturating_add(nanoseconds / 1_000_000),
            Timestamp::EpochMillis(ms) => *ms,
            Timestamp::Millis(ms) if ms.is_finite() => *ms as i64,
            Timestamp::Millis(_) => 0,
            Timestamp::Text(s) => DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.timestamp_millis())
                .unwrap_or(0),
        }
    }

    /// As a UTC date-time.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.to_epoch_millis()).single()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Timestamp::Structured {
            seconds: dt.timestamp(),
            nanoseconds: i64::from(dt.timestamp_subsec_nanos()),
        }
    }
}

/// Epoch millis of an optional timestamp, `0` when absent.
pub fn epoch_millis(ts: Option<&Timestamp>) -> i64 {
    ts.map(Timestamp::to_epoch_millis).unwrap_or(0)
}

/// Sort newest first by the timestamp `key` returns.
pub fn sort_newest_first<T, F>(items: &mut [T], key: F)
where
    F: Fn(&T) -> Option<&Timestamp>,
{
    items.sort_by_key(|item| std::cmp::Reverse(epoch_millis(key(item))));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_to_millis() {
        let ts: Timestamp =
            serde_json::from_str(r#"{"seconds": 1700000000, "nanoseconds": 250000000}"#).unwrap();
        assert_eq!(ts.to_epoch_millis(), 1_700_000_000_250);
    }

    #[test]
    fn test_raw_number_to_millis() {
        let ts: Timestamp = serde_json::from_str("1700000000123").unwrap();
        assert_eq!(ts.to_epoch_millis(), 1_700_000_000_123);
    }

    #[test]
    fn test_whole_millis_serialize_without_fraction() {
        let ts: Timestamp = serde_json::from_str("1792428271487").unwrap();
        assert_eq!(ts, Timestamp::EpochMillis(1_792_428_271_487));
        assert_eq!(serde_json::to_string(&ts).unwrap(), "1792428271487");

        let now = serde_json::to_value(Timestamp::now_millis()).unwrap();
        assert!(now.is_i64());

        let fractional: Timestamp = serde_json::from_str("1.5").unwrap();
        assert_eq!(fractional, Timestamp::Millis(1.5));
    }

    #[test]
    fn test_text_to_millis() {
        let ts: Timestamp = serde_json::from_str(r#""2024-01-02T03:04:05Z""#).unwrap();
        assert_eq!(ts.to_epoch_millis(), 1_704_164_645_000);

        let bad = Timestamp::Text("yesterday".into());
        assert_eq!(bad.to_epoch_millis(), 0);
    }

    #[test]
    fn test_structured_without_nanos() {
        let ts: Timestamp = serde_json::from_str(r#"{"seconds": 10}"#).unwrap();
        assert_eq!(ts.to_epoch_millis(), 10_000);
    }

    #[test]
    fn test_mixed_shapes_sort_together() {
        let mut stamps = vec![
            Some(Timestamp::Millis(2_000.0)),
            None,
            Some(Timestamp::Structured {
                seconds: 3,
                nanoseconds: 0,
            }),
            Some(Timestamp::Millis(1_000.0)),
        ];
        sort_newest_first(&mut stamps, |t| t.as_ref());

        let millis: Vec<i64> = stamps.iter().map(|t| epoch_millis(t.as_ref())).collect();
        assert_eq!(millis, vec![3_000, 2_000, 1_000, 0]);
    }

    #[test]
    fn test_from_datetime_roundtrip() {
        let dt = Utc.timestamp_millis_opt(1_700_000_000_500).unwrap();
        let ts = Timestamp::from(dt);
        assert_eq!(ts.to_datetime(), Some(dt));
    }
}
