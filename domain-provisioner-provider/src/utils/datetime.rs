//! Datetime serialization/deserialization helpers.
//!
//! - Serialization: `DateTime<Utc>` -> RFC3339 string
//! - Deserialization: RFC3339 string or Unix timestamp -> `DateTime<Utc>`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum TimestampOrString {
    String(String),
    I64(i64),
    U64(u64),
}

impl TimestampOrString {
    fn into_datetime<E: serde::de::Error>(self) -> Result<DateTime<Utc>, E> {
        match self {
            Self::String(s) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| E::custom(format!("Invalid RFC3339 timestamp: {e}"))),
            Self::I64(ts) => {
                parse_unix_timestamp(ts).ok_or_else(|| E::custom("Invalid Unix timestamp"))
            }
            Self::U64(ts) => i64::try_from(ts)
                .ok()
                .and_then(parse_unix_timestamp)
                .ok_or_else(|| E::custom("Invalid Unix timestamp")),
        }
    }
}

/// Serializes `DateTime<Utc>` as an RFC3339 string.
pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&dt.to_rfc3339())
}

/// Deserializes `DateTime<Utc>` from RFC3339 or a Unix timestamp.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    TimestampOrString::deserialize(deserializer)?.into_datetime()
}

/// `Option<DateTime<Utc>>` helpers.
pub mod option {
    use super::{DateTime, Deserialize, Deserializer, Serializer, TimestampOrString, Utc};

    /// Serializes `Option<DateTime<Utc>>` as RFC3339 or `null`.
    #[allow(clippy::ref_option)]
    pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match dt {
            Some(dt) => serializer.serialize_some(&dt.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes `Option<DateTime<Utc>>` from RFC3339, a Unix timestamp, or `null`.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<TimestampOrString>::deserialize(deserializer)?
            .map(TimestampOrString::into_datetime)
            .transpose()
    }
}

/// Parses a Unix timestamp; values above 10^11 are treated as milliseconds.
fn parse_unix_timestamp(ts: i64) -> Option<DateTime<Utc>> {
    if ts > 100_000_000_000 {
        DateTime::from_timestamp_millis(ts)
    } else {
        DateTime::from_timestamp(ts, 0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Stamp {
        #[serde(with = "super")]
        at: DateTime<Utc>,
        #[serde(default, with = "super::option")]
        seen: Option<DateTime<Utc>>,
    }

    #[test]
    fn accepts_rfc3339_and_unix_forms() {
        let a: Stamp = serde_json::from_str(r#"{"at":"2024-01-01T00:00:00Z"}"#).unwrap();
        let b: Stamp = serde_json::from_str(r#"{"at":1704067200}"#).unwrap();
        let c: Stamp = serde_json::from_str(r#"{"at":1704067200000,"seen":null}"#).unwrap();

        assert_eq!(a.at, b.at);
        assert_eq!(b.at, c.at);
        assert!(a.seen.is_none());
    }

    #[test]
    fn serializes_as_rfc3339() {
        let stamp = Stamp {
            at: DateTime::from_timestamp(0, 0).unwrap(),
            seen: None,
        };
        let json = serde_json::to_string(&stamp).unwrap();
        assert_eq!(json, r#"{"at":"1970-01-01T00:00:00+00:00","seen":null}"#);
    }
}
