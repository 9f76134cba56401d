//! Canonical timestamp encoding.
//!
//! Timestamps are written as RFC 3339 UTC with millisecond precision and a
//! `Z` suffix (`2026-10-18T09:30:00.000Z`). On read, any RFC 3339 offset is
//! accepted, as is a bare `timestamp without time zone` value, which is taken
//! as UTC.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

use crate::error::{Error, InvalidInputError};

/// Format a timestamp in the canonical encoding.
pub fn format(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a timestamp produced by a backend.
pub fn parse(s: &str) -> Result<DateTime<Utc>, Error> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| {
            InvalidInputError::Other {
                message: format!("invalid timestamp '{}': {}", s, e),
            }
            .into()
        })
}

pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format(ts))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse(&s).map_err(serde::de::Error::custom)
}

/// Same encoding for optional timestamps (`null` when absent).
pub mod option {
    use super::*;

    pub fn serialize<S>(ts: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match ts {
            Some(ts) => serializer.serialize_str(&super::format(ts)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Option::<String>::deserialize(deserializer)?;
        s.map(|s| super::parse(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_with_millis_and_z() {
        let ts = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        assert_eq!(format(&ts), "2026-10-18T09:30:00.000Z");
    }

    #[test]
    fn parses_offsets() {
        let ts = parse("2026-10-18T11:30:00.250+02:00").unwrap();
        assert_eq!(format(&ts), "2026-10-18T09:30:00.250Z");
    }

    #[test]
    fn parses_naive_as_utc() {
        let ts = parse("2026-10-18T09:30:00.123456").unwrap();
        assert_eq!(format(&ts), "2026-10-18T09:30:00.123Z");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("yesterday").is_err());
    }
}
