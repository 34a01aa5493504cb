use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Canonical UTC timestamp for every `created_at`/`updated_at` field.
///
/// Backend revisions disagree on the wire format: some send ISO 8601 strings
/// (with or without an offset), others send `[year, month, day, hour, minute,
/// second]` arrays, optionally followed by nanoseconds. Both decode here so
/// nothing past the service boundary ever sees the raw representation.
/// Values without an offset are taken as UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn from_utc(datetime: DateTime<Utc>) -> Self {
        Timestamp(datetime)
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    pub fn parse_str(value: &str) -> Result<Self, String> {
        let value = value.trim();

        if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
            return Ok(Timestamp(datetime.with_timezone(&Utc)));
        }

        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
                return Ok(Timestamp(naive.and_utc()));
            }
        }

        if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return Ok(Timestamp(naive.and_utc()));
            }
        }

        Err(format!("Unrecognized timestamp: {}", value))
    }

    /// `[year, month, day, hour?, minute?, second?, nanosecond?]`
    pub fn from_parts(parts: &[i64]) -> Result<Self, String> {
        if parts.len() < 3 {
            return Err(format!(
                "Timestamp array needs at least 3 elements, got {}",
                parts.len()
            ));
        }

        let part = |index: usize| -> Result<u32, String> {
            let value = parts.get(index).copied().unwrap_or(0);
            u32::try_from(value).map_err(|_| format!("Invalid timestamp component: {}", value))
        };

        let year = i32::try_from(parts[0])
            .map_err(|_| format!("Invalid timestamp year: {}", parts[0]))?;

        let date = NaiveDate::from_ymd_opt(year, part(1)?, part(2)?)
            .ok_or_else(|| format!("Invalid timestamp date: {:?}", parts))?;

        let naive = date
            .and_hms_nano_opt(part(3)?, part(4)?, part(5)?, part(6)?)
            .ok_or_else(|| format!("Invalid timestamp time: {:?}", parts))?;

        Ok(Timestamp(naive.and_utc()))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(datetime: DateTime<Utc>) -> Self {
        Timestamp(datetime)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M:%S"))
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

struct TimestampVisitor;

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an ISO 8601 string or a [year, month, day, ...] array")
    }

    fn visit_str<E>(self, value: &str) -> Result<Timestamp, E>
    where
        E: de::Error,
    {
        Timestamp::parse_str(value).map_err(E::custom)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Timestamp, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut parts = Vec::with_capacity(7);
        while let Some(part) = seq.next_element::<i64>()? {
            parts.push(part);
        }
        Timestamp::from_parts(&parts).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(TimestampVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn expected() -> Timestamp {
        Timestamp(Utc.with_ymd_and_hms(2024, 5, 1, 10, 30, 15).unwrap())
    }

    #[test]
    fn test_string_and_array_agree() {
        let from_str: Timestamp = serde_json::from_str(r#""2024-05-01T10:30:15Z""#).unwrap();
        let from_array: Timestamp = serde_json::from_str("[2024, 5, 1, 10, 30, 15]").unwrap();

        assert_eq!(from_str, expected());
        assert_eq!(from_array, expected());
    }

    #[test]
    fn test_naive_strings_are_utc() {
        for value in [
            "2024-05-01T10:30:15",
            "2024-05-01 10:30:15",
            "2024-05-01T12:30:15+02:00",
        ] {
            assert_eq!(Timestamp::parse_str(value).unwrap(), expected(), "{}", value);
        }

        let fractional = Timestamp::parse_str("2024-05-01T10:30:15.123456").unwrap();
        assert_eq!(fractional.as_datetime().timestamp(), expected().as_datetime().timestamp());
    }

    #[test]
    fn test_array_with_nanos_and_short_arrays() {
        let with_nanos: Timestamp =
            serde_json::from_str("[2024, 5, 1, 10, 30, 15, 500000000]").unwrap();
        assert_eq!(with_nanos.as_datetime().timestamp_subsec_millis(), 500);

        let date_only: Timestamp = serde_json::from_str("[2024, 5, 1]").unwrap();
        assert_eq!(date_only.to_string(), "2024-05-01 00:00:00");

        assert!(serde_json::from_str::<Timestamp>("[2024, 5]").is_err());
        assert!(serde_json::from_str::<Timestamp>("[2024, 13, 1]").is_err());
        assert!(serde_json::from_str::<Timestamp>(r#""yesterday""#).is_err());
    }

    #[test]
    fn test_serializes_as_rfc3339() {
        let json = serde_json::to_string(&expected()).unwrap();
        assert_eq!(json, r#""2024-05-01T10:30:15Z""#);
        assert_eq!(expected().to_string(), "2024-05-01 10:30:15");
    }
}
