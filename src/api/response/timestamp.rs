use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Accept RFC 3339 timestamps as well as offset-less ISO-8601 ones, the latter being UTC.
pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
    let value = String::deserialize(d)?;
    parse(&value).map_err(|e| serde::de::Error::custom(format!("invalid timestamp {:?}: {}", value, e)))
}

pub fn parse(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .map(|t| DateTime::<Utc>::from_naive_utc_and_offset(t, Utc))
        })
}
