//! Sortable ISO-8601 timestamp text used in every dataset artifact.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serializer};

/// Whole-second, zone-less ISO-8601 layout.
pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn format(value: &NaiveDateTime) -> String {
    value.format(FORMAT).to_string()
}

pub fn parse(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw.trim(), FORMAT)
}

pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&value.format(FORMAT))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn format_is_sortable_iso() {
        let value = NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|date| date.and_hms_opt(7, 5, 0))
            .expect("valid timestamp");
        assert_eq!(format(&value), "2024-03-09T07:05:00");
        assert_eq!(parse("2024-03-09T07:05:00").expect("parse"), value);
    }

    #[test]
    fn parse_rejects_other_layouts() {
        assert!(parse("2024-03-09 07:05:00").is_err());
    }
}
