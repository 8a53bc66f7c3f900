use chrono::{Datelike, NaiveDate};

use crate::errors::{Error, Result};

/// Format used for calendar months throughout the app (`2024-03`).
pub const MONTH_FORMAT: &str = "%Y-%m";

/// Parses a `YYYY-MM` string into the first day of that month.
pub fn parse_month(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d").map_err(|_| {
        Error::invalid_input(format!("Invalid month '{}', expected YYYY-MM", value))
    })
}

/// Formats a date as its `YYYY-MM` month key.
pub fn format_month(date: NaiveDate) -> String {
    date.format(MONTH_FORMAT).to_string()
}

/// Snaps any date to the first day of its month.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Serde adapter storing a `NaiveDate` as a `YYYY-MM` month key.
pub mod month_serde {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_month(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_month(&raw).map_err(serde::de::Error::custom)
    }
}
