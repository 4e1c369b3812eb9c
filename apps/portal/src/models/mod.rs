//! Records exchanged with the placement backend.
//!
//! The backend serializes MySQL `DECIMAL` columns as strings and dates in
//! RFC 2822 form, so numeric and date fields go through the lenient helpers below.

pub mod application;
pub mod company;
pub mod job;
pub mod message;
pub mod offer;
pub mod stats;
pub mod student;

pub use application::{Application, ApplicationStatus, ApplyRequest};
pub use company::{Company, NewCompany};
pub use job::{Job, NewJob};
pub use message::{EligibilityResult, ServerMessage};
pub use offer::{NewOffer, OfferStatus};
pub use stats::{PlacementStat, StudentPlacement};
pub use student::{NewStudent, Student, StudentUpdate};

use chrono::{DateTime, NaiveDate};
use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

fn number_from_value<E: de::Error>(value: Value) -> Result<Option<f64>, E> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| E::custom("number out of range")),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| E::custom(format!("expected a number, found \"{s}\""))),
        other => Err(E::custom(format!("expected a number, found {other}"))),
    }
}

/// Accepts `8.2` as well as `"8.20"`.
pub(crate) fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    number_from_value::<D::Error>(Value::deserialize(d)?)?
        .ok_or_else(|| de::Error::custom("missing number"))
}

pub(crate) fn lenient_opt_f64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    number_from_value(Value::deserialize(d)?)
}

fn integral<E: de::Error>(n: f64) -> Result<i64, E> {
    if n.is_finite() && n.fract() == 0.0 {
        Ok(n as i64)
    } else {
        Err(E::custom(format!("expected an integer, found {n}")))
    }
}

/// Accepts `101` and `"101"`, but not `"101.9"`.
pub(crate) fn lenient_i64<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    integral(lenient_f64(d)?)
}

pub(crate) fn lenient_opt_i64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    lenient_opt_f64(d)?.map(integral::<D::Error>).transpose()
}

/// Renders a backend date as `YYYY-MM-DD`, or verbatim when it cannot be parsed.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return dt.date_naive().to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.date_naive().to_string();
    }
    // Flask's RFC 2822 form uses "GMT", which chrono only accepts as "+0000"
    if let Some(stripped) = raw.strip_suffix(" GMT") {
        if let Ok(dt) = DateTime::parse_from_rfc2822(&format!("{stripped} +0000")) {
            return dt.date_naive().to_string();
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw.get(..10).unwrap_or(raw), "%Y-%m-%d") {
        return date.to_string();
    }
    raw.to_string()
}

/// Formats a package value in lakhs per annum.
pub fn format_lpa(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("₹{v} LPA"),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_rfc2822_from_flask() {
        assert_eq!(format_date("Tue, 14 Jan 2025 00:00:00 GMT"), "2025-01-14");
    }

    #[test]
    fn test_format_date_iso_forms() {
        assert_eq!(format_date("2024-11-02T09:30:00Z"), "2024-11-02");
        assert_eq!(format_date("2024-11-02"), "2024-11-02");
        assert_eq!(format_date("2024-11-02 09:30:00"), "2024-11-02");
    }

    #[test]
    fn test_format_date_unparseable_is_verbatim() {
        assert_eq!(format_date("last week"), "last week");
    }

    #[test]
    fn test_lenient_numbers_accept_decimal_strings() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(deserialize_with = "lenient_f64")]
            cgpa: f64,
            #[serde(default, deserialize_with = "lenient_opt_i64")]
            year: Option<i64>,
        }
        let row: Row = serde_json::from_str(r#"{"cgpa": "8.20", "year": null}"#).unwrap();
        assert!((row.cgpa - 8.2).abs() < f64::EPSILON);
        assert_eq!(row.year, None);

        let row: Row = serde_json::from_str(r#"{"cgpa": 7}"#).unwrap();
        assert!((row.cgpa - 7.0).abs() < f64::EPSILON);

        assert!(serde_json::from_str::<Row>(r#"{"cgpa": "high"}"#).is_err());
    }

    #[test]
    fn test_lenient_integers_reject_fractions() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(deserialize_with = "lenient_i64")]
            total: i64,
            #[serde(default, deserialize_with = "lenient_opt_i64")]
            id: Option<i64>,
        }
        let row: Row = serde_json::from_str(r#"{"total": "3", "id": 101.0}"#).unwrap();
        assert_eq!(row.total, 3);
        assert_eq!(row.id, Some(101));

        assert!(serde_json::from_str::<Row>(r#"{"total": 2.5}"#).is_err());
        assert!(serde_json::from_str::<Row>(r#"{"total": 1, "id": "101.9"}"#).is_err());
    }
}
