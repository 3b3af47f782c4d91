use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_yaml::Value;

/// Format every post date is normalised to
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Read a post date from a front matter value. Accepts `YYYY-MM-DD`,
/// `YYYY-MM-DD HH:MM:SS`, the same with a `+ZZZZ` offset, and RFC 3339.
/// Offsets are dropped; the wall clock time is kept.
pub fn parse_date(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_date_str(s),
        Value::Tagged(tagged) => parse_date(&tagged.value),
        _ => None,
    }
}

/// String form of [`parse_date`]
pub fn parse_date_str(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.naive_local());
    }

    if let Ok(parsed) = DateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S %z") {
        return Some(parsed.naive_local());
    }

    if let Ok(parsed) = NaiveDateTime::parse_from_str(text, DATE_FORMAT) {
        return Some(parsed);
    }

    if let Ok(parsed) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M") {
        return Some(parsed);
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

pub fn format_date(date: &NaiveDateTime) -> String {
    date.format(DATE_FORMAT).to_string()
}
