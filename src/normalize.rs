// Field normalizer: pure, total functions over arbitrary input strings.
// Every text value entering a JobRecord passes through here.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Hard cap on any single extracted field.
const MAX_FIELD_LEN: usize = 10_000;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));
static ZERO_WIDTH: Lazy<Regex> =
    Lazy::new(|| Regex::new("[\u{200b}\u{200c}\u{200d}\u{feff}]").expect("zero-width regex"));
static GERMAN_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})\.(\d{1,2})\.(\d{4})").expect("date regex"));

/// Clean extracted text: trim, collapse whitespace runs to single spaces,
/// strip zero-width characters, truncate overlong values. Returns `None`
/// when nothing remains.
pub fn clean_text(raw: &str) -> Option<String> {
    let text = raw.trim();
    let text = WHITESPACE.replace_all(text, " ");
    let text = ZERO_WIDTH.replace_all(&text, "");
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if text.chars().count() > MAX_FIELD_LEN {
        let truncated: String = text.chars().take(MAX_FIELD_LEN).collect();
        return Some(format!("{truncated}..."));
    }
    Some(text.to_string())
}

/// Parse a date string to `YYYY-MM-DD`.
///
/// Accepts ISO-8601 (date, datetime, datetime with offset or `Z`) and the
/// German `DD.MM.YYYY` format. Returns `None` on anything else.
pub fn parse_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.format("%Y-%m-%d").to_string());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.format("%Y-%m-%d").to_string());
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d.format("%Y-%m-%d").to_string());
    }

    if let Some(caps) = GERMAN_DATE.captures(raw)
        && let (Ok(day), Ok(month), Ok(year)) =
            (caps[1].parse(), caps[2].parse(), caps[3].parse())
        && let Some(d) = NaiveDate::from_ymd_opt(year, month, day)
    {
        return Some(d.format("%Y-%m-%d").to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_collapses_whitespace() {
        assert_eq!(
            clean_text("  Frontend \t Developer \n (m/w/d)  ").as_deref(),
            Some("Frontend Developer (m/w/d)")
        );
    }

    #[test]
    fn clean_text_strips_zero_width() {
        assert_eq!(
            clean_text("Tech\u{200b}Corp\u{feff} GmbH").as_deref(),
            Some("TechCorp GmbH")
        );
    }

    #[test]
    fn clean_text_empty_is_none() {
        assert_eq!(clean_text(""), None);
        assert_eq!(clean_text("   \n\t "), None);
        assert_eq!(clean_text("\u{200b}\u{200c}"), None);
    }

    #[test]
    fn clean_text_truncates_with_marker() {
        let long = "a".repeat(12_000);
        let cleaned = clean_text(&long).unwrap();
        assert_eq!(cleaned.chars().count(), 10_003);
        assert!(cleaned.ends_with("..."));
    }

    #[test]
    fn parse_date_iso_variants() {
        assert_eq!(parse_date("2024-03-05").as_deref(), Some("2024-03-05"));
        assert_eq!(
            parse_date("2024-03-05T10:30:00").as_deref(),
            Some("2024-03-05")
        );
        assert_eq!(
            parse_date("2024-03-05T10:30:00Z").as_deref(),
            Some("2024-03-05")
        );
        assert_eq!(
            parse_date("2024-03-05T10:30:00+02:00").as_deref(),
            Some("2024-03-05")
        );
    }

    #[test]
    fn parse_date_german_format() {
        assert_eq!(parse_date("5.3.2024").as_deref(), Some("2024-03-05"));
        assert_eq!(parse_date("15.12.2023").as_deref(), Some("2023-12-15"));
        // Trailing noise after a valid German date is tolerated
        assert_eq!(parse_date("15.12.2023 um 10 Uhr").as_deref(), Some("2023-12-15"));
    }

    #[test]
    fn parse_date_garbage_is_none() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("soon"), None);
        assert_eq!(parse_date("am Montag"), None);
    }

    #[test]
    fn parse_date_rejects_impossible_calendar_dates() {
        assert_eq!(parse_date("99.99.2024"), None);
        assert_eq!(parse_date("32.01.2024"), None);
        assert_eq!(parse_date("29.02.2023"), None);
        // Leap day in a leap year is fine
        assert_eq!(parse_date("29.02.2024").as_deref(), Some("2024-02-29"));
    }
}
