//! Fuzzy date and datetime parsing.
//!
//! The whole text is tried against a list of common formats first; failing
//! that, the first date-looking fragment inside the text is parsed. Month
//! first wins for ambiguous `03/04/2024` style dates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::table::Cell;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d %B %Y %H:%M:%S",
    "%d %B %Y %H:%M",
    "%B %d %Y %H:%M:%S",
    "%B %d %Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m/%d/%y",
    "%d/%m/%y",
    "%d.%m.%Y",
    "%d-%m-%Y",
    "%d %B %Y",
    "%B %d %Y",
];

const MONTHS: &str = "jan|feb|mar|apr|may|jun|jul|aug|sep|sept|oct|nov|dec";

static FRAGMENT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    let time = r"(?:[ T]\d{1,2}:\d{2}(?::\d{2}(?:\.\d+)?)?)?";
    [
        format!(r"\d{{4}}[-/]\d{{1,2}}[-/]\d{{1,2}}{}", time),
        format!(r"\d{{1,2}}/\d{{1,2}}/\d{{2,4}}{}", time),
        format!(r"\d{{1,2}}\.\d{{1,2}}\.\d{{4}}"),
        format!(r"(?i)\d{{1,2}}(?:st|nd|rd|th)?\s+(?:{})[a-z]*\.?,?\s+\d{{4}}{}", MONTHS, time),
        format!(r"(?i)(?:{})[a-z]*\.?\s+\d{{1,2}}(?:st|nd|rd|th)?,?\s+\d{{4}}{}", MONTHS, time),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid date fragment pattern"))
    .collect()
});

static ORDINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d)(st|nd|rd|th)\b").expect("valid ordinal pattern"));

static SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid spaces pattern"));

/// A parsed value and whether a time of day was present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Parsed {
    value: NaiveDateTime,
    has_time: bool,
}

fn normalize(text: &str) -> String {
    let text = ORDINAL.replace_all(text.trim(), "$1");
    let text = text.replace([',', '.'], " ");
    SPACES.replace_all(text.trim(), " ").into_owned()
}

fn parse_exact(text: &str) -> Option<Parsed> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(Parsed { value: dt.naive_local(), has_time: true });
    }

    // Formats with dots (`%.f`, `%d.%m.%Y`) see the raw text; the others see
    // commas and dots flattened to spaces.
    let normalized = normalize(text);
    for candidate in [text, normalized.as_str()] {
        for format in DATETIME_FORMATS {
            if let Ok(value) = NaiveDateTime::parse_from_str(candidate, format) {
                return Some(Parsed { value, has_time: true });
            }
        }
        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(candidate, format) {
                return Some(Parsed { value: date.and_time(NaiveTime::MIN), has_time: false });
            }
        }
    }
    None
}

fn parse_fuzzy(text: &str) -> Option<Parsed> {
    parse_exact(text).or_else(|| {
        FRAGMENT_PATTERNS
            .iter()
            .filter_map(|pattern| pattern.find(text))
            .find_map(|fragment| parse_exact(fragment.as_str()))
    })
}

/// Parse the first date found in `text`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    parse_fuzzy(text).map(|p| p.value.date())
}

/// Parse the first date found in `text`, midnight when no time is given.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    parse_fuzzy(text).map(|p| p.value)
}

/// `Date` when the parsed time is midnight, `DateTime` otherwise, `Null` when
/// nothing parses.
pub fn to_date_or_datetime(text: &str) -> Cell {
    match parse_fuzzy(text) {
        Some(parsed) if parsed.has_time && parsed.value.time() != NaiveTime::MIN => {
            Cell::DateTime(parsed.value)
        }
        Some(parsed) => Cell::Date(parsed.value.date()),
        None => Cell::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_iso_date() {
        assert_eq!(to_date_or_datetime("2024-03-15"), Cell::Date(date(2024, 3, 15)));
    }

    #[test]
    fn test_datetime_with_time() {
        let expected = date(2024, 3, 15).and_hms_opt(10, 30, 0).unwrap();
        assert_eq!(to_date_or_datetime("2024-03-15 10:30"), Cell::DateTime(expected));
    }

    #[test]
    fn test_midnight_becomes_date() {
        assert_eq!(to_date_or_datetime("2024-03-15 00:00:00"), Cell::Date(date(2024, 3, 15)));
    }

    #[test]
    fn test_month_first_then_day_first() {
        assert_eq!(parse_date("03/04/2024"), Some(date(2024, 3, 4)));
        assert_eq!(parse_date("25/12/2023"), Some(date(2023, 12, 25)));
    }

    #[test]
    fn test_month_names() {
        assert_eq!(parse_date("March 5th, 2021"), Some(date(2021, 3, 5)));
        assert_eq!(parse_date("5 Jan 2020"), Some(date(2020, 1, 5)));
    }

    #[test]
    fn test_fuzzy_fragment() {
        assert_eq!(parse_date("Delivered on 2022-07-01 by post"), Some(date(2022, 7, 1)));
        assert_eq!(parse_date("meeting: 12 February 2019."), Some(date(2019, 2, 12)));
    }

    #[test]
    fn test_unparseable_is_null() {
        assert_eq!(to_date_or_datetime("not a date"), Cell::Null);
        assert_eq!(to_date_or_datetime(""), Cell::Null);
        assert_eq!(parse_datetime("2024-13-45"), None);
    }
}
