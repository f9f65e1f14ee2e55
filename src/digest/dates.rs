use chrono::NaiveDate;
use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;

/// Stand-in for identifiers without a usable date. Sorts before every real date.
pub const UNDATED: NaiveDate = NaiveDate::MIN;

/// ASCII digits only; `\d` would also match other Unicode digit runs.
pub fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[0-9]{4}-[0-9]{2}-[0-9]{2}").expect("static date pattern")
    })
}

/// Calendar date embedded in an archive identifier.
///
/// Only the first `YYYY-MM-DD` occurrence is considered. No match, or a match
/// that is not a real calendar day, yields [`UNDATED`].
pub fn extract_date(identifier: &str) -> NaiveDate {
    let Some(found) = date_pattern().find(identifier) else {
        return UNDATED;
    };
    NaiveDate::parse_from_str(found.as_str(), "%Y-%m-%d").unwrap_or(UNDATED)
}

pub fn is_undated(date: NaiveDate) -> bool {
    date == UNDATED
}

/// Newest-first ordering: later dates first, then descending identifier.
pub fn newest_first(a: &str, b: &str) -> Ordering {
    extract_date(b)
        .cmp(&extract_date(a))
        .then_with(|| b.cmp(a))
}

pub fn display_date(date: NaiveDate) -> String {
    if is_undated(date) {
        return "undated".to_string();
    }
    date.format("%Y-%m-%d").to_string()
}
