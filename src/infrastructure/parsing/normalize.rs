//! Field normalization helpers shared by the listing extractors

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;

/// Digits, optionally followed by one `.` or `,` and more digits ("1.234", "1,234")
static NUMERIC_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]+[.,]?[0-9]*").expect("numeric run pattern is valid"));

/// Trimmed text, or an empty string when there is nothing to clean
pub fn clean_text(raw: Option<&str>) -> String {
    raw.map(str::trim).unwrap_or_default().to_string()
}

/// Pull the first localized integer out of `raw` and drop its separators.
///
/// Later numbers in the same text are ignored.
pub fn extract_numeric_count(raw: &str) -> String {
    NUMERIC_RUN
        .find(raw)
        .map(|m| m.as_str().chars().filter(|c| !matches!(c, '.' | ',')).collect())
        .unwrap_or_default()
}

/// Concatenated text of every descendant text node
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}
