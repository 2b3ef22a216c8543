//! Cell normalizers used by the cleaner.
//!
//! Each normalizer takes the raw text of one cell and returns the typed
//! value, or a message describing why the text does not fit. Strip steps
//! are no-ops when the character is absent.

use once_cell::sync::Lazy;
use regex::Regex;

/// Text markers the loader of record treats as an empty cell.
pub const NA_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid digits regex"));

/// Whether a cell counts as missing: absent, empty, or exactly an NA
/// marker. Whitespace is significant, so `"   "` is a value.
pub fn is_missing(cell: Option<&str>) -> bool {
    match cell {
        None => true,
        Some(text) => text.is_empty() || NA_MARKERS.contains(&text),
    }
}

/// Parse a rating cell. Missing cells yield `Ok(None)`.
pub fn parse_rating(cell: Option<&str>) -> Result<Option<f64>, String> {
    if is_missing(cell) {
        return Ok(None);
    }
    let text = cell.unwrap_or_default().trim();
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err("rating is not a number".to_string()),
    }
}

/// `"1,000,000+"` -> `1000000`, `"0+"` -> `0`, `"500"` -> `500`.
pub fn normalize_installs(text: &str) -> Result<u64, String> {
    let text = text.trim();
    let text = text.strip_suffix('+').unwrap_or(text);
    let digits = text.replace(',', "");
    parse_digits(&digits, "install count")
}

/// `"$4.99"` -> `4.99`, `"0"` -> `0.0`.
pub fn normalize_price(text: &str) -> Result<f64, String> {
    let text = text.trim();
    let text = text.strip_prefix('$').unwrap_or(text);
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v),
        Ok(_) => Err("price must be a finite, non-negative amount".to_string()),
        Err(_) => Err("price is not a number".to_string()),
    }
}

/// Review counts are plain integers; no symbols are stripped.
pub fn normalize_reviews(text: &str) -> Result<u64, String> {
    parse_digits(text.trim(), "review count")
}

fn parse_digits(text: &str, what: &str) -> Result<u64, String> {
    if !DIGITS.is_match(text) {
        return Err(format!("{} is not a whole number", what));
    }
    text.parse::<u64>()
        .map_err(|e| format!("{} out of range: {}", what, e))
}
