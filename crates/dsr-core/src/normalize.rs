//! Value normalization for spreadsheet cells
//!
//! Spreadsheet exports leave behind placeholder tokens (`nan`, `None`, `N/A`)
//! and dates in whatever encoding the exporting tool preferred. The helpers here
//! turn those into values the form accepts, never failing on bad data.

use chrono::{Datelike, NaiveDate};
use tracing::warn;

/// Placeholder tokens that mean "no value"
const PLACEHOLDERS: [&str; 5] = ["nan", "none", "n/a", "null", "nat"];

/// Check whether a raw cell value carries no information
///
/// True for `None`, blank strings and export placeholders, compared
/// case-insensitively after trimming.
pub fn is_missing(raw: Option<&str>) -> bool {
    match raw {
        None => true,
        Some(value) => {
            let trimmed = value.trim();
            trimmed.is_empty() || PLACEHOLDERS.iter().any(|p| trimmed.eq_ignore_ascii_case(p))
        }
    }
}

/// Trimmed cell value, or `None` when the cell is missing
pub fn present(raw: Option<&str>) -> Option<&str> {
    if is_missing(raw) {
        None
    } else {
        raw.map(str::trim)
    }
}

/// Convert a birth date into the form's `M/D/YYYY` display format
///
/// Rules, first match wins:
/// 1. missing → `""`
/// 2. contains `T` → date part before `T` as `YYYY-MM-DD`
/// 3. contains a space and a colon → date part before the space as `YYYY-MM-DD`
/// 4. ten characters shaped like `YYYY-MM-DD` → parsed directly
/// 5. contains `/` → already formatted, returned unchanged
/// 6. anything else → returned unchanged with a warning
///
/// Month and day are not zero-padded. The function is not idempotent in general:
/// any slash-formatted input passes through untouched, padded or not.
pub fn format_birth_date(raw: &str) -> String {
    if is_missing(Some(raw)) {
        return String::new();
    }
    let value = raw.trim();

    let date_part = if let Some((date, _)) = value.split_once('T') {
        Some(date)
    } else if value.contains(' ') && value.contains(':') {
        value.split_once(' ').map(|(date, _)| date)
    } else if looks_like_iso_date(value) {
        Some(value)
    } else {
        None
    };

    if let Some(date) = date_part {
        return match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
            Ok(parsed) => format!("{}/{}/{}", parsed.month(), parsed.day(), parsed.year()),
            Err(e) => {
                warn!("Unparseable birth date '{}': {}", raw, e);
                raw.to_string()
            }
        };
    }

    if value.contains('/') {
        return raw.to_string();
    }

    warn!("Unrecognized birth date format: '{}'", raw);
    raw.to_string()
}

fn looks_like_iso_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10 && bytes[4] == b'-' && bytes[7] == b'-'
}
