//! Address text normalization.
//!
//! Scraped addresses arrive as:
//! - Multi-line blocks: `"Alexanderplatz 1\n10178 Berlin"`
//! - Fragment joins with gaps: `" 1, 10178 Berlin"`
//! - Stray separators: `"Torstraße 5 ,, 10119 Berlin ,"`
//!
//! Output is a single line with single spaces, `", "` separators, and no
//! leading or trailing separator.

use regex::Regex;
use std::sync::LazyLock;

/// Runs of any whitespace, including line breaks and NBSP.
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// One or more commas with any surrounding whitespace.
static COMMA_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*,(?:\s*,)*\s*").expect("valid regex"));

/// Line breaks, which separate address parts in listing markup.
static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n").expect("valid regex"));

/// Normalizes raw address text into a single lookup-ready line.
///
/// Returns `None` for empty or whitespace/comma-only input.
#[must_use]
pub fn normalize_address_text(text: &str) -> Option<String> {
    let collapsed = WHITESPACE_RE.replace_all(text, " ");
    let separated = COMMA_RUN_RE.replace_all(&collapsed, ", ");
    let cleaned = separated.trim_matches(|c: char| c == ',' || c.is_whitespace());

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Normalizes a multi-line address block, treating each line break as a
/// part separator.
#[must_use]
pub fn normalize_address_lines(text: &str) -> Option<String> {
    normalize_address_text(&LINE_BREAK_RE.replace_all(text, ", "))
}

/// Appends `", <city>"` unless `city` already appears in `address` as a
/// whole word (case-insensitive).
#[must_use]
pub fn ensure_city_in_address(address: &str, city: &str) -> String {
    let city = city.trim();
    if address.is_empty() || city.is_empty() {
        return address.to_string();
    }

    let present = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(city))).map_or_else(
        |_| address.to_lowercase().contains(&city.to_lowercase()),
        |re| re.is_match(address),
    );

    if present {
        address.to_string()
    } else {
        format!("{address}, {city}")
    }
}
