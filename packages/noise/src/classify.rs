//! Decibel extraction and severity classification.
//!
//! Descriptors look like `"< 55 dB(A)"`, `"> 60 - 65 dB(A)"` or, before
//! translation, `"bis 55 dB(A)"`. The governing value is the largest
//! integer in the text, so ranges classify by their upper bound.
//!
//! Thresholds are inclusive upper bounds:
//!
//! | Max dB(A) | Tier    |
//! |-----------|---------|
//! | ≤ 55      | None    |
//! | ≤ 59      | Low     |
//! | ≤ 64      | Mid     |
//! | ≤ 69      | High    |
//! | > 69      | Extreme |

use immo_noise_noise_models::Tier;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Unsigned integers embedded in a descriptor.
static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Phrases that mean "below the lowest mapped level" without a number.
/// Generic no-data wording ("keine Angabe", "none") is not among them.
static BELOW_MINIMUM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:unter(?:halb)?|below|less than)\b").expect("valid regex")
});

/// Locale threshold words, longest alternatives first.
static THRESHOLD_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:bis zu|bis einschließlich|up to and including|bis|up to|ab|from)\b")
        .expect("valid regex")
});

/// A classified descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Severity tier.
    pub tier: Tier,
    /// Governing decibel value; `None` for number-less "below minimum"
    /// phrases.
    pub decibels: Option<u32>,
}

/// Extracts every integer embedded in `descriptor`.
///
/// Integers too large for `u32` saturate to `u32::MAX`.
#[must_use]
pub fn extract_decibels(descriptor: &str) -> Vec<u32> {
    INTEGER_RE
        .find_iter(descriptor)
        .map(|m| {
            m.as_str().parse().unwrap_or_else(|e| {
                log::debug!(
                    "Saturating oversized value '{}' in '{descriptor}': {e}",
                    m.as_str()
                );
                u32::MAX
            })
        })
        .collect()
}

/// Returns the largest integer in `descriptor`.
#[must_use]
pub fn max_decibels(descriptor: &str) -> Option<u32> {
    extract_decibels(descriptor).into_iter().max()
}

/// Whether `value` contains at least one digit.
#[must_use]
pub fn has_usable_value(value: &str) -> bool {
    value.chars().any(|c| c.is_ascii_digit())
}

/// Maps a decibel value to its tier.
#[must_use]
pub const fn tier_for_decibels(db: u32) -> Tier {
    match db {
        0..=55 => Tier::None,
        56..=59 => Tier::Low,
        60..=64 => Tier::Mid,
        65..=69 => Tier::High,
        _ => Tier::Extreme,
    }
}

/// Classifies a descriptor.
///
/// Returns `None` when the descriptor has no integer and no recognized
/// below-minimum phrase. Such readings are unavailable, not quiet.
#[must_use]
pub fn classify(descriptor: &str) -> Option<Classification> {
    if let Some(db) = max_decibels(descriptor) {
        return Some(Classification {
            tier: tier_for_decibels(db),
            decibels: Some(db),
        });
    }

    BELOW_MINIMUM_RE.is_match(descriptor).then_some(Classification {
        tier: Tier::None,
        decibels: None,
    })
}

/// Rewrites locale threshold words into symbols for display.
///
/// `"bis zu"` becomes `<=`, `"bis"` becomes `<`, `"ab"` becomes `>`
/// (and likewise for the English phrasings). Only applied to per-layer
/// descriptors; the aggregated source already answers translated.
#[must_use]
pub fn translate_threshold_words(descriptor: &str) -> String {
    THRESHOLD_WORD_RE
        .replace_all(descriptor, |caps: &regex::Captures<'_>| match &caps[0] {
            "bis" | "up to" => "<",
            "ab" | "from" => ">",
            _ => "<=",
        })
        .into_owned()
}
