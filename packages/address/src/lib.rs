#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Listing address handling for the immo-noise pipeline.
//!
//! Listing-site adapters hand over addresses in many shapes: multi-line
//! text blocks, fragments glued from structured fields, or strings with
//! stray commas. This crate turns them into a single lookup-ready line
//! ([`normalize`]) and decides whether a lookup should run at all
//! ([`gate`]).

pub mod gate;
pub mod normalize;

use serde::{Deserialize, Serialize};

pub use gate::{LookupRefusal, prepare_lookup};
pub use normalize::{ensure_city_in_address, normalize_address_lines, normalize_address_text};

/// An address as extracted from a listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Street name.
    pub street: Option<String>,
    /// House number, possibly with a suffix (e.g., `"12a"`).
    pub house_number: Option<String>,
    /// Postal code.
    pub zip: Option<String>,
    /// City name as detected on the page.
    pub city: Option<String>,
    /// Raw address text as scraped, possibly spanning several lines.
    pub raw_text: String,
    /// Whether the listing publishes the full street address.
    pub is_complete: bool,
}

impl Address {
    /// Creates an address from free text only.
    #[must_use]
    pub fn from_text(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            is_complete: true,
            ..Self::default()
        }
    }

    /// Whether any street-level structured field was extracted.
    #[must_use]
    pub const fn has_structured_fields(&self) -> bool {
        self.street.is_some() || self.house_number.is_some() || self.zip.is_some()
    }

    /// Composes `"<street> <houseNumber>, <zip> <city>"` from the
    /// structured fields and normalizes it.
    ///
    /// Returns `None` when every field is empty.
    #[must_use]
    pub fn compose_structured(&self) -> Option<String> {
        let field = |f: &Option<String>| f.as_deref().unwrap_or_default().to_string();
        normalize_address_text(&format!(
            "{} {}, {} {}",
            field(&self.street),
            field(&self.house_number),
            field(&self.zip),
            field(&self.city),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composes_full_structured_address() {
        let address = Address {
            street: Some("Alexanderplatz".to_string()),
            house_number: Some("1".to_string()),
            zip: Some("10178".to_string()),
            city: Some("Berlin".to_string()),
            raw_text: String::new(),
            is_complete: true,
        };
        assert_eq!(
            address.compose_structured().as_deref(),
            Some("Alexanderplatz 1, 10178 Berlin")
        );
    }

    #[test]
    fn composes_partial_structured_address() {
        let address = Address {
            zip: Some("10178".to_string()),
            city: Some("Berlin".to_string()),
            ..Address::default()
        };
        assert_eq!(address.compose_structured().as_deref(), Some("10178 Berlin"));
    }

    #[test]
    fn empty_structured_address_composes_to_none() {
        assert_eq!(Address::default().compose_structured(), None);
    }

    #[test]
    fn city_alone_is_not_structured() {
        let address = Address {
            city: Some("Berlin".to_string()),
            ..Address::from_text("Torstraße 5")
        };
        assert!(!address.has_structured_fields());
    }
}
