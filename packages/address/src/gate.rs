//! Decides whether an extracted address may be looked up, and which
//! string to look up.

use thiserror::Error;

use crate::{Address, ensure_city_in_address, normalize_address_lines};

/// Why a lookup was not started. The `Display` text is user-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupRefusal {
    /// The page yielded no usable address text.
    #[error("No address found on this page.")]
    MissingAddress,

    /// The listing is outside the served municipality.
    #[error("We will add {city} soon.")]
    UnsupportedCity {
        /// City as detected on the page, or `"this city"`.
        city: String,
    },

    /// The listing hides its street address.
    #[error("No address available for this place.")]
    IncompleteAddress,
}

/// Builds the lookup string for `address`.
///
/// The detected city comes from the address itself, else `city_hint`.
/// Structured fields take precedence over the raw text when present, and
/// the served city is always ensured in the result.
///
/// # Errors
///
/// Returns a [`LookupRefusal`] when there is no address text, the city is
/// not `served_city`, or the listing marks its address as incomplete.
pub fn prepare_lookup(
    address: &Address,
    city_hint: Option<&str>,
    served_city: &str,
) -> Result<String, LookupRefusal> {
    let text = normalize_address_lines(&address.raw_text).or_else(|| address.compose_structured());
    let Some(text) = text else {
        return Err(LookupRefusal::MissingAddress);
    };

    let city = address
        .city
        .as_deref()
        .or(city_hint)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or("this city");

    if city.to_lowercase() != served_city.trim().to_lowercase() {
        log::debug!("Skipping lookup for unsupported city '{city}'");
        return Err(LookupRefusal::UnsupportedCity {
            city: city.to_string(),
        });
    }

    let mut lookup = text;
    if address.has_structured_fields() {
        if !address.is_complete {
            return Err(LookupRefusal::IncompleteAddress);
        }
        if let Some(composed) = address.compose_structured() {
            lookup = composed;
        }
    }

    Ok(ensure_city_in_address(&lookup, served_city))
}
