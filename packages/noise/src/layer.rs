//! Per-layer noise lookup against the municipal WMS.
//!
//! Two steps per category:
//!
//! 1. Geosearch the address in UTM33 to get the feature's bounding box.
//! 2. Ask the category's WMS layer for the feature under the center
//!    pixel of that box (`GetFeatureInfo`).
//!
//! A missing geosearch feature fails the lookup. A missing WMS feature
//! does not: the point lies outside every mapped noise zone and gets the
//! configured quiet descriptor.

use immo_noise_geocoder::geosearch;
use immo_noise_geocoder_models::ReferenceSystem;
use immo_noise_noise_models::NoiseCategory;
use regex::Regex;
use std::sync::LazyLock;

use crate::NoiseError;
use crate::classify::translate_threshold_words;
use crate::registry::{FeatureInfoConfig, MunicipalityConfig};

/// A-weighted decibel unit inside a property value.
static DB_UNIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)db\s*\(a\)").expect("valid regex"));

/// Fetches the translated descriptor for one category at `address`.
///
/// # Errors
///
/// Returns [`NoiseError::NoGeosearchResult`] when the address does not
/// resolve, and other [`NoiseError`] variants for network or response
/// shape failures.
pub async fn fetch_layer_descriptor(
    client: &reqwest::Client,
    config: &MunicipalityConfig,
    address: &str,
    category: NoiseCategory,
) -> Result<String, NoiseError> {
    let hit = geosearch::search(client, &config.geosearch, address, ReferenceSystem::Utm33)
        .await?
        .ok_or(NoiseError::NoGeosearchResult)?;

    let bbox = hit.bbox.ok_or_else(|| NoiseError::Parse {
        message: "Geosearch feature missing bbox".to_string(),
    })?;

    let layer = config.layer(category);
    let info = &config.feature_info;
    let window = info.window_px.to_string();
    let sample = info.sample_px.to_string();
    let feature_count = info.feature_count.to_string();
    let bbox = bbox.to_query_param();

    log::debug!("Querying {category} layer {layer} for '{address}'");

    let resp = client
        .get(&info.base_url)
        .query(&[
            ("SERVICE", "WMS"),
            ("VERSION", "1.3.0"),
            ("REQUEST", "GetFeatureInfo"),
            ("FORMAT", "image/png"),
            ("TRANSPARENT", "true"),
            ("QUERY_LAYERS", layer),
            ("LAYERS", layer),
            ("SINGLETILE", "true"),
            ("INFO_FORMAT", "application/json"),
            ("FEATURE_COUNT", feature_count.as_str()),
            ("I", sample.as_str()),
            ("J", sample.as_str()),
            ("CRS", ReferenceSystem::Utm33.epsg()),
            ("STYLES", ""),
            ("WIDTH", window.as_str()),
            ("HEIGHT", window.as_str()),
            ("BBOX", bbox.as_str()),
        ])
        .header("Accept", "application/json")
        .header("X-Requested-With", "XMLHttpRequest")
        .send()
        .await?;

    if !resp.status().is_success() {
        return Err(NoiseError::Status {
            status: resp.status().as_u16(),
        });
    }

    let body: serde_json::Value = resp.json().await?;
    Ok(extract_descriptor(&body, info))
}

/// Picks the descriptor out of a `GetFeatureInfo` response and translates
/// its threshold words.
///
/// Prefers the configured property, then any string property carrying a
/// `dB(A)` unit. Falls back to the quiet descriptor when there is no
/// feature or no such property.
#[must_use]
pub fn extract_descriptor(body: &serde_json::Value, info: &FeatureInfoConfig) -> String {
    let properties = body
        .pointer("/features/0/properties")
        .and_then(serde_json::Value::as_object);

    let raw = properties.and_then(|props| {
        props
            .get(&info.descriptor_property)
            .and_then(serde_json::Value::as_str)
            .or_else(|| {
                props
                    .values()
                    .filter_map(serde_json::Value::as_str)
                    .find(|v| DB_UNIT_RE.is_match(v))
            })
    });

    if properties.is_none() {
        log::debug!("No noise feature at point; assuming quiet");
    }

    translate_threshold_words(raw.unwrap_or(info.quiet_descriptor.as_str()))
}
