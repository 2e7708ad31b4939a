//! Compile-time registry of municipality noise-service configurations.
//!
//! Each served municipality is defined in a TOML file under `services/`.
//! The registry embeds these at compile time and exposes them via
//! [`all_municipalities`] and [`municipality_for_city`]. A configuration
//! can also be loaded from disk with [`MunicipalityConfig::from_path`].

use std::path::Path;
use std::time::Duration;

use immo_noise_geocoder::GeosearchConfig;
use immo_noise_noise_models::{CategoryTriple, NoiseCategory};
use serde::Deserialize;
use thiserror::Error;

/// Environment variable overriding the aggregated endpoint base URL.
pub const AGGREGATED_URL_ENV: &str = "IMMO_NOISE_AGGREGATED_URL";

/// Unavailability message for municipalities that do not configure one.
pub const DEFAULT_UNAVAILABLE_MESSAGE: &str =
    "Noise services are temporarily unavailable. Please try again later.";

/// Errors from loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a valid municipality definition.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Noise-service endpoints for one municipality.
#[derive(Debug, Clone, Deserialize)]
pub struct MunicipalityConfig {
    /// Unique identifier (e.g., `"berlin"`).
    pub id: String,
    /// Human-readable name of the noise-map source.
    pub name: String,
    /// The city this configuration serves.
    pub city: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Aggregated endpoint settings.
    pub aggregated: AggregatedConfig,
    /// Geosearch endpoint settings.
    pub geosearch: GeosearchConfig,
    /// WMS `GetFeatureInfo` settings.
    pub feature_info: FeatureInfoConfig,
    /// WMS layer identifier per category.
    pub layers: CategoryTriple<String>,
    /// Shown when every layer query failed.
    #[serde(default = "default_unavailable_message")]
    pub unavailable_message: String,
}

/// The single endpoint returning all three categories.
#[derive(Debug, Clone, Deserialize)]
pub struct AggregatedConfig {
    /// Base URL; requests go to `{base_url}/noise/v1`.
    pub base_url: String,
}

/// WMS `GetFeatureInfo` query settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureInfoConfig {
    /// WMS endpoint URL.
    pub base_url: String,
    /// Feature property holding the descriptor.
    pub descriptor_property: String,
    /// Descriptor assumed when the layer has no feature at the point.
    pub quiet_descriptor: String,
    /// Width and height of the virtual map window in pixels.
    #[serde(default = "default_window_px")]
    pub window_px: u32,
    /// Pixel (both `I` and `J`) sampled inside the window.
    #[serde(default = "default_sample_px")]
    pub sample_px: u32,
    /// `FEATURE_COUNT` sent with each query.
    #[serde(default = "default_feature_count")]
    pub feature_count: u32,
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_unavailable_message() -> String {
    DEFAULT_UNAVAILABLE_MESSAGE.to_string()
}

const fn default_window_px() -> u32 {
    101
}

const fn default_sample_px() -> u32 {
    50
}

const fn default_feature_count() -> u32 {
    10
}

impl MunicipalityConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the text is not a valid definition.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(text)?)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Applies [`AGGREGATED_URL_ENV`] when set and non-empty.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        match std::env::var(AGGREGATED_URL_ENV) {
            Ok(url) if !url.is_empty() => {
                log::debug!("Using aggregated endpoint from {AGGREGATED_URL_ENV}: {url}");
                self.aggregated.base_url = url;
            }
            _ => {}
        }
        self
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the WMS layer identifier for `category`.
    #[must_use]
    pub fn layer(&self, category: NoiseCategory) -> &str {
        self.layers.get(category)
    }
}

// ── Compile-time embedded TOML files ────────────────────────────────

const MUNICIPALITY_TOMLS: &[(&str, &str)] =
    &[("berlin", include_str!("../services/berlin.toml"))];

#[cfg(test)]
const EXPECTED_MUNICIPALITY_COUNT: usize = 1;

/// Returns all municipality configurations.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_municipalities() -> Vec<MunicipalityConfig> {
    MUNICIPALITY_TOMLS
        .iter()
        .map(|(name, toml_str)| {
            MunicipalityConfig::from_toml_str(toml_str)
                .unwrap_or_else(|e| panic!("Failed to parse municipality '{name}': {e}"))
        })
        .collect()
}

/// Returns the configuration serving `city` (case-insensitive).
#[must_use]
pub fn municipality_for_city(city: &str) -> Option<MunicipalityConfig> {
    let city = city.trim().to_lowercase();
    all_municipalities()
        .into_iter()
        .find(|m| m.city.to_lowercase() == city)
}
