//! Network seam for noise acquisition.
//!
//! [`NoiseBackend`] is what the aggregator talks to. [`HttpNoiseBackend`]
//! implements it against the real municipal services; tests substitute
//! in-memory backends.

use async_trait::async_trait;
use immo_noise_geocoder::geosearch;
use immo_noise_geocoder_models::{Coordinate, ReferenceSystem};
use immo_noise_noise_models::NoiseCategory;

use crate::registry::MunicipalityConfig;
use crate::{NoiseError, aggregated, layer};

/// Remote operations needed for one noise lookup.
#[async_trait]
pub trait NoiseBackend: Send + Sync {
    /// Fetches the raw aggregated-endpoint body for `address`.
    ///
    /// # Errors
    ///
    /// Returns [`NoiseError`] on network failure or a non-success status.
    async fn fetch_aggregated(&self, address: &str) -> Result<serde_json::Value, NoiseError>;

    /// Fetches the translated descriptor of one category for `address`.
    ///
    /// # Errors
    ///
    /// Returns [`NoiseError::NoGeosearchResult`] when the address does not
    /// resolve, or another [`NoiseError`] on network/shape failure.
    async fn fetch_layer(
        &self,
        address: &str,
        category: NoiseCategory,
    ) -> Result<String, NoiseError>;

    /// Resolves a WGS84 point for centering the map. Never fails; any
    /// problem yields `None`.
    async fn resolve_display_center(&self, address: &str) -> Option<Coordinate>;
}

/// [`NoiseBackend`] over HTTP, configured for one municipality.
#[derive(Debug, Clone)]
pub struct HttpNoiseBackend {
    client: reqwest::Client,
    config: MunicipalityConfig,
}

impl HttpNoiseBackend {
    /// Creates a backend whose client enforces the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`NoiseError::Http`] if the HTTP client cannot be built.
    pub fn new(config: MunicipalityConfig) -> Result<Self, NoiseError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self { client, config })
    }

    /// Returns the municipality configuration.
    #[must_use]
    pub const fn config(&self) -> &MunicipalityConfig {
        &self.config
    }

    /// Returns the shared HTTP client.
    #[must_use]
    pub const fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

#[async_trait]
impl NoiseBackend for HttpNoiseBackend {
    async fn fetch_aggregated(&self, address: &str) -> Result<serde_json::Value, NoiseError> {
        aggregated::fetch(&self.client, &self.config.aggregated, address).await
    }

    async fn fetch_layer(
        &self,
        address: &str,
        category: NoiseCategory,
    ) -> Result<String, NoiseError> {
        layer::fetch_layer_descriptor(&self.client, &self.config, address, category).await
    }

    async fn resolve_display_center(&self, address: &str) -> Option<Coordinate> {
        geosearch::resolve(
            &self.client,
            &self.config.geosearch,
            address,
            ReferenceSystem::Wgs84,
        )
        .await
    }
}
