#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Address resolution for the immo-noise pipeline.
//!
//! Resolves a normalized street address to a single best-match coordinate
//! using the municipal geosearch service. The same service is queried in
//! two reference systems:
//!
//! 1. **WGS84** for centering the map / synthetic grid.
//! 2. **UTM33** for the noise-layer feature-info service, which needs the
//!    feature's bounding box in its own projected system.
//!
//! The first feature returned is always taken. Ambiguous street names
//! resolve to whatever the provider ranks highest.

pub mod geosearch;

use immo_noise_geocoder_models::{BoundingBox, Coordinate, ReferenceSystem};
use serde::Deserialize;
use thiserror::Error;

/// Connection settings for the geosearch endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct GeosearchConfig {
    /// Search endpoint URL (e.g., `"https://gdi.berlin.de/searches/bkg/geosearch"`).
    pub base_url: String,
    /// Search window in WGS84 degrees.
    pub display_bbox: BoundingBox,
    /// Search window in UTM33 meters.
    pub projected_bbox: BoundingBox,
}

impl GeosearchConfig {
    /// Returns the search window for the given reference system.
    #[must_use]
    pub const fn bbox_for(&self, system: ReferenceSystem) -> BoundingBox {
        match system {
            ReferenceSystem::Wgs84 => self.display_bbox,
            ReferenceSystem::Utm33 => self.projected_bbox,
        }
    }
}

/// The top-ranked feature of a geosearch response.
#[derive(Debug, Clone, PartialEq)]
pub struct GeosearchHit {
    /// Feature point geometry.
    pub coordinate: Coordinate,
    /// Feature `bbox` member, when the provider sent one.
    pub bbox: Option<BoundingBox>,
    /// Provider's display text for the match.
    pub matched_address: Option<String>,
}

/// Errors from geocoding operations.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Geosearch answered with a non-success status.
    #[error("Geosearch returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },
}
