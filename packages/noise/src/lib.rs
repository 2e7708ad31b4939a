#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Ambient-noise lookup for listing addresses.
//!
//! Acquires road, rail, and total noise descriptors for a normalized
//! address from the municipal noise map using a two-tier strategy:
//!
//! 1. **Aggregated source**: one request returning all three categories.
//!    All-or-nothing: any missing or unusable category discards the whole
//!    response.
//! 2. **Per-layer fallback**: three independent geosearch + WMS
//!    `GetFeatureInfo` lookups issued concurrently. Partial failure is
//!    tolerated and reported per category.
//!
//! Endpoints come from the embedded municipality [`registry`]. Readings
//! are classified into severity [`Tier`](immo_noise_noise_models::Tier)s
//! by [`classify`], and a 3×3 visualization grid is synthesized by
//! [`grid`] when the aggregated source does not supply one.

pub mod aggregated;
pub mod aggregator;
pub mod backend;
pub mod classify;
pub mod grid;
pub mod layer;
pub mod registry;
pub mod report;
pub mod session;

use immo_noise_geocoder::GeocodeError;
use immo_noise_noise_models::NoiseCategory;
use serde::Serialize;
use thiserror::Error;

pub use aggregator::{AggregatedNoise, FallbackNoise, NoiseLookup, lookup_noise};
pub use backend::{HttpNoiseBackend, NoiseBackend};
pub use classify::Classification;
pub use registry::MunicipalityConfig;
pub use report::NoiseReport;
pub use session::{LookupCoordinator, LookupTicket};

/// A noise descriptor for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoiseReading {
    /// Which category this reading belongs to.
    pub category: NoiseCategory,
    /// Descriptor text as returned (or translated), e.g. `"< 60 dB(A)"`.
    pub descriptor: String,
    /// Classification, or `None` when the descriptor is unusable.
    pub classification: Option<Classification>,
}

impl NoiseReading {
    /// Creates a reading and classifies its descriptor.
    #[must_use]
    pub fn new(category: NoiseCategory, descriptor: impl Into<String>) -> Self {
        let descriptor = descriptor.into();
        let classification = classify::classify(&descriptor);
        Self {
            category,
            descriptor,
            classification,
        }
    }

    /// Whether the descriptor yielded a classification.
    #[must_use]
    pub const fn is_usable(&self) -> bool {
        self.classification.is_some()
    }
}

/// Errors from noise acquisition.
#[derive(Debug, Error)]
pub enum NoiseError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A noise endpoint answered with a non-success status.
    #[error("Noise service returned status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The geosearch step found no feature for the address.
    #[error("No geosearch result.")]
    NoGeosearchResult,

    /// The geosearch step itself failed.
    #[error("Geosearch failed: {0}")]
    Geocode(#[from] GeocodeError),

    /// An expected field was absent or malformed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// A value was present but contains no decibel figure.
    #[error("Unusable {category} noise value")]
    Unusable {
        /// Category whose value failed the check.
        category: NoiseCategory,
    },
}
