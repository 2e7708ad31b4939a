//! Presentation values for a finished lookup.
//!
//! Turns a [`NoiseLookup`] into one uniform shape regardless of which path
//! produced it: a labelled entry per category, or a single blocking
//! message when nothing could be fetched. That message is configured
//! per municipality in [`crate::MunicipalityConfig`].

use immo_noise_noise_models::{NoiseCategory, NoiseGrid, Tier, UNAVAILABLE_COLOR};
use serde::Serialize;

use crate::aggregator::{CategoryOutcome, NoiseLookup};
use crate::NoiseReading;

/// Display text for a category without a usable reading.
pub const NOT_AVAILABLE: &str = "N/A";

/// Tooltip for a category whose descriptor could not be classified.
pub const UNUSABLE_TOOLTIP: &str = "Noise value unavailable";

/// Which acquisition path produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupSource {
    /// Aggregated endpoint.
    Aggregated,
    /// Per-layer fallback.
    Fallback,
}

/// Presentation values for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryReport {
    /// Category.
    pub category: NoiseCategory,
    /// Category label, e.g. `"Road Traffic"`.
    pub label: &'static str,
    /// Descriptor as received, when the query succeeded.
    pub descriptor: Option<String>,
    /// Tier, when the descriptor is classifiable.
    pub tier: Option<Tier>,
    /// Governing decibel value, when one was extracted.
    pub decibels: Option<u32>,
    /// Main display text: the tier label or `"N/A"`.
    pub display: &'static str,
    /// CSS color for the display text.
    pub color: &'static str,
    /// Tooltip: tier comparison, failure reason, or unavailability note.
    pub tooltip: String,
    /// Failure reason, when the category's query failed.
    pub error: Option<String>,
}

impl CategoryReport {
    fn from_reading(reading: &NoiseReading) -> Self {
        match reading.classification {
            Some(classification) => Self {
                category: reading.category,
                label: reading.category.label(),
                descriptor: Some(reading.descriptor.clone()),
                tier: Some(classification.tier),
                decibels: classification.decibels,
                display: classification.tier.label(),
                color: classification.tier.color(),
                tooltip: classification.tier.tooltip().to_string(),
                error: None,
            },
            None => Self {
                descriptor: Some(reading.descriptor.clone()),
                ..Self::unavailable(reading.category, UNUSABLE_TOOLTIP.to_string(), None)
            },
        }
    }

    fn from_outcome(category: NoiseCategory, outcome: &CategoryOutcome) -> Self {
        match outcome {
            Ok(reading) => Self::from_reading(reading),
            Err(error) => Self::unavailable(category, error.clone(), Some(error.clone())),
        }
    }

    fn unavailable(category: NoiseCategory, tooltip: String, error: Option<String>) -> Self {
        Self {
            category,
            label: category.label(),
            descriptor: None,
            tier: None,
            decibels: None,
            display: NOT_AVAILABLE,
            color: UNAVAILABLE_COLOR,
            tooltip,
            error,
        }
    }

    /// Whether this entry shows a classified reading.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.tier.is_some()
    }
}

/// Everything a renderer needs for one lookup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NoiseReport {
    /// Per-category entries, in display order.
    Categories {
        /// Acquisition path.
        source: LookupSource,
        /// Road, rail, total.
        entries: Vec<CategoryReport>,
        /// Grid for map rendering.
        grid: Option<NoiseGrid>,
    },
    /// Nothing could be fetched.
    Unavailable {
        /// Blocking user-facing message.
        message: String,
    },
}

impl NoiseReport {
    /// Builds the report for `lookup`. `unavailable_message` is shown when
    /// every layer failed.
    #[must_use]
    pub fn from_lookup(lookup: &NoiseLookup, unavailable_message: &str) -> Self {
        match lookup {
            NoiseLookup::Aggregated(noise) => Self::Categories {
                source: LookupSource::Aggregated,
                entries: noise
                    .readings
                    .iter()
                    .map(|(_, reading)| CategoryReport::from_reading(reading))
                    .collect(),
                grid: noise.grid.clone(),
            },
            NoiseLookup::Fallback(noise) => Self::Categories {
                source: LookupSource::Fallback,
                entries: noise
                    .outcomes
                    .iter()
                    .map(|(category, outcome)| CategoryReport::from_outcome(category, outcome))
                    .collect(),
                grid: noise.grid.clone(),
            },
            NoiseLookup::Unavailable => Self::Unavailable {
                message: unavailable_message.to_string(),
            },
        }
    }
}
