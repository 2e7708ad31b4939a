//! Two-tier noise acquisition.
//!
//! ```text
//! Init ─▶ aggregated source ─┬─ valid ──────────────▶ Aggregated
//!                            └─ error / invalid ─▶ per-layer fan-out
//!                                                   ├─ all failed ─▶ Unavailable
//!                                                   └─ otherwise ──▶ Fallback
//! ```
//!
//! The fan-out awaits all three layer queries regardless of individual
//! outcomes. On the fallback path a display center is also resolved so a
//! synthetic grid can be drawn; failing that only drops the grid.

use immo_noise_noise_models::{CategoryTriple, NoiseCategory, NoiseGrid};

use crate::backend::NoiseBackend;
use crate::grid::synthesize_grid;
use crate::{NoiseReading, aggregated};

pub use crate::aggregated::AggregatedNoise;

/// Per-category outcome on the fallback path: a reading or the failure
/// text to display.
pub type CategoryOutcome = Result<NoiseReading, String>;

/// Fallback-path result with at least one successful category.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackNoise {
    /// Outcome per category.
    pub outcomes: CategoryTriple<CategoryOutcome>,
    /// Synthetic grid, when a display center could be resolved.
    pub grid: Option<NoiseGrid>,
}

impl FallbackNoise {
    /// Categories that failed, with their error text.
    pub fn errors(&self) -> impl Iterator<Item = (NoiseCategory, &str)> {
        self.outcomes.iter().filter_map(|(category, outcome)| {
            outcome.as_ref().err().map(|e| (category, e.as_str()))
        })
    }
}

/// Result of one noise lookup, whichever path produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum NoiseLookup {
    /// The aggregated source answered with three usable categories.
    Aggregated(AggregatedNoise),
    /// The per-layer fallback produced at least one category.
    Fallback(FallbackNoise),
    /// Every per-layer query failed.
    Unavailable,
}

impl NoiseLookup {
    /// The grid to visualize, if any.
    #[must_use]
    pub const fn grid(&self) -> Option<&NoiseGrid> {
        match self {
            Self::Aggregated(a) => a.grid.as_ref(),
            Self::Fallback(f) => f.grid.as_ref(),
            Self::Unavailable => None,
        }
    }
}

/// Looks up noise for a normalized `address`.
pub async fn lookup_noise(backend: &dyn NoiseBackend, address: &str) -> NoiseLookup {
    match try_aggregated(backend, address).await {
        Some(noise) => {
            log::info!("Noise for '{address}' served by aggregated source");
            NoiseLookup::Aggregated(noise)
        }
        None => fallback(backend, address).await,
    }
}

/// Aggregated source attempt. Every failure is swallowed into `None`.
async fn try_aggregated(backend: &dyn NoiseBackend, address: &str) -> Option<AggregatedNoise> {
    let body = backend
        .fetch_aggregated(address)
        .await
        .map_err(|e| log::debug!("Aggregated source failed for '{address}', falling back: {e}"))
        .ok()?;

    aggregated::parse_response(&body)
        .map_err(|e| log::debug!("Aggregated source invalid for '{address}', falling back: {e}"))
        .ok()
}

async fn fallback(backend: &dyn NoiseBackend, address: &str) -> NoiseLookup {
    let (road, rail, total) = futures::join!(
        layer_outcome(backend, address, NoiseCategory::Road),
        layer_outcome(backend, address, NoiseCategory::Rail),
        layer_outcome(backend, address, NoiseCategory::Total),
    );
    let outcomes = CategoryTriple { road, rail, total };

    if outcomes.iter().all(|(_, outcome)| outcome.is_err()) {
        log::warn!("All noise layers failed for '{address}'");
        return NoiseLookup::Unavailable;
    }

    let descriptors = CategoryTriple::from_fn(|category| {
        outcomes
            .get(category)
            .as_ref()
            .ok()
            .map(|reading| reading.descriptor.clone())
    });
    let center = backend.resolve_display_center(address).await;
    if center.is_none() {
        log::debug!("No display center for '{address}'; returning readings without grid");
    }

    NoiseLookup::Fallback(FallbackNoise {
        grid: synthesize_grid(center, &descriptors),
        outcomes,
    })
}

async fn layer_outcome(
    backend: &dyn NoiseBackend,
    address: &str,
    category: NoiseCategory,
) -> CategoryOutcome {
    backend
        .fetch_layer(address, category)
        .await
        .map(|descriptor| NoiseReading::new(category, descriptor))
        .map_err(|e| {
            log::debug!("{category} layer failed for '{address}': {e}");
            e.to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoiseError;
    use async_trait::async_trait;
    use immo_noise_geocoder_models::Coordinate;
    use immo_noise_noise_models::Tier;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Scripted backend. `layers` holds the per-category result; `None`
    /// means the layer query is rejected with "No geosearch result.".
    struct FakeBackend {
        aggregated: Option<serde_json::Value>,
        layers: CategoryTriple<Option<&'static str>>,
        center: Option<Coordinate>,
        layer_calls: AtomicUsize,
    }

    impl FakeBackend {
        fn new(
            aggregated: Option<serde_json::Value>,
            layers: CategoryTriple<Option<&'static str>>,
        ) -> Self {
            Self {
                aggregated,
                layers,
                center: Some(Coordinate::wgs84(52.5219, 13.4132)),
                layer_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl NoiseBackend for FakeBackend {
        async fn fetch_aggregated(&self, _address: &str) -> Result<serde_json::Value, NoiseError> {
            self.aggregated
                .clone()
                .ok_or(NoiseError::Status { status: 503 })
        }

        async fn fetch_layer(
            &self,
            _address: &str,
            category: NoiseCategory,
        ) -> Result<String, NoiseError> {
            self.layer_calls.fetch_add(1, Ordering::SeqCst);
            // Complete out of order: road last.
            if category == NoiseCategory::Road {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            self.layers
                .get(category)
                .map(str::to_string)
                .ok_or(NoiseError::NoGeosearchResult)
        }

        async fn resolve_display_center(&self, _address: &str) -> Option<Coordinate> {
            self.center
        }
    }

    fn all_layers() -> CategoryTriple<Option<&'static str>> {
        CategoryTriple {
            road: Some("< 65 dB(A)"),
            rail: Some("< 55 dB(A)"),
            total: Some("< 68 dB(A)"),
        }
    }

    #[tokio::test]
    async fn aggregated_success_skips_fallback() {
        let backend = FakeBackend::new(
            Some(serde_json::json!({
                "noise": {
                    "road": "up to 60 dB(A)",
                    "rail": "up to 55 dB(A)",
                    "total": "up to 62 dB(A)"
                }
            })),
            all_layers(),
        );

        let lookup = lookup_noise(&backend, "Alexanderplatz 1, 10178 Berlin").await;

        let NoiseLookup::Aggregated(noise) = lookup else {
            panic!("expected aggregated result, got {lookup:?}");
        };
        let tier = |r: &NoiseReading| r.classification.map(|c| c.tier);
        assert_eq!(tier(&noise.readings.road), Some(Tier::Mid));
        assert_eq!(tier(&noise.readings.rail), Some(Tier::None));
        assert_eq!(tier(&noise.readings.total), Some(Tier::Mid));
        assert_eq!(backend.layer_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn two_of_three_usable_still_falls_back() {
        let backend = FakeBackend::new(
            Some(serde_json::json!({
                "noise": { "road": "< 60 dB(A)", "rail": "keine Angabe", "total": "< 62 dB(A)" }
            })),
            all_layers(),
        );

        let lookup = lookup_noise(&backend, "Alexanderplatz 1, 10178 Berlin").await;

        assert!(matches!(lookup, NoiseLookup::Fallback(_)));
        assert_eq!(backend.layer_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn partial_failure_keeps_successful_categories() {
        let backend = FakeBackend::new(
            None,
            CategoryTriple {
                road: Some("< 65 dB(A)"),
                rail: None,
                total: Some("< 68 dB(A)"),
            },
        );

        let lookup = lookup_noise(&backend, "Alexanderplatz 1, 10178 Berlin").await;

        let NoiseLookup::Fallback(noise) = lookup else {
            panic!("expected fallback result, got {lookup:?}");
        };
        assert_eq!(noise.outcomes.road.as_ref().unwrap().descriptor, "< 65 dB(A)");
        assert_eq!(noise.outcomes.total.as_ref().unwrap().descriptor, "< 68 dB(A)");
        let errors: Vec<_> = noise.errors().collect();
        assert_eq!(errors, vec![(NoiseCategory::Rail, "No geosearch result.")]);

        let grid = noise.grid.unwrap();
        assert_eq!(grid.cells.len(), 9);
        assert!(grid.cells.iter().all(|c| {
            c.readings.road.as_deref() == Some("< 65 dB(A)")
                && c.readings.rail.is_none()
                && c.readings.total.as_deref() == Some("< 68 dB(A)")
        }));
    }

    #[tokio::test]
    async fn all_layers_failing_is_unavailable() {
        let backend = FakeBackend::new(
            None,
            CategoryTriple {
                road: None,
                rail: None,
                total: None,
            },
        );

        let lookup = lookup_noise(&backend, "Nowhere 1, Berlin").await;

        assert_eq!(lookup, NoiseLookup::Unavailable);
        assert_eq!(backend.layer_calls.load(Ordering::SeqCst), 3);
        assert!(lookup.grid().is_none());
    }

    #[tokio::test]
    async fn missing_display_center_only_drops_grid() {
        let mut backend = FakeBackend::new(None, all_layers());
        backend.center = None;

        let lookup = lookup_noise(&backend, "Alexanderplatz 1, 10178 Berlin").await;

        let NoiseLookup::Fallback(noise) = lookup else {
            panic!("expected fallback result, got {lookup:?}");
        };
        assert!(noise.grid.is_none());
        assert_eq!(noise.errors().count(), 0);
    }
}
