//! Client for the aggregated noise endpoint.
//!
//! `GET {base_url}/noise/v1?address=...` answers with
//!
//! ```json
//! {
//!   "noise": { "road": "< 60 dB(A)", "rail": "< 55 dB(A)", "total": "< 62 dB(A)" },
//!   "center_wgs84": { "lat": 52.52, "lon": 13.41 },
//!   "surroundings": { "grid3x3": [ { "center_wgs84": {..}, "noise": {..} }, ... ] }
//! }
//! ```
//!
//! Some deployments name the grid array `cells` instead of `grid3x3`.
//!
//! Descriptors arrive already translated. The response is accepted only
//! if all three categories are present and usable.

use immo_noise_geocoder_models::Coordinate;
use immo_noise_noise_models::{CategoryTriple, GridCell, GridOffset, NoiseGrid};
use serde::Deserialize;

use crate::classify::has_usable_value;
use crate::registry::AggregatedConfig;
use crate::{NoiseError, NoiseReading};

/// A validated aggregated response.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedNoise {
    /// One usable reading per category.
    pub readings: CategoryTriple<NoiseReading>,
    /// Spatially resolved grid, when the endpoint sent one.
    pub grid: Option<NoiseGrid>,
}

#[derive(Debug, Deserialize)]
struct WireLatLon {
    lat: f64,
    lon: f64,
}

impl From<WireLatLon> for Coordinate {
    fn from(p: WireLatLon) -> Self {
        Self::wgs84(p.lat, p.lon)
    }
}

#[derive(Debug, Deserialize)]
struct WireCell {
    center_wgs84: WireLatLon,
    #[serde(default)]
    noise: CategoryTriple<Option<String>>,
}


/// Fetches the raw aggregated response body for `address`.
///
/// # Errors
///
/// Returns [`NoiseError`] if the request fails, the endpoint answers with
/// a non-success status, or the body is not JSON.
pub async fn fetch(
    client: &reqwest::Client,
    config: &AggregatedConfig,
    address: &str,
) -> Result<serde_json::Value, NoiseError> {
    let url = format!("{}/noise/v1", config.base_url.trim_end_matches('/'));

    let resp = client.get(&url).query(&[("address", address)]).send().await?;

    if !resp.status().is_success() {
        return Err(NoiseError::Status {
            status: resp.status().as_u16(),
        });
    }

    Ok(resp.json().await?)
}

/// Validates an aggregated response body.
///
/// # Errors
///
/// Returns [`NoiseError::Parse`] when `noise` or one of its categories is
/// missing, and [`NoiseError::Unusable`] when a category has no digit.
/// Either invalidates the whole response.
pub fn parse_response(body: &serde_json::Value) -> Result<AggregatedNoise, NoiseError> {
    let noise = body
        .get("noise")
        .and_then(serde_json::Value::as_object)
        .ok_or_else(|| NoiseError::Parse {
            message: "Aggregated response missing 'noise' object".to_string(),
        })?;

    let descriptors = CategoryTriple::from_fn(|category| -> Result<String, NoiseError> {
        let value = noise
            .get(category.as_ref())
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| NoiseError::Parse {
                message: format!("Aggregated response missing '{category}' value"),
            })?;
        if has_usable_value(value) {
            Ok(value.to_string())
        } else {
            Err(NoiseError::Unusable { category })
        }
    });

    let readings = CategoryTriple {
        road: descriptors.road?,
        rail: descriptors.rail?,
        total: descriptors.total?,
    }
    .map(|category, descriptor| NoiseReading::new(category, descriptor));

    Ok(AggregatedNoise {
        readings,
        grid: parse_grid(body),
    })
}

/// Parses the optional 3×3 grid.
///
/// The cell array must have nine entries; offsets follow array order.
/// Entries without a usable `center_wgs84` are skipped individually, and
/// the grid is dropped only when none remain.
fn parse_grid(body: &serde_json::Value) -> Option<NoiseGrid> {
    let center: WireLatLon = serde_json::from_value(body.get("center_wgs84")?.clone())
        .map_err(|e| log::debug!("Ignoring malformed aggregated grid center: {e}"))
        .ok()?;
    let surroundings = body.get("surroundings")?;
    let entries = surroundings
        .get("grid3x3")
        .or_else(|| surroundings.get("cells"))
        .and_then(serde_json::Value::as_array)?;

    if entries.len() != 9 {
        log::debug!("Ignoring aggregated grid with {} cells", entries.len());
        return None;
    }

    let cells: Vec<GridCell> = GridOffset::all()
        .into_iter()
        .zip(entries)
        .filter_map(|(offset, entry)| {
            let cell: WireCell = serde_json::from_value(entry.clone())
                .map_err(|e| {
                    log::debug!(
                        "Skipping aggregated grid cell ({}, {}): {e}",
                        offset.dx,
                        offset.dy
                    );
                })
                .ok()?;
            Some(GridCell {
                offset,
                center: cell.center_wgs84.into(),
                readings: cell.noise,
            })
        })
        .collect();

    if cells.is_empty() {
        log::debug!("Ignoring aggregated grid without any valid cell");
        return None;
    }

    Some(NoiseGrid {
        center: center.into(),
        cells,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use immo_noise_noise_models::{NoiseCategory, Tier};

    fn grid_cells(n: usize) -> Vec<serde_json::Value> {
        (0..n)
            .map(|i| {
                serde_json::json!({
                    "center_wgs84": { "lat": 52.52 + i as f64 * 1e-4, "lon": 13.41 },
                    "noise": { "road": "< 60 dB(A)", "rail": null, "total": "< 62 dB(A)" }
                })
            })
            .collect()
    }

    #[test]
    fn accepts_three_usable_categories() {
        let body = serde_json::json!({
            "noise": { "road": "< 60 dB(A)", "rail": "< 55 dB(A)", "total": "< 62 dB(A)" }
        });
        let noise = parse_response(&body).unwrap();
        assert_eq!(noise.readings.road.descriptor, "< 60 dB(A)");
        assert_eq!(
            noise.readings.rail.classification.map(|c| c.tier),
            Some(Tier::None)
        );
        assert!(noise.grid.is_none());
    }

    #[test]
    fn one_unusable_category_rejects_everything() {
        let body = serde_json::json!({
            "noise": { "road": "< 60 dB(A)", "rail": "", "total": "< 62 dB(A)" }
        });
        assert!(matches!(
            parse_response(&body),
            Err(NoiseError::Unusable {
                category: NoiseCategory::Rail
            })
        ));
    }

    #[test]
    fn missing_category_rejects_everything() {
        let body = serde_json::json!({
            "noise": { "road": "< 60 dB(A)", "total": "< 62 dB(A)" }
        });
        assert!(matches!(
            parse_response(&body),
            Err(NoiseError::Parse { .. })
        ));
    }

    #[test]
    fn non_string_category_rejects_everything() {
        let body = serde_json::json!({
            "noise": { "road": 60, "rail": "< 55 dB(A)", "total": "< 62 dB(A)" }
        });
        assert!(parse_response(&body).is_err());
    }

    #[test]
    fn missing_noise_object_is_parse_error() {
        assert!(matches!(
            parse_response(&serde_json::json!({ "status": "ok" })),
            Err(NoiseError::Parse { .. })
        ));
    }

    #[test]
    fn parses_nine_cell_grid() {
        let body = serde_json::json!({
            "noise": { "road": "< 60 dB(A)", "rail": "< 55 dB(A)", "total": "< 62 dB(A)" },
            "center_wgs84": { "lat": 52.5219, "lon": 13.4132 },
            "surroundings": { "grid3x3": grid_cells(9) }
        });
        let grid = parse_response(&body).unwrap().grid.unwrap();
        assert_eq!(grid.cells.len(), 9);
        assert!((grid.center.latitude - 52.5219).abs() < 1e-9);
        let center_cell = grid.center_cell().unwrap();
        assert!((center_cell.center.latitude - 52.5204).abs() < 1e-9);
        assert_eq!(center_cell.readings.rail, None);
    }

    #[test]
    fn accepts_cells_as_grid_array_name() {
        let body = serde_json::json!({
            "noise": { "road": "< 60 dB(A)", "rail": "< 55 dB(A)", "total": "< 62 dB(A)" },
            "center_wgs84": { "lat": 52.5219, "lon": 13.4132 },
            "surroundings": { "cells": grid_cells(9) }
        });
        let grid = parse_response(&body).unwrap().grid.unwrap();
        assert_eq!(grid.cells.len(), 9);
        assert_eq!(grid.cells[0].offset, GridOffset { dx: -1, dy: -1 });
    }

    #[test]
    fn malformed_cell_is_skipped_not_the_whole_grid() {
        let mut cells = grid_cells(9);
        cells[2] = serde_json::json!({ "noise": { "road": "< 60 dB(A)" } });
        cells[7] = serde_json::json!({ "center_wgs84": "somewhere" });
        let body = serde_json::json!({
            "noise": { "road": "< 60 dB(A)", "rail": "< 55 dB(A)", "total": "< 62 dB(A)" },
            "center_wgs84": { "lat": 52.5219, "lon": 13.4132 },
            "surroundings": { "grid3x3": cells }
        });

        let grid = parse_response(&body).unwrap().grid.unwrap();
        assert_eq!(grid.cells.len(), 7);
        assert!(!grid.cells.iter().any(|c| c.offset == GridOffset { dx: 1, dy: -1 }));
        assert!(!grid.cells.iter().any(|c| c.offset == GridOffset { dx: 0, dy: 1 }));
        let center_cell = grid.center_cell().unwrap();
        assert!((center_cell.center.latitude - 52.5204).abs() < 1e-9);
    }

    #[test]
    fn grid_without_any_valid_cell_is_dropped() {
        let cells: Vec<_> = (0..9).map(|_| serde_json::json!({})).collect();
        let body = serde_json::json!({
            "noise": { "road": "< 60 dB(A)", "rail": "< 55 dB(A)", "total": "< 62 dB(A)" },
            "center_wgs84": { "lat": 52.5219, "lon": 13.4132 },
            "surroundings": { "grid3x3": cells }
        });
        assert!(parse_response(&body).unwrap().grid.is_none());
    }

    #[test]
    fn wrong_sized_grid_is_dropped_but_readings_kept() {
        let body = serde_json::json!({
            "noise": { "road": "< 60 dB(A)", "rail": "< 55 dB(A)", "total": "< 62 dB(A)" },
            "center_wgs84": { "lat": 52.5219, "lon": 13.4132 },
            "surroundings": { "grid3x3": grid_cells(4) }
        });
        let noise = parse_response(&body).unwrap();
        assert!(noise.grid.is_none());
        assert!(noise.readings.total.is_usable());
    }
}
