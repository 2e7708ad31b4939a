//! Synthetic 3×3 noise grid around a resolved address.
//!
//! Used when the aggregated source is unavailable. Only one reading per
//! category exists in that case, so every cell carries the same values and
//! the grid renders as a uniform patch around the address.

use immo_noise_geocoder_models::Coordinate;
use immo_noise_noise_models::{CategoryTriple, GridCell, GridOffset, NoiseGrid};

/// Meters per degree of latitude.
pub const METERS_PER_DEGREE_LAT: f64 = 111_132.0;

/// Distance between neighboring cell centers.
pub const CELL_SPACING_M: f64 = 10.1;

/// Builds a 3×3 grid centered on `center` carrying `readings` in every
/// cell. Returns `None` without a center.
#[must_use]
pub fn synthesize_grid(
    center: Option<Coordinate>,
    readings: &CategoryTriple<Option<String>>,
) -> Option<NoiseGrid> {
    let center = center?;

    let lat_delta = CELL_SPACING_M / METERS_PER_DEGREE_LAT;
    let lon_delta = CELL_SPACING_M / (METERS_PER_DEGREE_LAT * center.latitude.to_radians().cos());

    let cells = GridOffset::all()
        .into_iter()
        .map(|offset| GridCell {
            offset,
            center: Coordinate::wgs84(
                f64::from(offset.dy).mul_add(lat_delta, center.latitude),
                f64::from(offset.dx).mul_add(lon_delta, center.longitude),
            ),
            readings: readings.clone(),
        })
        .collect();

    Some(NoiseGrid { center, cells })
}
