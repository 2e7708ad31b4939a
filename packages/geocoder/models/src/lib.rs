#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Coordinate types for the immo-noise geocoding pipeline.
//!
//! Two reference systems are in play: geographic WGS84 for map display,
//! and the projected ETRS89 / UTM zone 33N system that the municipal
//! noise-map service indexes its layers in.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A coordinate reference system understood by the geosearch service.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReferenceSystem {
    /// Geographic WGS84 (`EPSG:4326`), degrees.
    Wgs84,
    /// Projected ETRS89 / UTM zone 33N (`EPSG:25833`), meters.
    Utm33,
}

impl ReferenceSystem {
    /// Returns the `EPSG:` identifier sent as `srsName` / `CRS`.
    #[must_use]
    pub const fn epsg(self) -> &'static str {
        match self {
            Self::Wgs84 => "EPSG:4326",
            Self::Utm33 => "EPSG:25833",
        }
    }
}

/// A point in a specific reference system.
///
/// In [`ReferenceSystem::Utm33`] the `latitude` field holds the northing
/// and `longitude` holds the easting, both in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude (or northing).
    pub latitude: f64,
    /// Longitude (or easting).
    pub longitude: f64,
    /// Reference system the values are expressed in.
    pub system: ReferenceSystem,
}

impl Coordinate {
    /// Creates a WGS84 coordinate.
    #[must_use]
    pub const fn wgs84(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            system: ReferenceSystem::Wgs84,
        }
    }
}

/// An axis-aligned box, serialized as `[min_x, min_y, max_x, max_y]`.
///
/// For WGS84 the x axis is longitude; for UTM33 it is easting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    /// Western edge.
    pub min_x: f64,
    /// Southern edge.
    pub min_y: f64,
    /// Eastern edge.
    pub max_x: f64,
    /// Northern edge.
    pub max_y: f64,
}

impl BoundingBox {
    /// Builds a box from the first four numbers of a `GeoJSON` `bbox`
    /// member. Returns `None` when fewer than four values are given.
    #[must_use]
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        match values {
            [min_x, min_y, max_x, max_y, ..] => Some(Self {
                min_x: *min_x,
                min_y: *min_y,
                max_x: *max_x,
                max_y: *max_y,
            }),
            _ => None,
        }
    }

    /// Formats the box as the comma-joined `minx,miny,maxx,maxy` query
    /// parameter used by both the geosearch and WMS endpoints.
    #[must_use]
    pub fn to_query_param(&self) -> String {
        format!("{},{},{},{}", self.min_x, self.min_y, self.max_x, self.max_y)
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from([min_x, min_y, max_x, max_y]: [f64; 4]) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.min_x, b.min_y, b.max_x, b.max_y]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_reference_system_names() {
        assert_eq!(
            ReferenceSystem::from_str("wgs84").unwrap(),
            ReferenceSystem::Wgs84
        );
        assert_eq!(
            ReferenceSystem::from_str("utm33").unwrap(),
            ReferenceSystem::Utm33
        );
        assert!(ReferenceSystem::from_str("mercator").is_err());
    }

    #[test]
    fn epsg_codes() {
        assert_eq!(ReferenceSystem::Wgs84.epsg(), "EPSG:4326");
        assert_eq!(ReferenceSystem::Utm33.epsg(), "EPSG:25833");
    }

    #[test]
    fn bbox_query_param_keeps_integers_compact() {
        let bbox = BoundingBox::from([369_097.0, 5_799_298.0, 416_865.0, 5_838_236.0]);
        assert_eq!(bbox.to_query_param(), "369097,5799298,416865,5838236");
    }

    #[test]
    fn bbox_from_short_slice_is_none() {
        assert!(BoundingBox::from_slice(&[1.0, 2.0, 3.0]).is_none());
        assert!(BoundingBox::from_slice(&[1.0, 2.0, 3.0, 4.0]).is_some());
    }

    #[test]
    fn bbox_deserializes_from_array() {
        let bbox: BoundingBox = serde_json::from_str("[13.0, 52.3, 13.9, 52.7]").unwrap();
        assert!((bbox.max_y - 52.7).abs() < f64::EPSILON);
        assert_eq!(bbox.to_query_param(), "13,52.3,13.9,52.7");
    }
}
