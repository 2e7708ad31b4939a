#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Noise category taxonomy, severity tiers, and grid types.
//!
//! The municipal noise map publishes three categories per location:
//! road traffic, tram/underground rail, and the combined total. Readings
//! are textual descriptors such as `"< 60 dB(A)"`; severity tiers are
//! derived from them and never stored.

use immo_noise_geocoder_models::Coordinate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// A noise-map category.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NoiseCategory {
    /// Road traffic.
    Road,
    /// Tram and U-Bahn.
    Rail,
    /// Sum of all traffic sources.
    Total,
}

impl NoiseCategory {
    /// All categories in display order.
    pub const ALL: [Self; 3] = [Self::Road, Self::Rail, Self::Total];

    /// Human-readable label shown next to the reading.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Road => "Road Traffic",
            Self::Rail => "Tram & U-Bahn",
            Self::Total => "Sum of All Traffic",
        }
    }
}

/// Severity tier derived from a descriptor's maximum decibel value.
///
/// Ordered from quietest to loudest.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Tier {
    /// Up to 55 dB(A).
    None,
    /// 56 to 59 dB(A).
    Low,
    /// 60 to 64 dB(A).
    Mid,
    /// 65 to 69 dB(A).
    High,
    /// 70 dB(A) and above.
    Extreme,
}

impl Tier {
    /// Short label for the tier.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "Quiet",
            Self::Low => "Moderate",
            Self::Mid => "Noisy",
            Self::High => "Loud",
            Self::Extreme => "Very Loud",
        }
    }

    /// Display color as a CSS hex string.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::None => "#1b5e20",
            Self::Low => "#2ecc71",
            Self::Mid => "#f1c40f",
            Self::High => "#e74c3c",
            Self::Extreme => "#650c51",
        }
    }

    /// Everyday comparison shown as a tooltip.
    #[must_use]
    pub const fn tooltip(self) -> &'static str {
        match self {
            Self::None => "Like a library or bird calls",
            Self::Low => "Like a refrigerator or quiet conversation",
            Self::Mid => "Like a TV or open-plan office",
            Self::High => "Like city traffic or a vacuum cleaner",
            Self::Extreme => "Like a hair dryer or busy street",
        }
    }
}

/// Color used for categories without a usable reading.
pub const UNAVAILABLE_COLOR: &str = "#ccc";

/// One value per noise category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTriple<T> {
    /// Road traffic value.
    pub road: T,
    /// Tram and U-Bahn value.
    pub rail: T,
    /// Combined total value.
    pub total: T,
}

impl<T> CategoryTriple<T> {
    /// Builds a triple by evaluating `f` for each category.
    pub fn from_fn(mut f: impl FnMut(NoiseCategory) -> T) -> Self {
        Self {
            road: f(NoiseCategory::Road),
            rail: f(NoiseCategory::Rail),
            total: f(NoiseCategory::Total),
        }
    }

    /// Returns the value for `category`.
    #[must_use]
    pub const fn get(&self, category: NoiseCategory) -> &T {
        match category {
            NoiseCategory::Road => &self.road,
            NoiseCategory::Rail => &self.rail,
            NoiseCategory::Total => &self.total,
        }
    }

    /// Maps every value, keeping its category.
    pub fn map<U>(self, mut f: impl FnMut(NoiseCategory, T) -> U) -> CategoryTriple<U> {
        CategoryTriple {
            road: f(NoiseCategory::Road, self.road),
            rail: f(NoiseCategory::Rail, self.rail),
            total: f(NoiseCategory::Total, self.total),
        }
    }

    /// Iterates `(category, value)` pairs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (NoiseCategory, &T)> {
        NoiseCategory::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

/// Position of a cell relative to the grid center, each axis in `-1..=1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridOffset {
    /// East (+) / west (-) step.
    pub dx: i8,
    /// North (+) / south (-) step.
    pub dy: i8,
}

impl GridOffset {
    /// The center cell.
    pub const CENTER: Self = Self { dx: 0, dy: 0 };

    /// All nine offsets, row by row from south-west to north-east.
    #[must_use]
    pub fn all() -> [Self; 9] {
        let mut offsets = [Self::CENTER; 9];
        let mut i = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                offsets[i] = Self { dx, dy };
                i += 1;
            }
        }
        offsets
    }
}

/// One sample point of the 3×3 visualization lattice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    /// Position relative to the grid center.
    pub offset: GridOffset,
    /// Cell center in WGS84.
    pub center: Coordinate,
    /// Descriptor per category; `None` where no reading is available.
    pub readings: CategoryTriple<Option<String>>,
}

/// A 3×3 lattice of noise samples around a resolved address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseGrid {
    /// The resolved address location.
    pub center: Coordinate,
    /// Cells ordered as [`GridOffset::all`]. Usually nine; positions whose
    /// source sample was malformed are absent.
    pub cells: Vec<GridCell>,
}

impl NoiseGrid {
    /// Returns the cell at offset `(0, 0)`.
    #[must_use]
    pub fn center_cell(&self) -> Option<&GridCell> {
        self.cells.iter().find(|c| c.offset == GridOffset::CENTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn tiers_are_ordered_quiet_to_loud() {
        let tiers: Vec<Tier> = Tier::iter().collect();
        let mut sorted = tiers.clone();
        sorted.sort();
        assert_eq!(tiers, sorted);
        assert!(Tier::None < Tier::Extreme);
    }

    #[test]
    fn category_names_round_trip_through_strum() {
        for category in NoiseCategory::iter() {
            assert_eq!(
                NoiseCategory::from_str(category.as_ref()).unwrap(),
                category
            );
        }
        assert_eq!(NoiseCategory::Rail.to_string(), "rail");
    }

    #[test]
    fn triple_from_fn_and_get_agree() {
        let triple = CategoryTriple::from_fn(NoiseCategory::label);
        for (category, label) in triple.iter() {
            assert_eq!(*label, category.label());
        }
    }

    #[test]
    fn offsets_cover_lattice_once() {
        let offsets = GridOffset::all();
        assert_eq!(offsets[4], GridOffset::CENTER);
        for (i, a) in offsets.iter().enumerate() {
            for b in &offsets[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(offsets[0], GridOffset { dx: -1, dy: -1 });
        assert_eq!(offsets[8], GridOffset { dx: 1, dy: 1 });
    }
}
