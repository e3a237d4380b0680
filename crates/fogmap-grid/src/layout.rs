//! Fixed exploration region and cell dimensions.
//!
//! Every grid computation is parameterized by a [`GridLayout`]. Production code
//! uses [`GridLayout::TAIWAN`]; smaller layouts exist so tests can reason about
//! a handful of cells.

use serde::Serialize;

use crate::GridError;

/// Added to `value / step` before flooring so decimal cell corners such as
/// `120.07` (not exactly representable in binary) land in their own cell.
const INDEX_BIAS: f64 = 1e-9;

/// Rectangle of latitude/longitude eligible for grid indexing. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingRegion {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl BoundingRegion {
    #[must_use]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }
}

/// Cell dimensions in degrees. Not square in degree space: roughly 1 km × 1 km
/// on the ground at 25°N.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellSize {
    pub lat_step: f64,
    pub lon_step: f64,
}

/// A validated region + cell size pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    region: BoundingRegion,
    cell: CellSize,
}

impl GridLayout {
    /// Taiwan main island plus the surrounding coast at ~1 km resolution.
    pub const TAIWAN: Self = Self {
        region: BoundingRegion {
            min_lat: 21.9,
            max_lat: 25.3,
            min_lon: 120.0,
            max_lon: 122.0,
        },
        cell: CellSize {
            lat_step: 0.009,
            lon_step: 0.01,
        },
    };

    /// Build a layout, rejecting configurations that would make enumeration
    /// degenerate (zero or negative steps, empty or non-finite bounds).
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidStep`] or [`GridError::InvalidRegion`].
    pub fn new(region: BoundingRegion, cell: CellSize) -> Result<Self, GridError> {
        validate_step("latitude", cell.lat_step)?;
        validate_step("longitude", cell.lon_step)?;
        validate_axis("latitude", region.min_lat, region.max_lat)?;
        validate_axis("longitude", region.min_lon, region.max_lon)?;
        Ok(Self { region, cell })
    }

    #[must_use]
    pub fn region(&self) -> BoundingRegion {
        self.region
    }

    #[must_use]
    pub fn cell_size(&self) -> CellSize {
        self.cell
    }

    #[must_use]
    pub fn is_in_region(&self, lat: f64, lon: f64) -> bool {
        self.region.contains(lat, lon)
    }

    pub(crate) fn lat_index(&self, lat: f64) -> i64 {
        axis_index(lat, self.cell.lat_step)
    }

    pub(crate) fn lon_index(&self, lon: f64) -> i64 {
        axis_index(lon, self.cell.lon_step)
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::TAIWAN
    }
}

#[allow(clippy::cast_possible_truncation)]
fn axis_index(value: f64, step: f64) -> i64 {
    (value / step + INDEX_BIAS).floor() as i64
}

fn validate_step(axis: &'static str, value: f64) -> Result<(), GridError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GridError::InvalidStep { axis, value })
    }
}

fn validate_axis(axis: &'static str, min: f64, max: f64) -> Result<(), GridError> {
    if min.is_finite() && max.is_finite() && min < max {
        Ok(())
    } else {
        Err(GridError::InvalidRegion { axis, min, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taiwan_layout_passes_validation() {
        let t = GridLayout::TAIWAN;
        assert_eq!(GridLayout::new(t.region(), t.cell_size()), Ok(t));
    }

    #[test]
    fn zero_step_is_rejected() {
        let err = GridLayout::new(
            GridLayout::TAIWAN.region(),
            CellSize {
                lat_step: 0.0,
                lon_step: 0.01,
            },
        )
        .unwrap_err();
        assert!(matches!(err, GridError::InvalidStep { axis: "latitude", .. }));
    }

    #[test]
    fn nan_step_is_rejected() {
        let err = GridLayout::new(
            GridLayout::TAIWAN.region(),
            CellSize {
                lat_step: 0.009,
                lon_step: f64::NAN,
            },
        )
        .unwrap_err();
        assert!(matches!(err, GridError::InvalidStep { axis: "longitude", .. }));
    }

    #[test]
    fn inverted_region_is_rejected() {
        let err = GridLayout::new(
            BoundingRegion {
                min_lat: 25.0,
                max_lat: 24.0,
                min_lon: 120.0,
                max_lon: 121.0,
            },
            GridLayout::TAIWAN.cell_size(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("latitude"));
    }

    #[test]
    fn region_bounds_are_inclusive() {
        let t = GridLayout::TAIWAN;
        assert!(t.is_in_region(21.9, 120.0));
        assert!(t.is_in_region(25.3, 122.0));
        assert!(!t.is_in_region(25.300_001, 121.0));
        assert!(!t.is_in_region(0.0, 0.0));
        assert!(!t.is_in_region(f64::NAN, 121.0));
    }

    #[test]
    fn axis_index_uses_mathematical_floor_for_negatives() {
        assert_eq!(axis_index(-0.001, 0.01), -1);
        assert_eq!(axis_index(0.001, 0.01), 0);
        assert_eq!(axis_index(-0.01, 0.01), -1);
    }

    #[test]
    fn axis_index_absorbs_decimal_representation_error() {
        // 120.07 / 0.01 is 12006.999... in binary arithmetic.
        assert_eq!(axis_index(120.07, 0.01), 12007);
        assert_eq!(axis_index(25.029, 0.009), 2781);
    }
}
