//! Enumeration of grid cells over the whole region or a viewport.
//!
//! Both enumerations include every cell that contains at least one in-region
//! point (axis indices `floor(min)..=floor(max)`), so every id produced by
//! [`GridLayout::coordinate_to_cell_id`] appears in [`RegionEnumerator::full_region`].

use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::sync::{Arc, LazyLock, OnceLock};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::cell::{GridCellId, LatLon};
use crate::layout::GridLayout;

static DEFAULT_ENUMERATOR: LazyLock<RegionEnumerator> =
    LazyLock::new(|| RegionEnumerator::new(GridLayout::TAIWAN));

/// Process-wide enumerator for [`GridLayout::TAIWAN`].
#[must_use]
pub fn default_enumerator() -> &'static RegionEnumerator {
    &DEFAULT_ENUMERATOR
}

/// Rectangular map viewport in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// One fogged cell, ready for a map overlay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FogCell {
    pub cell_id: GridCellId,
    pub polygon: [LatLon; 5],
}

struct IndexSpan {
    lat: RangeInclusive<i64>,
    lon: RangeInclusive<i64>,
}

impl IndexSpan {
    fn len(&self) -> usize {
        let rows = usize::try_from(self.lat.end() - self.lat.start() + 1).unwrap_or(0);
        let cols = usize::try_from(self.lon.end() - self.lon.start() + 1).unwrap_or(0);
        rows.saturating_mul(cols)
    }
}

/// Enumerates cells of a [`GridLayout`]; caches the full-region listing.
///
/// The cache is filled on first use and never invalidated: the layout is
/// immutable for the life of the enumerator.
#[derive(Debug)]
pub struct RegionEnumerator {
    layout: GridLayout,
    full_region: OnceLock<Arc<[GridCellId]>>,
}

impl RegionEnumerator {
    #[must_use]
    pub fn new(layout: GridLayout) -> Self {
        Self {
            layout,
            full_region: OnceLock::new(),
        }
    }

    #[must_use]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Every cell of the region, row-major: ascending latitude, then ascending
    /// longitude. Computed once.
    #[must_use]
    pub fn full_region(&self) -> Arc<[GridCellId]> {
        let cells = self.full_region.get_or_init(|| {
            let started = Instant::now();
            let region = self.layout.region();
            let span = self.span(region.min_lat, region.max_lat, region.min_lon, region.max_lon);
            let cells: Arc<[GridCellId]> = self.collect(&span).into();
            tracing::info!(
                cells = cells.len(),
                elapsed = ?started.elapsed(),
                "built full-region cell enumeration"
            );
            cells
        });
        Arc::clone(cells)
    }

    #[must_use]
    pub fn total_cells(&self) -> usize {
        self.full_region().len()
    }

    /// Cells overlapping `bounds` clamped to the region. Cells on the upper
    /// edge of the viewport are included. Empty when the viewport misses the
    /// region entirely or is not a finite, non-inverted rectangle.
    #[must_use]
    pub fn viewport(&self, bounds: &Viewport) -> Vec<GridCellId> {
        self.clamped_span(bounds)
            .map(|span| self.collect(&span))
            .unwrap_or_default()
    }

    /// Number of cells [`Self::viewport`] would return, without building them.
    #[must_use]
    pub fn viewport_cell_count(&self, bounds: &Viewport) -> usize {
        self.clamped_span(bounds).map_or(0, |span| span.len())
    }

    /// Viewport cells not present in `explored`, each with its polygon ring.
    #[must_use]
    pub fn fog(&self, bounds: &Viewport, explored: &BTreeSet<GridCellId>) -> Vec<FogCell> {
        self.viewport(bounds)
            .into_iter()
            .filter(|id| !explored.contains(id))
            .filter_map(|cell_id| {
                let polygon = self.layout.cell_id_to_polygon(cell_id.as_str())?;
                Some(FogCell { cell_id, polygon })
            })
            .collect()
    }

    fn clamped_span(&self, bounds: &Viewport) -> Option<IndexSpan> {
        let finite = [bounds.min_lat, bounds.max_lat, bounds.min_lon, bounds.max_lon]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return None;
        }

        let region = self.layout.region();
        let min_lat = bounds.min_lat.max(region.min_lat);
        let max_lat = bounds.max_lat.min(region.max_lat);
        let min_lon = bounds.min_lon.max(region.min_lon);
        let max_lon = bounds.max_lon.min(region.max_lon);
        if min_lat > max_lat || min_lon > max_lon {
            return None;
        }
        Some(self.span(min_lat, max_lat, min_lon, max_lon))
    }

    fn span(&self, min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> IndexSpan {
        IndexSpan {
            lat: self.layout.lat_index(min_lat)..=self.layout.lat_index(max_lat),
            lon: self.layout.lon_index(min_lon)..=self.layout.lon_index(max_lon),
        }
    }

    fn collect(&self, span: &IndexSpan) -> Vec<GridCellId> {
        let cell = self.layout.cell_size();
        let mut cells = Vec::with_capacity(span.len());
        for lat_index in span.lat.clone() {
            for lon_index in span.lon.clone() {
                cells.push(GridCellId::from_indices(lat_index, lon_index, cell));
            }
        }
        cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{BoundingRegion, CellSize};

    /// Two rows × two columns around Taipei 101.
    fn four_cell_layout() -> GridLayout {
        GridLayout::new(
            BoundingRegion {
                min_lat: 25.029,
                max_lat: 25.04,
                min_lon: 121.56,
                max_lon: 121.575,
            },
            CellSize {
                lat_step: 0.009,
                lon_step: 0.01,
            },
        )
        .expect("valid layout")
    }

    #[test]
    fn full_region_is_row_major() {
        let enumerator = RegionEnumerator::new(four_cell_layout());
        let ids: Vec<String> = enumerator
            .full_region()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            ids,
            vec![
                "grid_25.029_121.56",
                "grid_25.029_121.57",
                "grid_25.038_121.56",
                "grid_25.038_121.57",
            ]
        );
    }

    #[test]
    fn full_region_is_cached() {
        let enumerator = RegionEnumerator::new(four_cell_layout());
        let first = enumerator.full_region();
        let second = enumerator.full_region();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn taiwan_cell_count_is_in_expected_range() {
        let total = default_enumerator().total_cells();
        // 379 latitude rows × 201 longitude columns.
        assert_eq!(total, 379 * 201);
        assert!((10_000..100_000).contains(&total));
    }

    #[test]
    fn every_in_region_coordinate_maps_to_an_enumerated_cell() {
        let enumerator = default_enumerator();
        let cells: BTreeSet<GridCellId> = enumerator.full_region().iter().cloned().collect();
        let region = enumerator.layout().region();
        for (lat, lon) in [
            (region.min_lat, region.min_lon),
            (region.max_lat, region.max_lon),
            (region.min_lat, region.max_lon),
            (region.max_lat, region.min_lon),
            (25.033, 121.565_4),
        ] {
            let id = enumerator
                .layout()
                .coordinate_to_cell_id(lat, lon)
                .expect("in region");
            assert!(cells.contains(&id), "{id} missing from full region");
        }
    }

    #[test]
    fn oversize_viewport_equals_full_region() {
        let enumerator = RegionEnumerator::new(four_cell_layout());
        let viewport = Viewport {
            min_lat: 20.0,
            max_lat: 30.0,
            min_lon: 110.0,
            max_lon: 130.0,
        };
        assert_eq!(enumerator.viewport(&viewport), enumerator.full_region().to_vec());
        assert_eq!(enumerator.viewport_cell_count(&viewport), 4);
    }

    #[test]
    fn viewport_outside_region_is_empty() {
        let enumerator = RegionEnumerator::new(four_cell_layout());
        let viewport = Viewport {
            min_lat: 0.0,
            max_lat: 1.0,
            min_lon: 0.0,
            max_lon: 1.0,
        };
        assert!(enumerator.viewport(&viewport).is_empty());
        assert_eq!(enumerator.viewport_cell_count(&viewport), 0);
    }

    #[test]
    fn inverted_or_non_finite_viewport_is_empty() {
        let enumerator = RegionEnumerator::new(four_cell_layout());
        let inverted = Viewport {
            min_lat: 25.04,
            max_lat: 25.03,
            min_lon: 121.56,
            max_lon: 121.57,
        };
        assert!(enumerator.viewport(&inverted).is_empty());
        let nan = Viewport {
            min_lat: f64::NAN,
            ..inverted
        };
        assert!(enumerator.viewport(&nan).is_empty());
    }

    #[test]
    fn viewport_includes_upper_edge_cell() {
        let enumerator = default_enumerator();
        // Upper edge sits exactly on the 25.038 / 121.57 cell boundary.
        let viewport = Viewport {
            min_lat: 25.03,
            max_lat: 25.038,
            min_lon: 121.561,
            max_lon: 121.57,
        };
        let ids: Vec<String> = enumerator
            .viewport(&viewport)
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(
            ids,
            vec![
                "grid_25.029_121.56",
                "grid_25.029_121.57",
                "grid_25.038_121.56",
                "grid_25.038_121.57",
            ]
        );
        assert_eq!(enumerator.viewport_cell_count(&viewport), 4);
    }

    #[test]
    fn fog_excludes_explored_cells() {
        let enumerator = RegionEnumerator::new(four_cell_layout());
        let explored: BTreeSet<GridCellId> = [GridCellId::parse("grid_25.029_121.56").expect("id")]
            .into_iter()
            .collect();
        let viewport = Viewport {
            min_lat: 25.0,
            max_lat: 25.1,
            min_lon: 121.5,
            max_lon: 121.6,
        };
        let fog = enumerator.fog(&viewport, &explored);
        assert_eq!(fog.len(), 3);
        assert!(fog.iter().all(|cell| !explored.contains(&cell.cell_id)));
        assert!(fog.iter().all(|cell| cell.polygon[0] == cell.polygon[4]));
    }
}
