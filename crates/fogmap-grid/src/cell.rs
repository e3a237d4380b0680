//! Coordinate ↔ grid cell identifier mapping.
//!
//! Ids are derived from the floor-aligned lower-left corner of a cell and
//! formatted with fixed precision (`grid_{lat:.3}_{lon:.2}`) so that nominally
//! identical cells always serialize to byte-identical strings. Stored visit
//! history depends on this format; do not change the precision.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::layout::{CellSize, GridLayout};

const ID_PREFIX: &str = "grid_";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Identifier of one grid cell, e.g. `grid_25.029_121.56`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct GridCellId(String);

impl GridCellId {
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn from_indices(lat_index: i64, lon_index: i64, cell: CellSize) -> Self {
        let lat = lat_index as f64 * cell.lat_step;
        let lon = lon_index as f64 * cell.lon_step;
        Self(format!("{ID_PREFIX}{lat:.3}_{lon:.2}"))
    }

    /// Accept `raw` only if it is a canonically formatted cell id.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        parse_corner(raw).map(|_| Self(raw.to_owned()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GridCellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for GridCellId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl GridLayout {
    /// Cell containing `(lat, lon)`, or `None` outside the region.
    ///
    /// Cells are lower-left inclusive and upper-right exclusive.
    #[must_use]
    pub fn coordinate_to_cell_id(&self, lat: f64, lon: f64) -> Option<GridCellId> {
        self.is_in_region(lat, lon)
            .then(|| self.encode_cell_id(lat, lon))
    }

    /// Floor-and-format step of [`Self::coordinate_to_cell_id`] without the
    /// region check. Corners of the bottom row sit below `min_lat` and only
    /// re-encode through this path.
    #[must_use]
    pub fn encode_cell_id(&self, lat: f64, lon: f64) -> GridCellId {
        GridCellId::from_indices(self.lat_index(lat), self.lon_index(lon), self.cell_size())
    }

    /// Lower-left corner encoded in `id`. Malformed ids yield `None`.
    #[must_use]
    pub fn cell_id_to_corner(&self, id: &str) -> Option<LatLon> {
        parse_corner(id)
    }

    #[must_use]
    pub fn cell_id_to_center(&self, id: &str) -> Option<LatLon> {
        let corner = parse_corner(id)?;
        let cell = self.cell_size();
        Some(LatLon::new(
            corner.lat + cell.lat_step / 2.0,
            corner.lon + cell.lon_step / 2.0,
        ))
    }

    /// Closed ring: corner, north, north-east, east, corner.
    #[must_use]
    pub fn cell_id_to_polygon(&self, id: &str) -> Option<[LatLon; 5]> {
        let corner = parse_corner(id)?;
        let cell = self.cell_size();
        let north = corner.lat + cell.lat_step;
        let east = corner.lon + cell.lon_step;
        Some([
            corner,
            LatLon::new(north, corner.lon),
            LatLon::new(north, east),
            LatLon::new(corner.lat, east),
            corner,
        ])
    }
}

fn parse_corner(raw: &str) -> Option<LatLon> {
    let rest = raw.strip_prefix(ID_PREFIX)?;
    let (lat_raw, lon_raw) = rest.split_once('_')?;
    let lat: f64 = lat_raw.parse().ok()?;
    let lon: f64 = lon_raw.parse().ok()?;
    if !lat.is_finite() || !lon.is_finite() {
        return None;
    }
    // Reject non-canonical spellings ("25.0290", "+25.029", "2.5029e1").
    if format!("{lat:.3}") != lat_raw || format!("{lon:.2}") != lon_raw {
        return None;
    }
    Some(LatLon::new(lat, lon))
}
