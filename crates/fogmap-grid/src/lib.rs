//! Geospatial grid indexing and fog-of-war computation.
//!
//! Continuous coordinates are discretized into fixed-size cells with stable
//! string identifiers; a player's visit history collapses into an explored set
//! whose complement is the fog drawn over the map.

pub mod cell;
pub mod enumerate;
pub mod error;
pub mod geo;
pub mod layout;
pub mod quest;
pub mod tracker;

pub use cell::{GridCellId, LatLon};
pub use enumerate::{default_enumerator, FogCell, RegionEnumerator, Viewport};
pub use error::{GridError, TrackerError};
pub use geo::haversine_km;
pub use layout::{BoundingRegion, CellSize, GridLayout};
pub use quest::{generate_quests, PoiCategory, PointOfInterest, Quest, QuestOptions};
pub use tracker::{
    coverage_percentage, explored_set, format_coordinate, parse_coordinate, record_visit,
    summarize, ExplorationSummary, RecordedVisit, VisitRecord, VisitStore,
};
