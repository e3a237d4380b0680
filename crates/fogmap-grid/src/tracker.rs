//! Per-owner exploration state derived from visit history.
//!
//! Visits are stored per exact raw coordinate. Collapsing them into grid cells
//! happens on read in [`explored_set`], so the explored set is never persisted
//! and a cell, once explored, stays explored for as long as its visit exists.

use std::collections::BTreeSet;
use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cell::{GridCellId, LatLon};
use crate::layout::GridLayout;
use crate::TrackerError;

/// One persisted visit: an owner at an exact raw coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VisitRecord {
    pub id: i64,
    pub owner_id: String,
    /// `"<lat>,<lon>"`, see [`format_coordinate`].
    pub coordinate: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of [`record_visit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedVisit {
    pub created: bool,
    pub record: VisitRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExplorationSummary {
    pub explored_cells: usize,
    pub total_cells: usize,
    pub percentage: f64,
}

/// Storage seam for visit records, keyed by `(owner_id, coordinate)`.
pub trait VisitStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn find_visit(
        &self,
        owner_id: &str,
        coordinate: &str,
    ) -> impl Future<Output = Result<Option<VisitRecord>, Self::Error>> + Send;

    /// Bump `updated_at` on an existing record and return it.
    fn touch_visit(&self, id: i64) -> impl Future<Output = Result<VisitRecord, Self::Error>> + Send;

    /// Insert a record, returning it with `true` when this call inserted it.
    /// A store that loses a race to a concurrent insert of the same key
    /// returns the existing record with `false`.
    fn create_visit(
        &self,
        owner_id: &str,
        coordinate: &str,
    ) -> impl Future<Output = Result<(VisitRecord, bool), Self::Error>> + Send;

    /// All of an owner's visits that carry a coordinate.
    fn list_visits(
        &self,
        owner_id: &str,
    ) -> impl Future<Output = Result<Vec<VisitRecord>, Self::Error>> + Send;
}

/// Wire format for stored coordinates: comma-joined shortest decimals, no spaces.
#[must_use]
pub fn format_coordinate(lat: f64, lon: f64) -> String {
    format!("{lat},{lon}")
}

/// Parse a stored coordinate. Returns `None` for anything that is not two
/// finite comma-separated decimals.
#[must_use]
pub fn parse_coordinate(raw: &str) -> Option<LatLon> {
    let (lat_raw, lon_raw) = raw.split_once(',')?;
    let lat: f64 = lat_raw.trim().parse().ok()?;
    let lon: f64 = lon_raw.trim().parse().ok()?;
    (lat.is_finite() && lon.is_finite()).then_some(LatLon::new(lat, lon))
}

/// Distinct cells covered by `records`. Records with malformed or
/// out-of-region coordinates are skipped.
pub fn explored_set<'a, I>(layout: &GridLayout, records: I) -> BTreeSet<GridCellId>
where
    I: IntoIterator<Item = &'a VisitRecord>,
{
    let mut explored = BTreeSet::new();
    for record in records {
        let Some(point) = parse_coordinate(&record.coordinate) else {
            tracing::debug!(
                record_id = record.id,
                coordinate = %record.coordinate,
                "skipping visit with malformed coordinate"
            );
            continue;
        };
        match layout.coordinate_to_cell_id(point.lat, point.lon) {
            Some(cell_id) => {
                explored.insert(cell_id);
            }
            None => tracing::debug!(
                record_id = record.id,
                coordinate = %record.coordinate,
                "skipping visit outside exploration region"
            ),
        }
    }
    explored
}

/// `100 * explored / total`, clamped to `[0, 100]`. Zero when `total_cells` is zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn coverage_percentage(explored: &BTreeSet<GridCellId>, total_cells: usize) -> f64 {
    if total_cells == 0 {
        return 0.0;
    }
    (100.0 * explored.len() as f64 / total_cells as f64).min(100.0)
}

#[must_use]
pub fn summarize(explored: &BTreeSet<GridCellId>, total_cells: usize) -> ExplorationSummary {
    ExplorationSummary {
        explored_cells: explored.len(),
        total_cells,
        percentage: coverage_percentage(explored, total_cells),
    }
}

/// Record that `owner_id` was at `(lat, lon)`.
///
/// Re-visiting the exact same raw coordinate touches the existing record;
/// anything else creates a new one, even inside an already explored cell.
///
/// # Errors
///
/// Returns [`TrackerError::OutOfBounds`] before touching the store when the
/// coordinate lies outside the layout's region, or [`TrackerError::Store`] if
/// the store fails.
pub async fn record_visit<S>(
    store: &S,
    layout: &GridLayout,
    owner_id: &str,
    lat: f64,
    lon: f64,
) -> Result<RecordedVisit, TrackerError>
where
    S: VisitStore + Sync,
{
    if !layout.is_in_region(lat, lon) {
        return Err(TrackerError::OutOfBounds { lat, lon });
    }

    let coordinate = format_coordinate(lat, lon);
    let existing = store
        .find_visit(owner_id, &coordinate)
        .await
        .map_err(store_error)?;

    if let Some(existing) = existing {
        let record = store.touch_visit(existing.id).await.map_err(store_error)?;
        tracing::debug!(owner_id, %coordinate, record_id = record.id, "touched existing visit");
        return Ok(RecordedVisit {
            created: false,
            record,
        });
    }

    let (record, created) = store
        .create_visit(owner_id, &coordinate)
        .await
        .map_err(store_error)?;
    if created {
        tracing::info!(owner_id, %coordinate, record_id = record.id, "recorded new visit");
    } else {
        tracing::debug!(
            owner_id,
            %coordinate,
            record_id = record.id,
            "visit inserted concurrently; touched existing"
        );
    }
    Ok(RecordedVisit { created, record })
}

fn store_error<E>(error: E) -> TrackerError
where
    E: std::error::Error + Send + Sync + 'static,
{
    TrackerError::Store(Box::new(error))
}

#[cfg(test)]
#[path = "tracker_test.rs"]
mod tests;
