//! Plain-text renderers for the read-only CLI commands.

use fogmap_db::PgVisitStore;
use fogmap_grid::{explored_set, summarize, ExplorationSummary, RegionEnumerator, VisitStore};

/// Describe the cell containing `(lat, lon)`.
///
/// # Errors
///
/// Returns an error if the coordinate is outside the exploration region.
pub(crate) fn locate(enumerator: &RegionEnumerator, lat: f64, lon: f64) -> anyhow::Result<String> {
    let layout = enumerator.layout();
    let cell_id = layout
        .coordinate_to_cell_id(lat, lon)
        .ok_or_else(|| anyhow::anyhow!("({lat}, {lon}) is outside the exploration region"))?;
    let center = layout
        .cell_id_to_center(cell_id.as_str())
        .ok_or_else(|| anyhow::anyhow!("cell id '{cell_id}' could not be decoded"))?;

    Ok(format!(
        "cell    {cell_id}\ncenter  {:.4}, {:.4}",
        center.lat, center.lon
    ))
}

pub(crate) fn region(enumerator: &RegionEnumerator) -> String {
    let layout = enumerator.layout();
    let bounds = layout.region();
    let cell = layout.cell_size();

    format!(
        "latitude   {} .. {}\nlongitude  {} .. {}\ncell size  {} x {} deg\ncells      {}",
        bounds.min_lat,
        bounds.max_lat,
        bounds.min_lon,
        bounds.max_lon,
        cell.lat_step,
        cell.lon_step,
        enumerator.total_cells()
    )
}

pub(crate) fn coverage_line(owner: &str, summary: &ExplorationSummary) -> String {
    format!(
        "{owner}: {} of {} cells explored ({:.2}%)",
        summary.explored_cells, summary.total_cells, summary.percentage
    )
}

/// Print exploration coverage for `owner`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub(crate) async fn run_coverage(pool: &sqlx::PgPool, owner: &str) -> anyhow::Result<()> {
    let store = PgVisitStore::new(pool.clone());
    let visits = store.list_visits(owner).await?;
    if visits.is_empty() {
        println!("no visits recorded for '{owner}'");
        return Ok(());
    }

    let enumerator = fogmap_grid::default_enumerator();
    let explored = explored_set(enumerator.layout(), &visits);
    let summary = summarize(&explored, enumerator.total_cells());
    println!("{}", coverage_line(owner, &summary));
    Ok(())
}
