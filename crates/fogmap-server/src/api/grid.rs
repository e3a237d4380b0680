use axum::{
    extract::{rejection::QueryRejection, Query},
    Extension, Json,
};
use fogmap_grid::{default_enumerator, BoundingRegion, CellSize, GridCellId, LatLon};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_query_rejection, out_of_bounds, ApiError, ApiResponse};

#[derive(Debug, Deserialize)]
pub(super) struct CoordinateQuery {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize)]
pub(super) struct CellItem {
    pub cell_id: GridCellId,
    pub corner: LatLon,
    pub center: LatLon,
    pub polygon: [LatLon; 5],
}

#[derive(Debug, Serialize)]
pub(super) struct RegionItem {
    pub region: BoundingRegion,
    pub cell_size: CellSize,
    pub total_cells: usize,
}

pub(super) async fn cell_for_coordinate(
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<CoordinateQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<CellItem>>, ApiError> {
    let Query(query) = query.map_err(|e| map_query_rejection(req_id.0.clone(), &e))?;
    let layout = default_enumerator().layout();

    let item = layout
        .coordinate_to_cell_id(query.lat, query.lon)
        .and_then(|cell_id| {
            let corner = layout.cell_id_to_corner(cell_id.as_str())?;
            let center = layout.cell_id_to_center(cell_id.as_str())?;
            let polygon = layout.cell_id_to_polygon(cell_id.as_str())?;
            Some(CellItem {
                cell_id,
                corner,
                center,
                polygon,
            })
        })
        .ok_or_else(|| out_of_bounds(req_id.0.clone(), query.lat, query.lon))?;

    Ok(Json(ApiResponse::new(req_id.0, item)))
}

pub(super) async fn region_info(
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<RegionItem>> {
    let enumerator = default_enumerator();
    let layout = enumerator.layout();

    Json(ApiResponse::new(
        req_id.0,
        RegionItem {
            region: layout.region(),
            cell_size: layout.cell_size(),
            total_cells: enumerator.total_cells(),
        },
    ))
}
