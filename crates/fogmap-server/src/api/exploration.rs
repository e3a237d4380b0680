use std::collections::BTreeSet;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use fogmap_db::PgVisitStore;
use fogmap_grid::{
    default_enumerator, explored_set, summarize, ExplorationSummary, FogCell, GridCellId,
    Viewport, VisitStore,
};
use serde::Serialize;

use crate::middleware::{OwnerId, RequestId};

use super::{map_db_error, map_query_rejection, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct ExploredCellsItem {
    pub count: usize,
    pub cells: Vec<GridCellId>,
}

#[derive(Debug, Serialize)]
pub(super) struct FogItem {
    pub viewport: Viewport,
    pub cells: Vec<FogCell>,
}

/// Load the owner's visits and collapse them into explored cells.
pub(super) async fn load_explored(
    state: &AppState,
    req_id: &RequestId,
    owner_id: &str,
) -> Result<BTreeSet<GridCellId>, ApiError> {
    let store = PgVisitStore::new(state.pool.clone());
    let visits = store
        .list_visits(owner_id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    Ok(explored_set(default_enumerator().layout(), &visits))
}

pub(super) async fn progress(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    OwnerId(owner_id): OwnerId,
) -> Result<Json<ApiResponse<ExplorationSummary>>, ApiError> {
    let explored = load_explored(&state, &req_id, &owner_id).await?;
    let summary = summarize(&explored, default_enumerator().total_cells());
    Ok(Json(ApiResponse::new(req_id.0, summary)))
}

pub(super) async fn explored_cells(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    OwnerId(owner_id): OwnerId,
) -> Result<Json<ApiResponse<ExploredCellsItem>>, ApiError> {
    let explored = load_explored(&state, &req_id, &owner_id).await?;
    let cells: Vec<GridCellId> = explored.into_iter().collect();
    Ok(Json(ApiResponse::new(
        req_id.0,
        ExploredCellsItem {
            count: cells.len(),
            cells,
        },
    )))
}

/// Unexplored cells within the requested viewport.
///
/// The viewport size is checked before any database access so oversized
/// requests are cheap to reject.
pub(super) async fn fog(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    OwnerId(owner_id): OwnerId,
    query: Result<Query<Viewport>, QueryRejection>,
) -> Result<Json<ApiResponse<FogItem>>, ApiError> {
    let Query(viewport) = query.map_err(|e| map_query_rejection(req_id.0.clone(), &e))?;
    let enumerator = default_enumerator();

    let requested = enumerator.viewport_cell_count(&viewport);
    if requested > state.fog_max_cells {
        return Err(ApiError::new(
            req_id.0,
            "viewport_too_large",
            format!(
                "viewport covers {requested} cells; at most {} allowed",
                state.fog_max_cells
            ),
        ));
    }

    let explored = load_explored(&state, &req_id, &owner_id).await?;
    let cells = enumerator.fog(&viewport, &explored);
    Ok(Json(ApiResponse::new(req_id.0, FogItem { viewport, cells })))
}
