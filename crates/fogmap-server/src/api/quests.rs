use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use fogmap_grid::{default_enumerator, generate_quests, LatLon, Quest};

use crate::middleware::{OwnerId, RequestId};

use super::{
    exploration::load_explored, grid::CoordinateQuery, map_query_rejection, out_of_bounds,
    ApiError, ApiResponse, AppState,
};

/// Quests around the player's position, nearest first. Targets the player has
/// not explored yet carry the fog bonus.
pub(super) async fn nearby_quests(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    OwnerId(owner_id): OwnerId,
    query: Result<Query<CoordinateQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<Vec<Quest>>>, ApiError> {
    let Query(query) = query.map_err(|e| map_query_rejection(req_id.0.clone(), &e))?;
    let layout = default_enumerator().layout();
    if !layout.is_in_region(query.lat, query.lon) {
        return Err(out_of_bounds(req_id.0, query.lat, query.lon));
    }

    let explored = load_explored(&state, &req_id, &owner_id).await?;
    let quests = generate_quests(
        layout,
        LatLon::new(query.lat, query.lon),
        &state.pois,
        &explored,
        state.quest_options,
    );
    Ok(Json(ApiResponse::new(req_id.0, quests)))
}
