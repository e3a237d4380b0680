use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use fogmap_db::PgVisitStore;
use fogmap_grid::{default_enumerator, record_visit, RecordedVisit};
use serde::Deserialize;

use crate::middleware::{OwnerId, RequestId};

use super::{map_tracker_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct VisitRequest {
    pub lat: f64,
    pub lon: f64,
}

/// Record a location fix for the current owner.
///
/// Responds `201 Created` for a new visit and `200 OK` when the exact
/// coordinate was already recorded.
pub(super) async fn create_visit(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    OwnerId(owner_id): OwnerId,
    body: Result<Json<VisitRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<RecordedVisit>>), ApiError> {
    let Json(body) = body.map_err(|e| {
        ApiError::new(req_id.0.clone(), "validation_error", e.body_text())
    })?;

    let store = PgVisitStore::new(state.pool);
    let recorded = record_visit(
        &store,
        default_enumerator().layout(),
        &owner_id,
        body.lat,
        body.lon,
    )
    .await
    .map_err(|e| map_tracker_error(req_id.0.clone(), &e))?;

    let status = if recorded.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(ApiResponse::new(req_id.0, recorded))))
}
