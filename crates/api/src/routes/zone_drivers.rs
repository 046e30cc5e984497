//! Driver-to-zone assignment handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::driver::{
    AssignDriversRequest, AssignDriversResponse, RemoveDriverResponse, ZoneDriversResponse,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::JsonBody;
use crate::middleware::metrics::record_assignments;

/// GET /api/v1/zones/:zone_id/drivers
pub async fn list_zone_drivers(
    State(state): State<AppState>,
    Path(zone_id): Path<Uuid>,
) -> Result<Json<ZoneDriversResponse>, ApiError> {
    let drivers = state.driver_zone_linker().list(zone_id).await?;
    Ok(Json(ZoneDriversResponse { zone_id, drivers }))
}

/// Assign one or more drivers to a zone.
///
/// POST /api/v1/zones/:zone_id/drivers
///
/// Responds 201 when at least one new assignment was made, 200 when every
/// driver was already assigned or unknown.
pub async fn assign_drivers(
    State(state): State<AppState>,
    Path(zone_id): Path<Uuid>,
    JsonBody(request): JsonBody<AssignDriversRequest>,
) -> Result<(StatusCode, Json<AssignDriversResponse>), ApiError> {
    let outcome = state
        .driver_zone_linker()
        .assign(zone_id, &request.driver_ids())
        .await?;

    record_assignments(
        outcome.assigned.len(),
        outcome.already_assigned.len() + outcome.unknown_drivers.len(),
    );

    let status = if outcome.created_any() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(AssignDriversResponse::new(zone_id, outcome))))
}

/// DELETE /api/v1/zones/:zone_id/drivers/:driver_id
pub async fn remove_driver(
    State(state): State<AppState>,
    Path((zone_id, driver_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<RemoveDriverResponse>, ApiError> {
    let removed = state.driver_zone_linker().remove(zone_id, driver_id).await?;

    Ok(Json(RemoveDriverResponse {
        removed,
        zone_id,
        driver_id,
    }))
}
