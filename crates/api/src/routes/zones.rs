//! Zone route handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::zone::{
    CreateZoneRequest, DeleteZoneResponse, ListZonesQuery, ListZonesResponse, ResolveZoneQuery,
    ResolveZoneResponse, UpdateZoneRequest, ZoneDetail, ZoneDetailResponse, ZoneResponse,
};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{JsonBody, QueryParams, UserAuth};
use crate::middleware::metrics::record_zone_created;

/// List zones, newest first.
///
/// GET /api/v1/zones?active_only=true
///
/// When no zone is active the full set is returned instead.
pub async fn list_zones(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ListZonesQuery>,
) -> Result<Json<ListZonesResponse>, ApiError> {
    let zones = state.geometry_store().list(query.active_only).await?;

    Ok(Json(ListZonesResponse {
        total: zones.len(),
        zones,
    }))
}

/// Create a zone owned by the calling operator.
///
/// POST /api/v1/zones
pub async fn create_zone(
    State(state): State<AppState>,
    user: UserAuth,
    JsonBody(request): JsonBody<CreateZoneRequest>,
) -> Result<(StatusCode, Json<ZoneResponse>), ApiError> {
    let zone = state.geometry_store().create(user.user_id, request).await?;
    record_zone_created();

    Ok((StatusCode::CREATED, Json(ZoneResponse { zone })))
}

/// Preview which zone a coordinate would be assigned to.
///
/// GET /api/v1/zones/resolve?lat=24.7&lng=46.6
pub async fn resolve_zone(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<ResolveZoneQuery>,
) -> Result<Json<ResolveZoneResponse>, ApiError> {
    let zone = state.zone_resolver().resolve(query.lat, query.lng).await?;
    Ok(Json(ResolveZoneResponse { zone }))
}

/// Get a zone together with its assigned drivers.
///
/// GET /api/v1/zones/:zone_id
pub async fn get_zone(
    State(state): State<AppState>,
    Path(zone_id): Path<Uuid>,
) -> Result<Json<ZoneDetailResponse>, ApiError> {
    let zone = state.geometry_store().get(zone_id).await?;
    let assigned_drivers = state.driver_zone_linker().list(zone_id).await?;

    Ok(Json(ZoneDetailResponse {
        zone: ZoneDetail {
            zone,
            assigned_drivers,
        },
    }))
}

/// Merge-patch a zone. Absent fields are left untouched.
///
/// PUT /api/v1/zones/:zone_id
pub async fn update_zone(
    State(state): State<AppState>,
    Path(zone_id): Path<Uuid>,
    JsonBody(request): JsonBody<UpdateZoneRequest>,
) -> Result<Json<ZoneResponse>, ApiError> {
    let zone = state.geometry_store().update(zone_id, request).await?;
    Ok(Json(ZoneResponse { zone }))
}

/// Delete a zone and its driver assignments. Deleting twice is not an error.
///
/// DELETE /api/v1/zones/:zone_id
pub async fn delete_zone(
    State(state): State<AppState>,
    Path(zone_id): Path<Uuid>,
) -> Result<Json<DeleteZoneResponse>, ApiError> {
    let deleted = state.geometry_store().delete(zone_id).await?;
    Ok(Json(DeleteZoneResponse { deleted, zone_id }))
}
