//! Warehouse route handlers.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::warehouse::{
    CreateWarehouseRequest, CreateWarehouseResponse, ListWarehousesResponse,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{JsonBody, UserAuth};
use crate::middleware::metrics::record_warehouse_created;

/// GET /api/v1/warehouses
pub async fn list_warehouses(
    State(state): State<AppState>,
) -> Result<Json<ListWarehousesResponse>, ApiError> {
    let warehouses = state.warehouse_registry().list().await?;

    Ok(Json(ListWarehousesResponse {
        total: warehouses.len(),
        warehouses,
    }))
}

/// Create a warehouse and assign it to the nearest zone.
///
/// POST /api/v1/warehouses
pub async fn create_warehouse(
    State(state): State<AppState>,
    user: UserAuth,
    JsonBody(request): JsonBody<CreateWarehouseRequest>,
) -> Result<(StatusCode, Json<CreateWarehouseResponse>), ApiError> {
    let created = state
        .warehouse_registry()
        .create(user.user_id, request)
        .await?;
    record_warehouse_created(created.zone.is_some());

    Ok((StatusCode::CREATED, Json(created.into())))
}
