//! Driver route handlers.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::driver::{CreateDriverRequest, CreateDriverResponse, ListDriversResponse};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{JsonBody, UserAuth};

/// GET /api/v1/drivers
pub async fn list_drivers(
    State(state): State<AppState>,
) -> Result<Json<ListDriversResponse>, ApiError> {
    let drivers = state.driver_registry().list().await?;

    Ok(Json(ListDriversResponse {
        total: drivers.len(),
        drivers,
    }))
}

/// Create a driver and link it to any zones listed in `zone_ids`.
///
/// POST /api/v1/drivers
pub async fn create_driver(
    State(state): State<AppState>,
    user: UserAuth,
    JsonBody(request): JsonBody<CreateDriverRequest>,
) -> Result<(StatusCode, Json<CreateDriverResponse>), ApiError> {
    let driver = state.driver_registry().create(user.user_id, request).await?;
    Ok((StatusCode::CREATED, Json(CreateDriverResponse { driver })))
}
