//! Operator session handlers.

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use domain::models::user::{CurrentUserResponse, LoginRequest, LoginResponse};
use serde_json::json;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{JsonBody, UserAuth};

/// Log in with email and password.
///
/// POST /api/v1/auth/login
///
/// The token is returned in the body and also set as an httpOnly cookie.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Response, ApiError> {
    request.validate()?;

    let session = state
        .authenticator()
        .login(&request.email, &request.password)
        .await?;

    let mut headers = HeaderMap::new();
    state.cookies.add_session_cookie(&mut headers, &session.token);

    let body = LoginResponse {
        user: session.user,
        token: session.token,
        expires_in: session.expires_in,
    };

    Ok((headers, Json(body)).into_response())
}

/// Clear the session cookie.
///
/// POST /api/v1/auth/logout
///
/// Tokens are stateless; bearer clients simply discard theirs.
pub async fn logout(State(state): State<AppState>) -> Response {
    let mut headers = HeaderMap::new();
    state.cookies.add_clear_cookie(&mut headers);

    (headers, Json(json!({ "logged_out": true }))).into_response()
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    user: UserAuth,
) -> Result<Json<CurrentUserResponse>, ApiError> {
    let user = state.authenticator().current_user(user.user_id).await?;
    Ok(Json(CurrentUserResponse { user }))
}
