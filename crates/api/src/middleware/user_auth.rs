//! Session authentication middleware.
//!
//! Accepts the session token as `Authorization: Bearer <token>` or, for
//! browser clients, from the session cookie.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::jwt::{JwtConfig, JwtError};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::services::cookies::CookieHelper;

/// Authenticated operator, inserted into request extensions.
#[derive(Debug, Clone)]
pub struct UserAuth {
    pub user_id: Uuid,
    /// Token ID, logged for session correlation.
    pub jti: String,
}

impl UserAuth {
    pub fn validate(jwt_config: &JwtConfig, token: &str) -> Result<Self, JwtError> {
        let claims = jwt_config.validate_session_token(token)?;
        Ok(UserAuth {
            user_id: claims.user_id()?,
            jti: claims.jti,
        })
    }
}

/// Finds the session token. The Authorization header wins over the cookie.
pub fn session_token<'a>(headers: &'a HeaderMap, cookies: &CookieHelper) -> Option<&'a str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .or_else(|| cookies.extract_session_token(headers))
}

/// Rejects requests without a valid session token.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let Some(token) = session_token(req.headers(), &state.cookies) else {
        return ApiError::Unauthorized("Missing session token".into()).into_response();
    };

    match UserAuth::validate(&state.jwt, token) {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!("Session token rejected: {}", e);
            let message = match e {
                JwtError::TokenExpired => "Session expired",
                _ => "Invalid session token",
            };
            ApiError::Unauthorized(message.into()).into_response()
        }
    }
}
