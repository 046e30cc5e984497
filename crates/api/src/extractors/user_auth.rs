//! Authenticated operator extractor.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::user_auth::{session_token, UserAuth as UserAuthData};

/// The operator making the request.
///
/// Reads what `require_user_auth` stored; outside that middleware it
/// validates the session token itself.
#[derive(Debug, Clone)]
pub struct UserAuth {
    pub user_id: Uuid,
    pub jti: String,
}

impl From<UserAuthData> for UserAuth {
    fn from(data: UserAuthData) -> Self {
        Self {
            user_id: data.user_id,
            jti: data.jti,
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts.extensions.get::<UserAuthData>() {
            return Ok(auth.clone().into());
        }

        let token = session_token(&parts.headers, &state.cookies)
            .ok_or_else(|| ApiError::Unauthorized("Missing session token".to_string()))?;

        UserAuthData::validate(&state.jwt, token)
            .map(Into::into)
            .map_err(|_| ApiError::Unauthorized("Invalid session token".to_string()))
    }
}
