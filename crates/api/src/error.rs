use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::DomainError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Validation failure attributed to one request field.
    #[error("Invalid `{field}`: {message}")]
    InvalidField { field: String, message: String },

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<ValidationDetail>>,
}

#[derive(Debug, Serialize)]
pub struct ValidationDetail {
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut details = None;
        let (status, error_code, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg),
            ApiError::InvalidField { field, message } => {
                details = Some(vec![ValidationDetail {
                    field,
                    message: message.clone(),
                }]);
                (StatusCode::BAD_REQUEST, "validation_error", message)
            }
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "Too many requests. Please try again later.".into(),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
            ApiError::ServiceUnavailable(msg) => {
                tracing::warn!("Service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "service_unavailable",
                    "Storage is temporarily unavailable. Please retry.".into(),
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { field, message } => ApiError::InvalidField { field, message },
            not_found @ DomainError::NotFound { .. } => ApiError::NotFound(not_found.to_string()),
            DomainError::StorageUnavailable(msg) => ApiError::ServiceUnavailable(msg),
            DomainError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        DomainError::from(errors).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(e) => deserialize_error(&e.body_text()),
            other => ApiError::Validation(other.body_text()),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        match rejection {
            QueryRejection::FailedToDeserializeQueryString(e) => deserialize_error(&e.body_text()),
            other => ApiError::Validation(other.body_text()),
        }
    }
}

/// Attributes a deserialization failure to the field serde reported.
///
/// Input looks like `<prefix>: <path>: <cause>` or `<prefix>: missing field `x``.
fn deserialize_error(text: &str) -> ApiError {
    let detail = text.split_once(": ").map_or(text, |(_, rest)| rest);

    if let Some(field) = missing_field(detail) {
        return ApiError::InvalidField {
            message: format!("{} is required", field),
            field,
        };
    }

    match detail.split_once(": ") {
        Some((path, cause)) if is_field_path(path) => ApiError::InvalidField {
            field: path.to_string(),
            message: cause.to_string(),
        },
        _ => ApiError::Validation(detail.to_string()),
    }
}

fn missing_field(detail: &str) -> Option<String> {
    let rest = detail.split_once("missing field `")?.1;
    let (field, _) = rest.split_once('`')?;
    Some(field.to_string())
}

fn is_field_path(path: &str) -> bool {
    path != "."
        && !path.is_empty()
        && path
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use validator::Validate;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_api_error_unauthorized() {
        let response = ApiError::Unauthorized("test message".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_api_error_forbidden() {
        let response = ApiError::Forbidden("account disabled".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_api_error_rate_limited() {
        let response = ApiError::RateLimited.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_api_error_internal() {
        let response = ApiError::Internal("decode failed".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_invalid_field_names_the_field() {
        let response = ApiError::InvalidField {
            field: "latitude".to_string(),
            message: "latitude must be between -90 and 90".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["details"][0]["field"], "latitude");
    }

    #[test]
    fn test_from_domain_not_found() {
        let zone_id = uuid::Uuid::new_v4();
        let error: ApiError = DomainError::not_found("Zone", zone_id).into();
        match error {
            ApiError::NotFound(msg) => assert!(msg.contains(&zone_id.to_string())),
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_storage_unavailable_maps_to_503_without_leaking_cause() {
        let error: ApiError = DomainError::StorageUnavailable("pool timed out".into()).into();
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = body_json(response).await;
        assert_eq!(body["error"], "service_unavailable");
        assert!(!body["message"].as_str().unwrap().contains("pool"));
    }

    #[test]
    fn test_from_validation_errors() {
        #[derive(Validate)]
        struct Payload {
            #[validate(length(min = 1, message = "name is required"))]
            name: String,
        }

        let errors = Payload {
            name: String::new(),
        }
        .validate()
        .unwrap_err();

        match ApiError::from(errors) {
            ApiError::InvalidField { field, message } => {
                assert_eq!(field, "name");
                assert_eq!(message, "name is required");
            }
            other => panic!("Expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn test_deserialize_error_names_field() {
        let error = deserialize_error(
            "Failed to deserialize the JSON body into the target type: latitude: \
             data did not match any variant of untagged enum CoordinateInput at line 1 column 17",
        );
        match error {
            ApiError::InvalidField { field, .. } => assert_eq!(field, "latitude"),
            other => panic!("Expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn test_deserialize_error_missing_field() {
        match deserialize_error("Failed to deserialize query string: missing field `lng`") {
            ApiError::InvalidField { field, message } => {
                assert_eq!(field, "lng");
                assert_eq!(message, "lng is required");
            }
            other => panic!("Expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn test_deserialize_error_without_path() {
        let error = deserialize_error(
            "Failed to deserialize the JSON body into the target type: \
             invalid type: sequence, expected a map at line 1 column 0",
        );
        assert!(matches!(error, ApiError::Validation(_)));
    }

    #[test]
    fn test_api_error_display() {
        assert_eq!(
            ApiError::NotFound("test".to_string()).to_string(),
            "Not found: test"
        );
        assert_eq!(
            ApiError::InvalidField {
                field: "color".into(),
                message: "bad".into()
            }
            .to_string(),
            "Invalid `color`: bad"
        );
        assert_eq!(ApiError::RateLimited.to_string(), "Rate limited");
    }
}
