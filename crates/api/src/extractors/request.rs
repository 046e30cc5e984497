//! JSON body and query string extractors that reject with [`ApiError`].
//!
//! axum's own `Json` and `Query` answer malformed input with plain-text 400
//! and 422 responses. These wrappers route the same failures through the
//! error body every other validation failure uses.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// A JSON request body.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Query string parameters.
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, response::Response, routing::get, Router};
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Debug, Deserialize)]
    struct Coordinates {
        lat: f64,
        lng: f64,
    }

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    async fn coordinates(QueryParams(c): QueryParams<Coordinates>) -> String {
        format!("{},{}", c.lat, c.lng)
    }

    async fn named(JsonBody(n): JsonBody<Named>) -> String {
        n.name
    }

    fn app() -> Router {
        Router::new()
            .route("/coordinates", get(coordinates))
            .route("/named", axum::routing::post(named))
    }

    async fn send(request: axum::http::Request<Body>) -> (StatusCode, serde_json::Value) {
        let response: Response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (
            status,
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null),
        )
    }

    fn post_json(body: &'static str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method("POST")
            .uri("/named")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    fn get_uri(uri: &str) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_input_passes_through() {
        let response = app()
            .oneshot(get_uri("/coordinates?lat=24.7&lng=46.6"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app().oneshot(post_json(r#"{"name":"Olaya"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_wrong_json_type_names_field() {
        let (status, body) = send(post_json(r#"{"name":5}"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["details"][0]["field"], "name");
    }

    #[tokio::test]
    async fn test_malformed_json_is_validation_error() {
        let (status, body) = send(post_json(r#"{"name":"#)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_missing_query_param_names_field() {
        let (status, body) = send(get_uri("/coordinates?lat=24.7")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["details"][0]["field"], "lng");
    }

    #[tokio::test]
    async fn test_non_numeric_query_param_is_validation_error() {
        let (status, body) = send(get_uri("/coordinates?lat=abc&lng=46.6")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
    }
}
