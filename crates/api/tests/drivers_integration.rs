//! Integration tests for the driver registry.

mod common;

use axum::http::StatusCode;
use common::{error_field, parse_response_body, point, spawn_app};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_create_driver_with_zones() {
    let app = spawn_app().await;
    let olaya = app.create_zone("Olaya", point(24.69, 46.68)).await;
    let malaz = app.create_zone("Malaz", point(24.66, 46.73)).await;

    let response = app
        .post(
            "/api/v1/drivers",
            json!({
                "name": "Ahmed",
                "phone": "+966500000020",
                "password": "driver-pass",
                "zoneIds": [olaya["id"], malaz["id"]],
                "vehicle": "van"
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_response_body(response).await;
    let driver = &body["driver"];
    assert_eq!(driver["name"], "Ahmed");
    assert_eq!(driver["account_details"]["vehicle"], "van");
    assert!(driver.get("password").is_none());
    assert!(driver.get("password_hash").is_none());

    let zone_names: Vec<&str> = driver["zones"]
        .as_array()
        .unwrap()
        .iter()
        .map(|z| z["name"].as_str().unwrap())
        .collect();
    assert_eq!(zone_names, vec!["Olaya", "Malaz"]);

    let body = parse_response_body(
        app.get(&format!(
            "/api/v1/zones/{}/drivers",
            olaya["id"].as_str().unwrap()
        ))
        .await,
    )
    .await;
    assert_eq!(body["drivers"][0]["driver_id"], driver["id"]);
}

#[tokio::test]
async fn test_create_driver_skips_unknown_zone() {
    let app = spawn_app().await;

    let response = app
        .post(
            "/api/v1/drivers",
            json!({
                "name": "Reem",
                "phone": "+966500000021",
                "zone_ids": [Uuid::new_v4()]
            }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_response_body(response).await;
    assert_eq!(body["driver"]["zones"], json!([]));
}

#[tokio::test]
async fn test_list_drivers_includes_zones() {
    let app = spawn_app().await;
    let zone = app.create_zone("Hittin", point(24.76, 46.60)).await;
    let driver = app.create_driver("Majed", "+966500000022").await;
    app.post(
        &format!("/api/v1/zones/{}/drivers", zone["id"].as_str().unwrap()),
        json!({ "driver_id": driver["id"] }),
    )
    .await;

    let response = app.get("/api/v1/drivers").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = parse_response_body(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["drivers"][0]["id"], driver["id"]);
    assert_eq!(body["drivers"][0]["zones"][0]["id"], zone["id"]);
}

#[tokio::test]
async fn test_create_driver_requires_name() {
    let app = spawn_app().await;

    let response = app
        .post("/api/v1/drivers", json!({ "phone": "+966500000023" }))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_field(&parse_response_body(response).await), "name");
}

#[tokio::test]
async fn test_create_driver_rejects_short_password() {
    let app = spawn_app().await;

    let response = app
        .post(
            "/api/v1/drivers",
            json!({ "name": "Tariq", "phone": "+966500000024", "password": "abc" }),
        )
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_field(&parse_response_body(response).await), "password");
}
