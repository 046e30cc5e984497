//! Integration tests for warehouse registration and zone snapshotting.

mod common;

use axum::http::StatusCode;
use common::{error_field, parse_response_body, point, spawn_app, TestApp};
use serde_json::{json, Value};

fn warehouse_body(lat: Value, lng: Value) -> Value {
    json!({
        "name": "Central Depot",
        "address": "King Fahd Rd",
        "city": "Riyadh",
        "latitude": lat,
        "longitude": lng
    })
}

async fn seed_cities(app: &TestApp) -> (Value, Value) {
    let riyadh = app.create_zone("Riyadh", point(24.7, 46.6)).await;
    let jeddah = app.create_zone("Jeddah", point(21.5, 39.2)).await;
    (riyadh, jeddah)
}

#[tokio::test]
async fn test_create_warehouse_assigns_nearest_zone() {
    let app = spawn_app().await;
    let (riyadh, _) = seed_cities(&app).await;

    let response = app
        .post(
            "/api/v1/warehouses",
            warehouse_body(json!(24.71), json!(46.68)),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_response_body(response).await;
    let warehouse = &body["warehouse"];
    assert_eq!(warehouse["assigned_zone_id"], riyadh["id"]);
    assert_eq!(warehouse["zone"]["name"], "Riyadh");
    assert_eq!(warehouse["capacity"], 100);
    assert_eq!(warehouse["country"], "Saudi Arabia");
    assert_eq!(warehouse["warehouse_type"], "standard");
    assert!(body["message"].as_str().unwrap().contains("Riyadh"));
}

#[tokio::test]
async fn test_create_warehouse_without_zones_is_unassigned() {
    let app = spawn_app().await;

    let response = app
        .post(
            "/api/v1/warehouses",
            warehouse_body(json!(24.71), json!(46.68)),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_response_body(response).await;
    assert!(body["warehouse"]["assigned_zone_id"].is_null());
    assert!(body["warehouse"]["zone"].is_null());
}

#[tokio::test]
async fn test_create_warehouse_accepts_string_coordinates() {
    let app = spawn_app().await;
    let (_, jeddah) = seed_cities(&app).await;

    let response = app
        .post(
            "/api/v1/warehouses",
            warehouse_body(json!("21.54"), json!(" 39.17 ")),
        )
        .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_response_body(response).await;
    assert_eq!(body["warehouse"]["latitude"], 21.54);
    assert_eq!(body["warehouse"]["assigned_zone_id"], jeddah["id"]);
}

#[tokio::test]
async fn test_create_warehouse_rejects_invalid_latitude() {
    let app = spawn_app().await;

    let response = app
        .post("/api/v1/warehouses", warehouse_body(json!(91.0), json!(46.6)))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_field(&parse_response_body(response).await), "latitude");

    let response = app
        .post(
            "/api/v1/warehouses",
            warehouse_body(json!("north"), json!(46.6)),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_field(&parse_response_body(response).await), "latitude");
}

#[tokio::test]
async fn test_create_warehouse_rejects_unknown_type() {
    let app = spawn_app().await;
    let mut body = warehouse_body(json!(24.7), json!(46.6));
    body["warehouse_type"] = json!("megastore");

    let response = app.post("/api/v1/warehouses", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        error_field(&parse_response_body(response).await),
        "warehouse_type"
    );
}

#[tokio::test]
async fn test_create_warehouse_requires_name() {
    let app = spawn_app().await;
    let mut body = warehouse_body(json!(24.7), json!(46.6));
    body["name"] = json!("   ");

    let response = app.post("/api/v1/warehouses", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_field(&parse_response_body(response).await), "name");
}

#[tokio::test]
async fn test_create_warehouse_keeps_optional_fields() {
    let app = spawn_app().await;
    let mut body = warehouse_body(json!(24.7), json!(46.6));
    body["capacity"] = json!(250);
    body["warehouse_type"] = json!("distribution_center");
    body["working_hours"] = json!({ "sun": "08:00-17:00" });
    body["manager_name"] = json!("Huda");

    let response = app.post("/api/v1/warehouses", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = parse_response_body(response).await;
    let warehouse = &body["warehouse"];
    assert_eq!(warehouse["capacity"], 250);
    assert_eq!(warehouse["warehouse_type"], "distribution_center");
    assert_eq!(warehouse["working_hours"]["sun"], "08:00-17:00");
    assert_eq!(warehouse["manager_name"], "Huda");
}

#[tokio::test]
async fn test_zone_assignment_is_a_snapshot() {
    let app = spawn_app().await;
    let (riyadh, _) = seed_cities(&app).await;

    let created = parse_response_body(
        app.post(
            "/api/v1/warehouses",
            warehouse_body(json!(24.71), json!(46.68)),
        )
        .await,
    )
    .await;
    assert_eq!(created["warehouse"]["assigned_zone_id"], riyadh["id"]);

    // A closer zone created later does not move the warehouse.
    app.create_zone("Olaya", point(24.71, 46.68)).await;
    let body = parse_response_body(app.get("/api/v1/warehouses").await).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["warehouses"][0]["assigned_zone_id"], riyadh["id"]);
    assert_eq!(body["warehouses"][0]["zone"]["name"], "Riyadh");
}

#[tokio::test]
async fn test_deleted_zone_reads_as_no_zone() {
    let app = spawn_app().await;
    let (riyadh, _) = seed_cities(&app).await;
    app.post(
        "/api/v1/warehouses",
        warehouse_body(json!(24.71), json!(46.68)),
    )
    .await;

    app.delete(&format!("/api/v1/zones/{}", riyadh["id"].as_str().unwrap()))
        .await;

    let body = parse_response_body(app.get("/api/v1/warehouses").await).await;
    let warehouse = &body["warehouses"][0];
    assert_eq!(warehouse["assigned_zone_id"], riyadh["id"]);
    assert!(warehouse["zone"].is_null());
}

#[tokio::test]
async fn test_create_warehouse_boolean_latitude_names_field() {
    let app = spawn_app().await;

    let response = app
        .post("/api/v1/warehouses", warehouse_body(json!(true), json!(46.6)))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(error_field(&body), "latitude");
}
