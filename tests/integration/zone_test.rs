//! Integration tests for alert zone management.

mod helpers;

use axum::http::{Method, StatusCode};
use serde_json::json;

use helpers::{TestApp, user};

#[tokio::test]
async fn test_create_and_list_zones() {
    let app = TestApp::new();
    let owner = user();
    let token = app.token(owner);

    let zone = app
        .create_square_zone(&token, "Home", -34.60, -58.38, 0.01)
        .await;
    assert_eq!(zone["name"], "Home");
    assert_eq!(zone["owner_id"], owner.to_string());
    // Closed ring: first vertex repeated at the end.
    let ring = zone["polygon"].as_array().cloned().unwrap_or_default();
    assert_eq!(ring.len(), 5);
    assert_eq!(ring.first(), ring.last());

    app.create_square_zone(&token, "Work", -34.55, -58.45, 0.01)
        .await;

    let (status, json) = app.get("/api/zones", &token).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = json["data"]
        .as_array()
        .map(|zones| zones.iter().filter_map(|z| z["name"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(names, ["Home", "Work"]);

    // Zones are private.
    let (_, json) = app.get("/api/zones", &app.token(user())).await;
    assert_eq!(json["data"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_degenerate_polygon_is_rejected() {
    let app = TestApp::new();
    let token = app.token(user());

    let (status, json) = app
        .post(
            "/api/zones",
            json!({ "name": "Line", "polygon": [[1.0, 1.0], [2.0, 2.0], [1.0, 1.0]] }),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "INVALID_GEOMETRY");

    let (status, json) = app
        .post(
            "/api/zones",
            json!({ "name": "Off the map", "polygon": [[95.0, 1.0], [2.0, 2.0], [3.0, 1.0]] }),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "INVALID_GEOMETRY");
}

#[tokio::test]
async fn test_zone_body_rejects_unknown_fields() {
    let app = TestApp::new();
    let token = app.token(user());

    let (status, json) = app
        .post(
            "/api/zones",
            json!({
                "name": "Home",
                "polygon": [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0]],
                "radius": 500,
            }),
            &token,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_other_users_zone_looks_missing() {
    let app = TestApp::new();
    let token = app.token(user());
    let zone = app.create_square_zone(&token, "Home", 0.0, 0.0, 1.0).await;
    let path = format!("/api/zones/{}", zone["id"].as_str().unwrap_or_default());
    let intruder = app.token(user());

    let (status, json) = app.get(&path, &intruder).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Resource not found");

    let (status, _) = app.delete(&path, &intruder).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.get(&path, &token).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_zone() {
    let app = TestApp::new();
    let token = app.token(user());
    let zone = app.create_square_zone(&token, "Home", 0.0, 0.0, 1.0).await;
    let path = format!("/api/zones/{}", zone["id"].as_str().unwrap_or_default());

    let (status, _) = app.delete(&path, &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.get(&path, &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_zones_require_token() {
    let app = TestApp::new();

    let (status, _) = app.request(Method::GET, "/api/zones", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
