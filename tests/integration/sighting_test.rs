//! Integration tests for sighting ingest, edits, and public listings.

mod helpers;

use axum::http::{Method, StatusCode};
use serde_json::json;

use helpers::{TestApp, sighting_body, user};

#[tokio::test]
async fn test_submit_sighting_returns_created() {
    let app = TestApp::new();
    let owner = user();
    let token = app.token(owner);

    let (status, body) = app.submit_sighting(&token, -34.601, -58.381).await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["user_id"], owner.to_string());
    assert_eq!(body["data"]["status"], "lost");
    assert_eq!(body["data"]["category"], "dog");
}

#[tokio::test]
async fn test_second_submission_within_window_is_rate_limited() {
    let app = TestApp::new();
    let token = app.token(user());

    let (status, _) = app.submit_sighting(&token, -34.601, -58.381).await;
    assert_eq!(status, StatusCode::CREATED);

    app.advance(60);
    let (status, body) = app.submit_sighting(&token, -34.602, -58.382).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"], "RATE_LIMITED");
    assert_eq!(body["details"]["retry_after_seconds"], 86_340);
}

#[tokio::test]
async fn test_quota_frees_up_after_window() {
    let app = TestApp::new();
    let token = app.token(user());

    let (status, _) = app.submit_sighting(&token, 10.0, 10.0).await;
    assert_eq!(status, StatusCode::CREATED);

    app.advance(86_400);
    let (status, body) = app.submit_sighting(&token, 10.0, 10.0).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
}

#[tokio::test]
async fn test_rate_limit_is_per_user() {
    let app = TestApp::new();

    let (first, _) = app.submit_sighting(&app.token(user()), 1.0, 1.0).await;
    let (second, _) = app.submit_sighting(&app.token(user()), 1.0, 1.0).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CREATED);
}

#[tokio::test]
async fn test_unknown_field_is_rejected() {
    let app = TestApp::new();
    let token = app.token(user());
    let mut body = sighting_body(1.0, 1.0);
    body["reward"] = json!(100);

    let (status, json) = app.post("/api/sightings", body, &token).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_out_of_range_latitude_names_field() {
    let app = TestApp::new();
    let token = app.token(user());

    let (status, json) = app.submit_sighting(&token, 91.0, 0.0).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["details"]["field"], "latitude");

    // A rejected submission does not use up the quota.
    let (status, _) = app.submit_sighting(&token, 45.0, 0.0).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_submission_requires_token() {
    let app = TestApp::new();

    let (status, json) = app
        .request(
            Method::POST,
            "/api/sightings",
            Some(sighting_body(1.0, 1.0)),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "UNAUTHORIZED");

    let (status, _) = app
        .request(
            Method::POST,
            "/api/sightings",
            Some(sighting_body(1.0, 1.0)),
            Some("not-a-jwt"),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_public_reads_need_no_token() {
    let app = TestApp::new();
    let (_, created) = app.submit_sighting(&app.token(user()), 5.0, 5.0).await;
    let id = created["data"]["id"].as_str().unwrap_or_default().to_string();

    let (status, json) = app
        .request(Method::GET, &format!("/api/sightings/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id"], id);

    let (status, json) = app
        .request(Method::GET, "/api/sightings?status=lost&category=dog", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["total_items"], 1);

    let (status, json) = app
        .request(Method::GET, "/api/sightings?status=found", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["total_items"], 0);

    let (status, json) = app
        .request(Method::GET, "/api/sightings/latest", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_expired_sightings_leave_public_listings() {
    let app = TestApp::new();
    let token = app.token(user());
    app.submit_sighting(&token, 5.0, 5.0).await;

    app.advance(48 * 3600 + 1);

    let (_, latest) = app
        .request(Method::GET, "/api/sightings/latest", None, None)
        .await;
    assert_eq!(latest["data"].as_array().map(Vec::len), Some(0));

    // The owner still sees it.
    let (status, mine) = app.get("/api/sightings/mine", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["data"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_invalid_filter_is_rejected() {
    let app = TestApp::new();

    let (status, json) = app
        .request(Method::GET, "/api/sightings?status=stolen", None, None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_owner_can_move_status_forward_only() {
    let app = TestApp::new();
    let token = app.token(user());
    let (_, created) = app.submit_sighting(&token, 5.0, 5.0).await;
    let path = format!("/api/sightings/{}", created["data"]["id"].as_str().unwrap_or_default());

    let (status, json) = app.put(&path, json!({ "status": "in_transit" }), &token).await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["data"]["status"], "in_transit");

    let (status, _) = app.put(&path, json!({ "status": "found" }), &token).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = app.put(&path, json!({ "status": "lost" }), &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["details"]["field"], "status");
}

#[tokio::test]
async fn test_other_users_sighting_looks_missing() {
    let app = TestApp::new();
    let (_, created) = app.submit_sighting(&app.token(user()), 5.0, 5.0).await;
    let path = format!("/api/sightings/{}", created["data"]["id"].as_str().unwrap_or_default());
    let intruder = app.token(user());

    let (status, json) = app
        .put(&path, json!({ "description": "mine now" }), &intruder)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "NOT_FOUND");
    assert_eq!(json["message"], "Resource not found");

    let (status, _) = app.delete(&path, &intruder).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_sighting() {
    let app = TestApp::new();
    let token = app.token(user());
    let (_, created) = app.submit_sighting(&token, 5.0, 5.0).await;
    let path = format!("/api/sightings/{}", created["data"]["id"].as_str().unwrap_or_default());

    let (status, body) = app.delete(&path, &token).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = app.request(Method::GET, &path, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_id_is_a_validation_error() {
    let app = TestApp::new();

    let (status, json) = app
        .request(Method::GET, "/api/sightings/not-a-uuid", None, None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_search_near_ranks_by_distance() {
    let app = TestApp::new();
    let (_, close) = app.submit_sighting(&app.token(user()), -34.60, -58.38).await;
    app.advance(60);
    app.submit_sighting(&app.token(user()), -31.42, -64.18).await;

    let (_, json) = app.request(Method::GET, "/api/sightings", None, None).await;
    assert_ne!(json["data"]["items"][0]["id"], close["data"]["id"]);

    let (status, json) = app
        .request(Method::GET, "/api/sightings?near=-34.61,-58.39", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["items"][0]["id"], close["data"]["id"]);

    let (status, json) = app
        .request(Method::GET, "/api/sightings?near=somewhere", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["details"]["field"], "near");
}

#[tokio::test]
async fn test_owner_can_clear_optional_fields() {
    let app = TestApp::new();
    let token = app.token(user());
    let mut body = sighting_body(5.0, 5.0);
    body["photo_url"] = json!("https://img.test/dog.jpg");
    let (_, created) = app.post("/api/sightings", body, &token).await;
    let path = format!("/api/sightings/{}", created["data"]["id"].as_str().unwrap_or_default());

    let (status, json) = app
        .put(&path, json!({ "breed": "", "photo_url": "" }), &token)
        .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert!(json["data"]["breed"].is_null());
    assert!(json["data"]["photo_url"].is_null());
    assert_eq!(json["data"]["color"], "black");

    let (status, json) = app.put(&path, json!({ "photo_url": "ftp://x" }), &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["details"]["field"], "photo_url");
}
