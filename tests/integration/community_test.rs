//! Integration tests for contact details and comment threads.

mod helpers;

use axum::http::{Method, StatusCode};
use serde_json::json;

use petwatch_core::traits::Clock;

use helpers::{TestApp, user};

#[tokio::test]
async fn test_profile_starts_empty_and_updates() {
    let app = TestApp::new();
    let owner = user();
    let token = app.token(owner);

    let (status, json) = app.get("/api/users/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["user_id"], owner.to_string());
    assert!(json["data"]["phone"].is_null());

    let (status, json) = app
        .put(
            "/api/users/me",
            json!({ "display_name": "Ana", "phone": "+54 11 5555 0000" }),
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{json}");
    assert_eq!(json["data"]["display_name"], "Ana");

    // Blank clears, absent keeps.
    let (_, json) = app.put("/api/users/me", json!({ "phone": "" }), &token).await;
    assert!(json["data"]["phone"].is_null());
    assert_eq!(json["data"]["display_name"], "Ana");
}

#[tokio::test]
async fn test_request_time_follows_app_clock() {
    let app = TestApp::new();
    app.advance(7 * 86_400);
    let token = app.token(user());

    // An unset profile is stamped with the request time.
    let (_, json) = app.get("/api/users/me", &token).await;
    let expected = serde_json::to_value(app.clock.now()).unwrap_or_default();
    assert_eq!(json["data"]["updated_at"], expected);
}

#[tokio::test]
async fn test_profile_update_is_validated() {
    let app = TestApp::new();
    let token = app.token(user());

    let (status, json) = app.put("/api/users/me", json!({}), &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "VALIDATION_ERROR");

    let (status, json) = app
        .put("/api/users/me", json!({ "phone": "call me maybe" }), &token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["details"]["field"], "phone");

    let (status, _) = app
        .request(Method::PUT, "/api/users/me", Some(json!({ "phone": "12345678" })), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_sighting_reads_show_reporter_contact() {
    let app = TestApp::new();
    let token = app.token(user());
    app.put(
        "/api/users/me",
        json!({ "display_name": "Ana", "phone": "+54 11 5555 0000" }),
        &token,
    )
    .await;
    let (_, created) = app.submit_sighting(&token, 5.0, 5.0).await;
    let id = created["data"]["id"].as_str().unwrap_or_default().to_string();

    let (_, json) = app
        .request(Method::GET, &format!("/api/sightings/{id}"), None, None)
        .await;
    assert_eq!(json["data"]["id"], id);
    assert_eq!(json["data"]["user_display_name"], "Ana");
    assert_eq!(json["data"]["user_phone"], "+54 11 5555 0000");

    let (_, json) = app.request(Method::GET, "/api/sightings", None, None).await;
    assert_eq!(json["data"]["items"][0]["user_phone"], "+54 11 5555 0000");

    let (_, json) = app
        .request(Method::GET, "/api/sightings/latest", None, None)
        .await;
    assert_eq!(json["data"][0]["user_display_name"], "Ana");

    let (_, json) = app.get("/api/sightings/mine", &token).await;
    assert_eq!(json["data"][0]["user_display_name"], "Ana");
}

#[tokio::test]
async fn test_comment_thread() {
    let app = TestApp::new();
    let (_, created) = app.submit_sighting(&app.token(user()), 5.0, 5.0).await;
    let path = format!(
        "/api/sightings/{}/comments",
        created["data"]["id"].as_str().unwrap_or_default()
    );

    let ana = app.token(user());
    app.put("/api/users/me", json!({ "display_name": "Ana" }), &ana)
        .await;
    let (status, first) = app
        .post(&path, json!({ "body": "Saw it near the bakery" }), &ana)
        .await;
    assert_eq!(status, StatusCode::CREATED, "{first}");
    assert_eq!(first["data"]["user_display_name"], "Ana");

    app.advance(60);
    let (status, _) = app
        .post(
            &path,
            json!({ "body": "Thanks!", "parent_id": first["data"]["id"] }),
            &app.token(user()),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // Threads are public and oldest first.
    let (status, json) = app.request(Method::GET, &path, None, None).await;
    assert_eq!(status, StatusCode::OK);
    let bodies: Vec<&str> = json["data"]
        .as_array()
        .map(|c| c.iter().filter_map(|c| c["body"].as_str()).collect())
        .unwrap_or_default();
    assert_eq!(bodies, ["Saw it near the bakery", "Thanks!"]);
    assert_eq!(json["data"][1]["parent_id"], first["data"]["id"]);
}

#[tokio::test]
async fn test_comment_rules() {
    let app = TestApp::new();
    let token = app.token(user());
    let (_, created) = app.submit_sighting(&token, 5.0, 5.0).await;
    let id = created["data"]["id"].as_str().unwrap_or_default().to_string();
    let path = format!("/api/sightings/{id}/comments");

    let (status, _) = app
        .request(Method::POST, &path, Some(json!({ "body": "hi" })), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, json) = app.post(&path, json!({ "body": "   " }), &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["details"]["field"], "body");

    let missing = format!("/api/sightings/{}/comments", uuid::Uuid::new_v4());
    let (status, _) = app.post(&missing, json!({ "body": "hi" }), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Deleting the sighting takes its thread with it.
    app.post(&path, json!({ "body": "Found him!" }), &token).await;
    app.delete(&format!("/api/sightings/{id}"), &token).await;
    let (status, _) = app.request(Method::GET, &path, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
