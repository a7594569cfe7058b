//! End-to-end tests: sighting ingest through zone matching to the
//! notification inbox and push delivery.

mod helpers;

use axum::http::StatusCode;
use serde_json::{Value, json};

use helpers::{TestApp, user};

fn items(json: &Value) -> Vec<Value> {
    json["data"]["items"].as_array().cloned().unwrap_or_default()
}

#[tokio::test]
async fn test_sighting_inside_zone_notifies_owner_once() {
    let app = TestApp::new();
    let alice = app.token(user());
    let bob = app.token(user());
    app.create_square_zone(&alice, "Home", -34.60, -58.38, 0.01)
        .await;

    let (status, created) = app.submit_sighting(&bob, -34.601, -58.381).await;
    assert_eq!(status, StatusCode::CREATED);
    let sighting_id = created["data"]["id"].as_str().unwrap_or_default().to_string();

    app.run_jobs().await;

    let (status, inbox) = app.get("/api/notifications", &alice).await;
    assert_eq!(status, StatusCode::OK);
    let notifications = items(&inbox);
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["sighting_id"], sighting_id);
    assert_eq!(notifications[0]["is_read"], false);
    assert!(
        notifications[0]["body"]
            .as_str()
            .unwrap_or_default()
            .contains("\"Home\"")
    );
    assert_eq!(
        notifications[0]["link_url"],
        format!("https://petwatch.test/sightings/{sighting_id}")
    );

    // The reporter gets nothing.
    let (_, inbox) = app.get("/api/notifications", &bob).await;
    assert!(items(&inbox).is_empty());

    // Running the worker again changes nothing.
    app.run_jobs().await;
    let (_, inbox) = app.get("/api/notifications", &alice).await;
    assert_eq!(items(&inbox).len(), 1);
}

#[tokio::test]
async fn test_sighting_outside_every_zone_notifies_nobody() {
    let app = TestApp::new();
    let alice = app.token(user());
    app.create_square_zone(&alice, "Home", -34.60, -58.38, 0.01)
        .await;

    app.submit_sighting(&app.token(user()), -50.0, 10.0).await;
    app.run_jobs().await;

    let (_, inbox) = app.get("/api/notifications", &alice).await;
    assert!(items(&inbox).is_empty());
    assert!(app.transport.sent().is_empty());
}

#[tokio::test]
async fn test_overlapping_zones_of_one_owner_yield_one_notification() {
    let app = TestApp::new();
    let alice = app.token(user());
    app.create_square_zone(&alice, "Block", 1.0, 1.0, 0.01).await;
    app.create_square_zone(&alice, "Neighbourhood", 1.0, 1.0, 0.1)
        .await;
    let carol = app.token(user());
    app.create_square_zone(&carol, "Commute", 1.0, 1.0, 0.5).await;

    app.submit_sighting(&app.token(user()), 1.001, 1.001).await;
    app.run_jobs().await;

    let (_, inbox) = app.get("/api/notifications", &alice).await;
    assert_eq!(items(&inbox).len(), 1);
    let (_, inbox) = app.get("/api/notifications", &carol).await;
    assert_eq!(items(&inbox).len(), 1);
}

#[tokio::test]
async fn test_own_sighting_in_own_zone_is_not_notified() {
    let app = TestApp::new();
    let alice = app.token(user());
    app.create_square_zone(&alice, "Home", 1.0, 1.0, 0.1).await;

    app.submit_sighting(&alice, 1.0, 1.0).await;
    app.run_jobs().await;

    let (_, inbox) = app.get("/api/notifications", &alice).await;
    assert!(items(&inbox).is_empty());
}

#[tokio::test]
async fn test_sighting_deleted_before_matching_notifies_nobody() {
    let app = TestApp::new();
    let alice = app.token(user());
    app.create_square_zone(&alice, "Home", 1.0, 1.0, 0.1).await;
    let bob = app.token(user());
    let (_, created) = app.submit_sighting(&bob, 1.0, 1.0).await;
    let path = format!("/api/sightings/{}", created["data"]["id"].as_str().unwrap_or_default());

    app.delete(&path, &bob).await;
    app.run_jobs().await;

    let (_, inbox) = app.get("/api/notifications", &alice).await;
    assert!(items(&inbox).is_empty());
}

#[tokio::test]
async fn test_read_flags() {
    let app = TestApp::new();
    let alice = app.token(user());
    app.create_square_zone(&alice, "Home", 1.0, 1.0, 0.1).await;
    app.submit_sighting(&app.token(user()), 1.0, 1.0).await;
    app.submit_sighting(&app.token(user()), 1.01, 1.01).await;
    app.run_jobs().await;

    let (_, count) = app.get("/api/notifications/unread-count", &alice).await;
    assert_eq!(count["data"]["count"], 2);

    let (_, inbox) = app.get("/api/notifications", &alice).await;
    let first = items(&inbox)[0]["id"].as_str().unwrap_or_default().to_string();
    let read_path = format!("/api/notifications/{first}/read");

    // Another user cannot touch it.
    let (status, _) = app.put(&read_path, json!({}), &app.token(user())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, json) = app.put(&read_path, json!({}), &alice).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["is_read"], true);

    let (_, count) = app.get("/api/notifications/unread-count", &alice).await;
    assert_eq!(count["data"]["count"], 1);

    let (status, json) = app
        .put("/api/notifications/read-all", json!({}), &alice)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["marked"], 1);

    let (_, count) = app.get("/api/notifications/unread-count", &alice).await;
    assert_eq!(count["data"]["count"], 0);
}

#[tokio::test]
async fn test_push_reaches_subscribed_devices() {
    let app = TestApp::new();
    let alice = app.token(user());
    let (status, _) = app
        .post(
            "/api/push/subscriptions",
            json!({
                "endpoint": "https://push.test/alice-phone",
                "keys": { "p256dh": "BNc-public-key", "auth": "auth-secret" },
            }),
            &alice,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    app.create_square_zone(&alice, "Home", 1.0, 1.0, 0.1).await;

    let (_, created) = app.submit_sighting(&app.token(user()), 1.0, 1.0).await;
    let sighting_id = created["data"]["id"].as_str().unwrap_or_default().to_string();
    app.run_jobs().await;

    let sent = app.transport.sent();
    assert_eq!(sent.len(), 1);
    let (endpoint, message) = &sent[0];
    assert_eq!(endpoint, "https://push.test/alice-phone");
    assert_eq!(message.title, app.config.notifications.title);
    assert_eq!(message.data.sighting_id.to_string(), sighting_id);
    assert_eq!(
        message.data.url,
        format!("https://petwatch.test/sightings/{sighting_id}")
    );
}

#[tokio::test]
async fn test_gone_endpoint_is_unsubscribed_and_notification_kept() {
    let app = TestApp::new();
    let alice = app.token(user());
    app.post(
        "/api/push/subscriptions",
        json!({
            "endpoint": "https://push.test/gone-tablet",
            "keys": { "p256dh": "BNc-public-key", "auth": "auth-secret" },
        }),
        &alice,
    )
    .await;
    app.create_square_zone(&alice, "Home", 1.0, 1.0, 0.1).await;

    app.submit_sighting(&app.token(user()), 1.0, 1.0).await;
    app.run_jobs().await;

    let (_, subs) = app.get("/api/push/subscriptions", &alice).await;
    assert_eq!(subs["data"].as_array().map(Vec::len), Some(0));

    let (_, inbox) = app.get("/api/notifications", &alice).await;
    assert_eq!(items(&inbox).len(), 1);
}

#[tokio::test]
async fn test_unsubscribe() {
    let app = TestApp::new();
    let alice = app.token(user());
    let subscription = json!({
        "endpoint": "https://push.test/alice-laptop",
        "keys": { "p256dh": "BNc-public-key", "auth": "auth-secret" },
    });
    app.post("/api/push/subscriptions", subscription, &alice)
        .await;

    let (status, json) = app
        .request(
            axum::http::Method::DELETE,
            "/api/push/subscriptions",
            Some(json!({ "endpoint": "https://push.test/alice-laptop" })),
            Some(&alice),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["removed"], true);

    let (_, subs) = app.get("/api/push/subscriptions", &alice).await;
    assert_eq!(subs["data"].as_array().map(Vec::len), Some(0));
}
