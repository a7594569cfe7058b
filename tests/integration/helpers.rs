//! Shared test helpers for integration tests.
//!
//! The app runs against the in-memory stores with a manual clock, so tests
//! drive the outbox worker explicitly through [`TestApp::run_jobs`].

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::Value;
use tower::ServiceExt;

use petwatch_api::AppState;
use petwatch_auth::{Claims, JwtDecoder};
use petwatch_core::config::AppConfig;
use petwatch_core::traits::{Clock, ManualClock};
use petwatch_core::types::UserId;
use petwatch_database::MemoryStore;
use petwatch_entity::push::{PushMessage, PushSubscription};
use petwatch_push::{PushOutcome, PushTransport};
use petwatch_service::{
    CommentService, NotificationService, Notifier, PushSubscriptionService, SightingService,
    UserProfileService, ZoneMatcher, ZoneService,
};
use petwatch_worker::jobs::{JobCleanupHandler, PushDeliveryJobHandler, SightingMatchJobHandler};
use petwatch_worker::{JobExecutor, JobQueue, WorkerRunner};

const TEST_SECRET: &str = "integration-test-secret";

/// Push transport that records every message. Endpoints containing
/// `"gone"` answer as expired, endpoints containing `"broken"` fail.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(String, PushMessage)>>,
}

impl RecordingTransport {
    /// Messages delivered so far, with their endpoint.
    pub fn sent(&self) -> Vec<(String, PushMessage)> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl PushTransport for RecordingTransport {
    async fn send(&self, subscription: &PushSubscription, message: &PushMessage) -> PushOutcome {
        if subscription.endpoint.contains("gone") {
            return PushOutcome::Gone;
        }
        if subscription.endpoint.contains("broken") {
            return PushOutcome::Failed("connection reset".to_string());
        }
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((subscription.endpoint.clone(), message.clone()));
        }
        PushOutcome::Delivered
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Backing store for direct inspection
    pub store: Arc<MemoryStore>,
    /// Clock shared by every service
    pub clock: Arc<ManualClock>,
    /// Push messages sent by the worker
    pub transport: Arc<RecordingTransport>,
    /// Application config
    pub config: AppConfig,
    runner: WorkerRunner,
}

impl TestApp {
    /// Create a new test application with default settings
    pub fn new() -> Self {
        Self::with_config(|_| {})
    }

    /// Create a new test application, adjusting the config first
    pub fn with_config(adjust: impl FnOnce(&mut AppConfig)) -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = TEST_SECRET.to_string();
        config.notifications.public_base_url = "https://petwatch.test".to_string();
        adjust(&mut config);

        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let transport = Arc::new(RecordingTransport::default());
        let max_attempts = config.worker.max_attempts;

        let sighting_service = Arc::new(SightingService::new(
            store.clone(),
            clock.clone(),
            config.ingest.clone(),
            max_attempts,
        ));
        let notifier = Notifier::new(
            store.clone(),
            store.clone(),
            store.clone(),
            transport.clone(),
            clock.clone(),
            config.notifications.clone(),
            max_attempts,
        );

        let queue = Arc::new(JobQueue::new(
            store.clone(),
            clock.clone(),
            "worker-test".to_string(),
            config.worker.clone(),
        ));
        let mut executor = JobExecutor::new();
        executor.register(Arc::new(SightingMatchJobHandler::new(
            store.clone(),
            ZoneMatcher::new(store.clone()),
            notifier.clone(),
            clock.clone(),
        )));
        executor.register(Arc::new(PushDeliveryJobHandler::new(notifier)));
        executor.register(Arc::new(JobCleanupHandler::new(
            store.clone(),
            clock.clone(),
            &config.worker,
        )));
        let runner = WorkerRunner::new(queue, Arc::new(executor), config.worker.clone());

        let state = AppState {
            config: Arc::new(config.clone()),
            clock: clock.clone(),
            jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
            sighting_service,
            comment_service: Arc::new(CommentService::new(
                store.clone(),
                store.clone(),
                clock.clone(),
            )),
            user_service: Arc::new(UserProfileService::new(store.clone(), clock.clone())),
            zone_service: Arc::new(ZoneService::new(store.clone(), clock.clone())),
            notification_service: Arc::new(NotificationService::new(
                store.clone(),
                clock.clone(),
            )),
            push_service: Arc::new(PushSubscriptionService::new(store.clone(), clock.clone())),
            started_at: Instant::now(),
        };

        Self {
            router: petwatch_api::build_router(state),
            store,
            clock,
            transport,
            config,
            runner,
        }
    }

    /// Run every due outbox job, repeating until the queue is drained.
    pub async fn run_jobs(&self) -> usize {
        let mut total = 0;
        loop {
            let ran = self.runner.run_pending().await.expect("run jobs");
            if ran == 0 {
                return total;
            }
            total += ran;
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, seconds: i64) {
        self.clock.advance(Duration::seconds(seconds));
    }

    /// Issue a bearer token for `user`.
    pub fn token(&self, user: UserId) -> String {
        let claims = Claims {
            sub: user,
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
            iat: Some(Utc::now().timestamp()),
            aud: None,
            email: None,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .expect("encode token")
    }

    /// Send a request and return status and parsed JSON body (`Null` when empty).
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("send request");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }

    /// GET with a token.
    pub async fn get(&self, path: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::GET, path, None, Some(token)).await
    }

    /// POST a JSON body with a token.
    pub async fn post(&self, path: &str, body: Value, token: &str) -> (StatusCode, Value) {
        self.request(Method::POST, path, Some(body), Some(token)).await
    }

    /// PUT a JSON body with a token.
    pub async fn put(&self, path: &str, body: Value, token: &str) -> (StatusCode, Value) {
        self.request(Method::PUT, path, Some(body), Some(token)).await
    }

    /// DELETE with a token.
    pub async fn delete(&self, path: &str, token: &str) -> (StatusCode, Value) {
        self.request(Method::DELETE, path, None, Some(token)).await
    }

    /// Create a square zone of half-width `half` degrees around a point.
    pub async fn create_square_zone(
        &self,
        token: &str,
        name: &str,
        lat: f64,
        lng: f64,
        half: f64,
    ) -> Value {
        let body = serde_json::json!({
            "name": name,
            "polygon": [
                [lat - half, lng - half],
                [lat - half, lng + half],
                [lat + half, lng + half],
                [lat + half, lng - half],
            ],
        });
        let (status, json) = self.post("/api/zones", body, token).await;
        assert_eq!(status, StatusCode::CREATED, "create zone: {json}");
        json["data"].clone()
    }

    /// Submit a lost-dog sighting at a point.
    pub async fn submit_sighting(&self, token: &str, lat: f64, lng: f64) -> (StatusCode, Value) {
        self.post("/api/sightings", sighting_body(lat, lng), token)
            .await
    }
}

/// A valid sighting submission body.
pub fn sighting_body(lat: f64, lng: f64) -> Value {
    serde_json::json!({
        "latitude": lat,
        "longitude": lng,
        "category": "dog",
        "breed": "Labrador",
        "color": "black",
        "description": "Black lab with a red collar near the park",
        "status": "lost",
    })
}

/// A fresh user ID.
pub fn user() -> UserId {
    UserId::new()
}
