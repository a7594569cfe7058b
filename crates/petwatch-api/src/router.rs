//! Route definitions for the PetWatch HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::middleware::cors::build_cors_layer;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let server = &state.config.server;
    let max_body = server.max_body_bytes;
    let timeout = Duration::from_secs(server.request_timeout_seconds.max(1));
    let cors = build_cors_layer(&server.cors);

    let api_routes = Router::new()
        .merge(sighting_routes())
        .merge(comment_routes())
        .merge(user_routes())
        .merge(zone_routes())
        .merge(notification_routes())
        .merge(push_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Sighting submission, search, and owner edits
fn sighting_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/sightings",
            get(handlers::sighting::search_sightings).post(handlers::sighting::submit_sighting),
        )
        .route("/sightings/latest", get(handlers::sighting::latest_sightings))
        .route("/sightings/mine", get(handlers::sighting::list_own_sightings))
        .route(
            "/sightings/{id}",
            get(handlers::sighting::get_sighting)
                .put(handlers::sighting::update_sighting)
                .delete(handlers::sighting::delete_sighting),
        )
}

/// Public comment threads on sightings
fn comment_routes() -> Router<AppState> {
    Router::new().route(
        "/sightings/{id}/comments",
        get(handlers::comment::list_comments).post(handlers::comment::add_comment),
    )
}

/// Contact details of the caller
fn user_routes() -> Router<AppState> {
    Router::new().route(
        "/users/me",
        get(handlers::user::get_profile).put(handlers::user::update_profile),
    )
}

/// Alert zones of the caller
fn zone_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/zones",
            get(handlers::zone::list_zones).post(handlers::zone::create_zone),
        )
        .route(
            "/zones/{id}",
            get(handlers::zone::get_zone).delete(handlers::zone::delete_zone),
        )
}

/// In-app notification inbox
fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notifications",
            get(handlers::notification::list_notifications),
        )
        .route(
            "/notifications/unread-count",
            get(handlers::notification::unread_count),
        )
        .route(
            "/notifications/read-all",
            put(handlers::notification::mark_all_read),
        )
        .route(
            "/notifications/{id}/read",
            put(handlers::notification::mark_read),
        )
}

/// Push subscription management
fn push_routes() -> Router<AppState> {
    Router::new().route(
        "/push/subscriptions",
        get(handlers::push::list_subscriptions)
            .post(handlers::push::subscribe)
            .delete(handlers::push::unsubscribe),
    )
}

/// Liveness check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
