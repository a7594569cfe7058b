//! Push subscription handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use petwatch_entity::push::PushSubscription;

use crate::dto::request::{SubscribeRequest, UnsubscribeRequest};
use crate::dto::response::{ApiResponse, RemovedResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/push/subscriptions
pub async fn list_subscriptions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<PushSubscription>>>, ApiError> {
    let subscriptions = state.push_service.list(&auth).await?;
    Ok(Json(ApiResponse::ok(subscriptions)))
}

/// POST /api/push/subscriptions
pub async fn subscribe(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<SubscribeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PushSubscription>>), ApiError> {
    let subscription = state
        .push_service
        .subscribe(&auth, &req.endpoint, req.keys.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(subscription))))
}

/// DELETE /api/push/subscriptions
pub async fn unsubscribe(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UnsubscribeRequest>,
) -> Result<Json<ApiResponse<RemovedResponse>>, ApiError> {
    let removed = state.push_service.unsubscribe(&auth, &req.endpoint).await?;
    Ok(Json(ApiResponse::ok(RemovedResponse { removed })))
}
