//! Alert zone handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use petwatch_core::types::ZoneId;

use crate::dto::request::CreateZoneRequest;
use crate::dto::response::{ApiResponse, ZoneResponse};
use crate::error::ApiError;
use crate::extractors::{AuthUser, IdPath, ValidatedJson};
use crate::state::AppState;

/// GET /api/zones
pub async fn list_zones(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<ZoneResponse>>>, ApiError> {
    let zones = state.zone_service.list_zones(&auth).await?;
    Ok(Json(ApiResponse::ok(
        zones.into_iter().map(ZoneResponse::from).collect(),
    )))
}

/// POST /api/zones
pub async fn create_zone(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateZoneRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ZoneResponse>>), ApiError> {
    let zone = state
        .zone_service
        .create_zone(&auth, &req.name, req.vertices())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(zone.into()))))
}

/// GET /api/zones/{id}
pub async fn get_zone(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath<ZoneId>,
) -> Result<Json<ApiResponse<ZoneResponse>>, ApiError> {
    let zone = state.zone_service.get_zone(&auth, id).await?;
    Ok(Json(ApiResponse::ok(zone.into())))
}

/// DELETE /api/zones/{id}
pub async fn delete_zone(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath<ZoneId>,
) -> Result<StatusCode, ApiError> {
    state.zone_service.delete_zone(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
