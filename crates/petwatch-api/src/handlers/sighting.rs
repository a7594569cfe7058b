//! Sighting handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use petwatch_core::types::{PageResponse, SightingId};
use petwatch_entity::sighting::{Sighting, SightingDetails};

use crate::dto::request::{
    LatestQuery, SightingSearchQuery, SubmitSightingRequest, UpdateSightingRequest,
};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, IdPath, QueryParams, ValidatedJson};
use crate::state::AppState;

/// POST /api/sightings
pub async fn submit_sighting(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<SubmitSightingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Sighting>>), ApiError> {
    let sighting = state
        .sighting_service
        .submit_sighting(&auth, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(sighting))))
}

/// GET /api/sightings
pub async fn search_sightings(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<SightingSearchQuery>,
) -> Result<Json<ApiResponse<PageResponse<SightingDetails>>>, ApiError> {
    let (filter, page) = query.into_parts()?;
    let result = state.sighting_service.search(&filter, page).await?;
    Ok(Json(ApiResponse::ok(result)))
}

/// GET /api/sightings/latest
pub async fn latest_sightings(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<LatestQuery>,
) -> Result<Json<ApiResponse<Vec<SightingDetails>>>, ApiError> {
    let sightings = state.sighting_service.latest(query.limit).await?;
    Ok(Json(ApiResponse::ok(sightings)))
}

/// GET /api/sightings/mine
pub async fn list_own_sightings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<Vec<SightingDetails>>>, ApiError> {
    let sightings = state.sighting_service.list_own(&auth).await?;
    Ok(Json(ApiResponse::ok(sightings)))
}

/// GET /api/sightings/{id}
pub async fn get_sighting(
    State(state): State<AppState>,
    IdPath(id): IdPath<SightingId>,
) -> Result<Json<ApiResponse<SightingDetails>>, ApiError> {
    let sighting = state.sighting_service.get_sighting(id).await?;
    Ok(Json(ApiResponse::ok(sighting)))
}

/// PUT /api/sightings/{id}
pub async fn update_sighting(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath<SightingId>,
    ValidatedJson(req): ValidatedJson<UpdateSightingRequest>,
) -> Result<Json<ApiResponse<Sighting>>, ApiError> {
    let sighting = state
        .sighting_service
        .update_sighting(&auth, id, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(sighting)))
}

/// DELETE /api/sightings/{id}
pub async fn delete_sighting(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath<SightingId>,
) -> Result<StatusCode, ApiError> {
    state.sighting_service.delete_sighting(&auth, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
