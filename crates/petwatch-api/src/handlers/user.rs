//! Caller profile handlers.

use axum::Json;
use axum::extract::State;

use petwatch_entity::user::UserProfile;

use crate::dto::request::UpdateProfileRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/users/me
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state.user_service.get_profile(&auth).await?;
    Ok(Json(ApiResponse::ok(profile)))
}

/// PUT /api/users/me
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ApiResponse<UserProfile>>, ApiError> {
    let profile = state
        .user_service
        .update_profile(&auth, req.into())
        .await?;
    Ok(Json(ApiResponse::ok(profile)))
}
