//! Comment handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use petwatch_core::types::SightingId;
use petwatch_entity::comment::CommentDetails;

use crate::dto::request::CreateCommentRequest;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::{AuthUser, IdPath, ValidatedJson};
use crate::state::AppState;

/// GET /api/sightings/{id}/comments
pub async fn list_comments(
    State(state): State<AppState>,
    IdPath(id): IdPath<SightingId>,
) -> Result<Json<ApiResponse<Vec<CommentDetails>>>, ApiError> {
    let comments = state.comment_service.list_comments(id).await?;
    Ok(Json(ApiResponse::ok(comments)))
}

/// POST /api/sightings/{id}/comments
pub async fn add_comment(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath<SightingId>,
    ValidatedJson(req): ValidatedJson<CreateCommentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CommentDetails>>), ApiError> {
    let comment = state
        .comment_service
        .add_comment(&auth, id, req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(comment))))
}
