//! Posting and listing sighting comments.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use petwatch_core::error::AppError;
use petwatch_core::traits::Clock;
use petwatch_core::types::{CommentId, SightingId};
use petwatch_database::store::{CommentStore, SightingStore};
use petwatch_entity::comment::{Comment, CommentDetails};

use crate::context::RequestContext;

/// Longest comment body, in characters.
pub const COMMENT_MAX_LEN: usize = 2000;

/// A new comment as posted by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDraft {
    /// Comment text.
    pub body: String,
    /// Comment being replied to, if any.
    pub parent_id: Option<CommentId>,
}

/// Lets anyone read a sighting's comment thread and signed-in users add to it.
#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentStore>,
    sightings: Arc<dyn SightingStore>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for CommentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommentService").finish_non_exhaustive()
    }
}

impl CommentService {
    /// Creates a new comment service.
    pub fn new(
        comments: Arc<dyn CommentStore>,
        sightings: Arc<dyn SightingStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            comments,
            sightings,
            clock,
        }
    }

    /// Comments on a sighting, oldest first.
    pub async fn list_comments(
        &self,
        sighting_id: SightingId,
    ) -> Result<Vec<CommentDetails>, AppError> {
        self.require_sighting(sighting_id).await?;
        self.comments.list_for_sighting(sighting_id).await
    }

    /// Posts a comment as the caller.
    pub async fn add_comment(
        &self,
        ctx: &RequestContext,
        sighting_id: SightingId,
        draft: CommentDraft,
    ) -> Result<CommentDetails, AppError> {
        let body = draft.body.trim();
        if body.is_empty() {
            return Err(AppError::invalid_field("body", "must not be empty"));
        }
        if body.chars().count() > COMMENT_MAX_LEN {
            return Err(AppError::invalid_field(
                "body",
                format!("must be at most {COMMENT_MAX_LEN} characters"),
            ));
        }
        self.require_sighting(sighting_id).await?;

        if let Some(parent_id) = draft.parent_id {
            let parent = self.comments.find_comment(parent_id).await?;
            if parent.is_none_or(|p| p.sighting_id != sighting_id) {
                return Err(AppError::invalid_field(
                    "parent_id",
                    "must be a comment on the same sighting",
                ));
            }
        }

        let comment = Comment {
            id: CommentId::new(),
            sighting_id,
            user_id: ctx.user_id,
            parent_id: draft.parent_id,
            body: body.to_string(),
            created_at: self.clock.now(),
        };
        let saved = self.comments.insert_comment(&comment).await?;
        info!(
            comment_id = %saved.comment.id,
            sighting_id = %sighting_id,
            user_id = %ctx.user_id,
            "Comment added"
        );
        Ok(saved)
    }

    async fn require_sighting(&self, id: SightingId) -> Result<(), AppError> {
        match self.sightings.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::not_found(format!("Sighting {id} not found"))),
        }
    }
}
