use async_trait::async_trait;

use petwatch_core::error::AppError;
use petwatch_core::result::AppResult;
use petwatch_core::types::{CommentId, SightingId};
use petwatch_entity::comment::{Comment, CommentDetails};

use super::MemoryStore;
use crate::store::CommentStore;

#[async_trait]
impl CommentStore for MemoryStore {
    async fn insert_comment(&self, comment: &Comment) -> AppResult<CommentDetails> {
        let mut state = self.state.write().await;
        if !state.sightings.iter().any(|s| s.id == comment.sighting_id) {
            return Err(AppError::not_found(format!(
                "Sighting {} not found",
                comment.sighting_id
            )));
        }
        state.comments.push(comment.clone());
        Ok(CommentDetails::new(
            comment.clone(),
            state.profile(comment.user_id),
        ))
    }

    async fn find_comment(&self, id: CommentId) -> AppResult<Option<Comment>> {
        let state = self.state.read().await;
        Ok(state.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn list_for_sighting(&self, sighting_id: SightingId) -> AppResult<Vec<CommentDetails>> {
        let state = self.state.read().await;
        let mut rows: Vec<&Comment> = state
            .comments
            .iter()
            .filter(|c| c.sighting_id == sighting_id)
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(rows
            .into_iter()
            .map(|c| CommentDetails::new(c.clone(), state.profile(c.user_id)))
            .collect())
    }
}
