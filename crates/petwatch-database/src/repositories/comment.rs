//! Comment repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use petwatch_core::error::{AppError, ErrorKind};
use petwatch_core::result::AppResult;
use petwatch_core::types::{CommentId, SightingId};
use petwatch_entity::comment::{Comment, CommentDetails};

use crate::store::CommentStore;

/// Repository for sighting comments.
#[derive(Debug, Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    /// Create a new comment repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, message, e)
}

#[async_trait]
impl CommentStore for CommentRepository {
    async fn insert_comment(&self, comment: &Comment) -> AppResult<CommentDetails> {
        sqlx::query_as::<_, CommentDetails>(
            "WITH inserted AS ( \
                 INSERT INTO comments (id, sighting_id, user_id, parent_id, body, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6) RETURNING * \
             ) \
             SELECT i.*, p.display_name AS user_display_name \
             FROM inserted i LEFT JOIN user_profiles p ON p.user_id = i.user_id",
        )
        .bind(comment.id)
        .bind(comment.sighting_id)
        .bind(comment.user_id)
        .bind(comment.parent_id)
        .bind(&comment.body)
        .bind(comment.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            // The sighting was deleted after the caller looked it up.
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                AppError::not_found(format!("Sighting {} not found", comment.sighting_id))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to insert comment", e),
        })
    }

    async fn find_comment(&self, id: CommentId) -> AppResult<Option<Comment>> {
        sqlx::query_as::<_, Comment>("SELECT * FROM comments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find comment"))
    }

    async fn list_for_sighting(&self, sighting_id: SightingId) -> AppResult<Vec<CommentDetails>> {
        sqlx::query_as::<_, CommentDetails>(
            "SELECT c.*, p.display_name AS user_display_name \
             FROM comments c LEFT JOIN user_profiles p ON p.user_id = c.user_id \
             WHERE c.sighting_id = $1 ORDER BY c.created_at ASC, c.id ASC",
        )
        .bind(sighting_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err("Failed to list comments"))
    }
}
