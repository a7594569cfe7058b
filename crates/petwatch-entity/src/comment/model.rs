//! Comment entity model.

use chrono::{DateTime, Utc};
use petwatch_core::types::{CommentId, SightingId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::user::UserProfile;

/// A public comment on a sighting, optionally replying to another one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Comment {
    /// Unique comment identifier.
    pub id: CommentId,
    /// The sighting commented on.
    pub sighting_id: SightingId,
    /// The author.
    pub user_id: UserId,
    /// The comment this one replies to, on the same sighting.
    pub parent_id: Option<CommentId>,
    /// Comment text.
    pub body: String,
    /// When it was posted.
    pub created_at: DateTime<Utc>,
}

/// A comment with its author's display name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CommentDetails {
    /// The comment itself.
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub comment: Comment,
    /// Author's display name, if set.
    pub user_display_name: Option<String>,
}

impl CommentDetails {
    /// Join `comment` with its author's profile, if they have one.
    pub fn new(comment: Comment, profile: Option<&UserProfile>) -> Self {
        Self {
            comment,
            user_display_name: profile.and_then(|p| p.display_name.clone()),
        }
    }
}
