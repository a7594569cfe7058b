//! Request context carrying the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use petwatch_core::types::UserId;

/// Context for the current authenticated request.
///
/// Built by the API layer from a verified bearer token and passed into
/// service methods so that every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context for `user_id` received at `request_time`.
    ///
    /// The time comes from the caller's [`Clock`](petwatch_core::traits::Clock)
    /// so that tests driving a manual clock see consistent timestamps.
    pub fn new(user_id: UserId, request_time: DateTime<Utc>) -> Self {
        Self {
            user_id,
            request_time,
        }
    }

    /// Whether the caller owns a resource owned by `owner`.
    pub fn owns(&self, owner: UserId) -> bool {
        self.user_id == owner
    }
}
