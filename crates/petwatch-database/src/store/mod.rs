//! Store traits that services depend on.
//!
//! Each trait has a PostgreSQL implementation in [`crate::repositories`]
//! and an in-memory one in [`crate::memory`].

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use petwatch_core::config::RateLimitConfig;
use petwatch_core::result::AppResult;
use petwatch_core::types::{
    CommentId, JobId, NotificationId, PageRequest, PageResponse, SightingId, UserId, ZoneId,
};
use petwatch_entity::comment::{Comment, CommentDetails};
use petwatch_entity::geo::GeoPoint;
use petwatch_entity::job::{CreateJob, Job, JobStatus};
use petwatch_entity::notification::{CreateNotification, Notification};
use petwatch_entity::push::PushSubscription;
use petwatch_entity::sighting::{Sighting, SightingDetails, SightingFilter};
use petwatch_entity::user::UserProfile;
use petwatch_entity::zone::AlertZone;

/// Result of a rate-limited insert.
#[derive(Debug, Clone)]
pub enum InsertOutcome {
    /// The sighting was stored and its follow-up job enqueued.
    Inserted(Sighting),
    /// The user is over the limit.
    RateLimited {
        /// Seconds until the oldest counted submission leaves the window.
        retry_after_seconds: u64,
    },
}

/// Persistence for sightings.
#[async_trait]
pub trait SightingStore: Send + Sync + 'static {
    /// Atomically enforce the rolling-window limit for the sighting's
    /// owner, insert it, and enqueue `follow_up` in the same unit of work.
    ///
    /// The window ends at `sighting.created_at`. Concurrent calls for the
    /// same user are serialized.
    async fn insert_if_allowed(
        &self,
        sighting: &Sighting,
        limit: &RateLimitConfig,
        follow_up: &CreateJob,
    ) -> AppResult<InsertOutcome>;

    /// Find a sighting by ID.
    async fn find_by_id(&self, id: SightingId) -> AppResult<Option<Sighting>>;

    /// Find a sighting by ID, joined with its reporter's contact details.
    async fn find_details(&self, id: SightingId) -> AppResult<Option<SightingDetails>>;

    /// All sightings of a user, newest first, expired ones included.
    async fn find_by_user(&self, user_id: UserId) -> AppResult<Vec<SightingDetails>>;

    /// Sightings with `expires_at > now` passing `filter`. Nearest to
    /// `filter.near` first when given, otherwise newest first.
    async fn search_active(
        &self,
        filter: &SightingFilter,
        now: DateTime<Utc>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<SightingDetails>>;

    /// The most recent active sightings.
    async fn latest_active(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> AppResult<Vec<SightingDetails>>;

    /// Persist an edited sighting.
    async fn update(&self, sighting: &Sighting) -> AppResult<Sighting>;

    /// Hard-delete a sighting and everything hanging off it. Returns
    /// `true` if a row was removed.
    async fn delete(&self, id: SightingId) -> AppResult<bool>;
}

/// Persistence for user contact details.
#[async_trait]
pub trait UserProfileStore: Send + Sync + 'static {
    /// Insert or replace the profile for `profile.user_id`.
    async fn upsert_profile(&self, profile: &UserProfile) -> AppResult<UserProfile>;

    /// A user's profile, if they have set one.
    async fn find_profile(&self, user_id: UserId) -> AppResult<Option<UserProfile>>;
}

/// Persistence for sighting comments.
#[async_trait]
pub trait CommentStore: Send + Sync + 'static {
    /// Store a comment. Fails with `NotFound` when the sighting is gone.
    async fn insert_comment(&self, comment: &Comment) -> AppResult<CommentDetails>;

    /// Find a comment by ID.
    async fn find_comment(&self, id: CommentId) -> AppResult<Option<Comment>>;

    /// Comments on a sighting, oldest first.
    async fn list_for_sighting(&self, sighting_id: SightingId) -> AppResult<Vec<CommentDetails>>;
}

/// Persistence for alert zones.
#[async_trait]
pub trait ZoneStore: Send + Sync + 'static {
    /// Store a new zone.
    async fn insert(&self, zone: &AlertZone) -> AppResult<AlertZone>;

    /// Find a zone by ID.
    async fn find_by_id(&self, id: ZoneId) -> AppResult<Option<AlertZone>>;

    /// A user's zones in insertion order.
    async fn find_by_owner(&self, owner_id: UserId) -> AppResult<Vec<AlertZone>>;

    /// Zones whose bounding box contains `point`.
    async fn find_candidates(&self, point: &GeoPoint) -> AppResult<Vec<AlertZone>>;

    /// Delete a zone. Returns `true` if a row was removed.
    async fn delete(&self, id: ZoneId) -> AppResult<bool>;
}

/// Persistence for notifications.
#[async_trait]
pub trait NotificationStore: Send + Sync + 'static {
    /// Create the notification unless one already exists for the same
    /// recipient, sighting, and kind. Returns the stored row and whether
    /// it was newly created.
    async fn create_if_absent(
        &self,
        data: &CreateNotification,
        now: DateTime<Utc>,
    ) -> AppResult<(Notification, bool)>;

    /// Find a notification by ID.
    async fn find_by_id(&self, id: NotificationId) -> AppResult<Option<Notification>>;

    /// A user's notifications, newest first.
    async fn find_by_user(
        &self,
        user_id: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>>;

    /// Number of unread notifications for a user.
    async fn count_unread(&self, user_id: UserId) -> AppResult<u64>;

    /// Set the read flag. Already-read rows keep their original `read_at`.
    async fn mark_read(
        &self,
        id: NotificationId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Notification>>;

    /// Mark every unread notification of a user. Returns the number flipped.
    async fn mark_all_read(&self, user_id: UserId, now: DateTime<Utc>) -> AppResult<u64>;
}

/// Persistence for push subscriptions.
#[async_trait]
pub trait PushSubscriptionStore: Send + Sync + 'static {
    /// Insert or replace the subscription with the same endpoint.
    async fn upsert(&self, subscription: &PushSubscription) -> AppResult<PushSubscription>;

    /// A user's subscriptions.
    async fn find_by_user(&self, user_id: UserId) -> AppResult<Vec<PushSubscription>>;

    /// Delete the caller's subscription for `endpoint`, if any.
    async fn delete_for_user(&self, user_id: UserId, endpoint: &str) -> AppResult<bool>;

    /// Delete whichever subscription owns `endpoint`, if any.
    async fn delete_by_endpoint(&self, endpoint: &str) -> AppResult<bool>;
}

/// Durable job queue storage.
#[async_trait]
pub trait JobStore: Send + Sync + 'static {
    /// Enqueue a job. Returns `None` when a job with the same dedupe key
    /// already exists.
    async fn enqueue(&self, data: &CreateJob, now: DateTime<Utc>) -> AppResult<Option<Job>>;

    /// Claim the next due pending job from `queue`, incrementing its
    /// attempt counter.
    async fn dequeue(
        &self,
        queue: &str,
        worker_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Job>>;

    /// Find a job by ID.
    async fn find_by_id(&self, id: JobId) -> AppResult<Option<Job>>;

    /// Jobs in a given status, oldest first.
    async fn find_by_status(&self, status: JobStatus, limit: u64) -> AppResult<Vec<Job>>;

    /// Mark a job completed.
    async fn complete(&self, id: JobId, now: DateTime<Utc>) -> AppResult<()>;

    /// Put a job back to pending, due at `retry_at`.
    async fn reschedule(
        &self,
        id: JobId,
        error_message: &str,
        retry_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<()>;

    /// Mark a job failed for good.
    async fn fail(&self, id: JobId, error_message: &str, now: DateTime<Utc>) -> AppResult<()>;

    /// Return running jobs claimed before `started_before` to pending.
    async fn requeue_stale(
        &self,
        started_before: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Delete completed jobs last touched before `before`.
    async fn purge_completed(&self, before: DateTime<Utc>) -> AppResult<u64>;
}

/// Seconds until the oldest counted submission leaves the window,
/// rounded up, at least one.
pub fn retry_after_seconds(oldest: DateTime<Utc>, window_seconds: u64, now: DateTime<Utc>) -> u64 {
    let remaining = (oldest + window(window_seconds)) - now;
    let millis = remaining.num_milliseconds().max(0) as u64;
    millis.div_ceil(1000).max(1)
}

/// Start of the rolling window ending at `now`. Submissions strictly after
/// it are counted.
pub fn window_start(now: DateTime<Utc>, window_seconds: u64) -> DateTime<Utc> {
    now - window(window_seconds)
}

/// Longest window honoured; larger settings are clamped.
const MAX_WINDOW_SECONDS: u64 = 10 * 365 * 86_400;

fn window(window_seconds: u64) -> Duration {
    Duration::seconds(window_seconds.min(MAX_WINDOW_SECONDS) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_after_for_second_submission_a_minute_later() {
        let first = Utc::now();
        let now = first + Duration::seconds(60);
        assert_eq!(retry_after_seconds(first, 86_400, now), 86_340);
    }

    #[test]
    fn test_retry_after_rounds_up_and_is_positive() {
        let first = Utc::now();
        let now = first + Duration::milliseconds(86_399_500);
        assert_eq!(retry_after_seconds(first, 86_400, now), 1);
        assert_eq!(retry_after_seconds(first, 86_400, first + Duration::days(2)), 1);

        let now = first + Duration::milliseconds(1_500);
        assert_eq!(retry_after_seconds(first, 10, now), 9);
    }
}
