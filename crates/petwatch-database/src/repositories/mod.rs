//! PostgreSQL implementations of the store traits.

pub mod comment;
pub mod job;
pub mod notification;
pub mod push_subscription;
pub mod sighting;
pub mod user_profile;
pub mod zone;

use std::sync::Arc;

use sqlx::PgPool;

pub use comment::CommentRepository;
pub use job::JobRepository;
pub use notification::NotificationRepository;
pub use push_subscription::PushSubscriptionRepository;
pub use sighting::SightingRepository;
pub use user_profile::UserProfileRepository;
pub use zone::ZoneRepository;

/// All repositories sharing one pool.
#[derive(Debug, Clone)]
pub struct Repositories {
    /// Sighting repository.
    pub sightings: Arc<SightingRepository>,
    /// Zone repository.
    pub zones: Arc<ZoneRepository>,
    /// Notification repository.
    pub notifications: Arc<NotificationRepository>,
    /// Push subscription repository.
    pub push_subscriptions: Arc<PushSubscriptionRepository>,
    /// Job repository.
    pub jobs: Arc<JobRepository>,
    /// User profile repository.
    pub profiles: Arc<UserProfileRepository>,
    /// Comment repository.
    pub comments: Arc<CommentRepository>,
}

impl Repositories {
    /// Create every repository on `pool`.
    pub fn new(pool: PgPool) -> Self {
        Self {
            sightings: Arc::new(SightingRepository::new(pool.clone())),
            zones: Arc::new(ZoneRepository::new(pool.clone())),
            notifications: Arc::new(NotificationRepository::new(pool.clone())),
            push_subscriptions: Arc::new(PushSubscriptionRepository::new(pool.clone())),
            jobs: Arc::new(JobRepository::new(pool.clone())),
            profiles: Arc::new(UserProfileRepository::new(pool.clone())),
            comments: Arc::new(CommentRepository::new(pool)),
        }
    }
}
