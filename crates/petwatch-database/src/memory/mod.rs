//! In-memory implementations of every store trait.
//!
//! All tables live behind one lock so multi-table operations (sighting plus
//! follow-up job) are atomic, matching the transactional PostgreSQL
//! behaviour. The server always runs on PostgreSQL; this store backs the
//! unit and integration tests.

mod comment;
mod job;
mod notification;
mod push_subscription;
mod sighting;
mod user_profile;
mod zone;

use tokio::sync::RwLock;

use petwatch_core::types::UserId;
use petwatch_entity::comment::Comment;
use petwatch_entity::job::Job;
use petwatch_entity::notification::Notification;
use petwatch_entity::push::PushSubscription;
use petwatch_entity::sighting::Sighting;
use petwatch_entity::user::UserProfile;
use petwatch_entity::zone::AlertZone;

/// A process-local store. Rows are kept in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    sightings: Vec<Sighting>,
    zones: Vec<AlertZone>,
    notifications: Vec<Notification>,
    subscriptions: Vec<PushSubscription>,
    jobs: Vec<Job>,
    profiles: Vec<UserProfile>,
    comments: Vec<Comment>,
}

impl MemoryState {
    fn profile(&self, user_id: UserId) -> Option<&UserProfile> {
        self.profiles.iter().find(|p| p.user_id == user_id)
    }
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}
