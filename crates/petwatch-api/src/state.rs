//! Shared application state threaded through every handler.

use std::sync::Arc;
use std::time::Instant;

use petwatch_auth::JwtDecoder;
use petwatch_core::config::AppConfig;
use petwatch_core::traits::Clock;
use petwatch_service::{
    CommentService, NotificationService, PushSubscriptionService, SightingService,
    UserProfileService, ZoneService,
};

/// Application state cloned into every request.
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<AppConfig>,
    /// Time source for request timestamps.
    pub clock: Arc<dyn Clock>,
    /// Bearer token verification.
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Sighting ingest and listings.
    pub sighting_service: Arc<SightingService>,
    /// Comments on sightings.
    pub comment_service: Arc<CommentService>,
    /// Caller contact details.
    pub user_service: Arc<UserProfileService>,
    /// Alert zones.
    pub zone_service: Arc<ZoneService>,
    /// Notification inbox.
    pub notification_service: Arc<NotificationService>,
    /// Push subscriptions.
    pub push_service: Arc<PushSubscriptionService>,
    /// Process start, for uptime reporting.
    pub started_at: Instant,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}
