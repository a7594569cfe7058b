use std::sync::Arc;

use tracing::debug;

use petwatch_core::error::AppError;
use petwatch_core::traits::Clock;
use petwatch_core::types::{NotificationId, PageRequest, PageResponse};
use petwatch_database::store::NotificationStore;
use petwatch_entity::notification::Notification;

use crate::context::RequestContext;

/// Inbox listing and read-state changes.
#[derive(Clone)]
pub struct NotificationService {
    notifications: Arc<dyn NotificationStore>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService").finish_non_exhaustive()
    }
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(notifications: Arc<dyn NotificationStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            notifications,
            clock,
        }
    }

    /// The caller's notifications, newest first.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<PageResponse<Notification>, AppError> {
        let page = PageRequest::new(page.page, page.page_size);
        self.notifications.find_by_user(ctx.user_id, &page).await
    }

    /// Number of unread notifications for the caller.
    pub async fn unread_count(&self, ctx: &RequestContext) -> Result<u64, AppError> {
        self.notifications.count_unread(ctx.user_id).await
    }

    /// Marks one of the caller's notifications read. Marking twice keeps
    /// the first `read_at`.
    pub async fn mark_read(
        &self,
        ctx: &RequestContext,
        id: NotificationId,
    ) -> Result<Notification, AppError> {
        let existing = self
            .notifications
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))?;
        if !ctx.owns(existing.user_id) {
            return Err(AppError::forbidden("Notification belongs to another user"));
        }
        if existing.is_read {
            return Ok(existing);
        }

        let updated = self
            .notifications
            .mark_read(id, self.clock.now())
            .await?
            .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))?;
        debug!(notification_id = %id, "Notification marked read");
        Ok(updated)
    }

    /// Marks every unread notification of the caller. Returns how many
    /// changed.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> Result<u64, AppError> {
        let changed = self
            .notifications
            .mark_all_read(ctx.user_id, self.clock.now())
            .await?;
        debug!(user_id = %ctx.user_id, changed, "Notifications marked read");
        Ok(changed)
    }
}
