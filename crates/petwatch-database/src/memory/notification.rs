use async_trait::async_trait;
use chrono::{DateTime, Utc};

use petwatch_core::result::AppResult;
use petwatch_core::types::{NotificationId, PageRequest, PageResponse, UserId};
use petwatch_entity::notification::{CreateNotification, Notification};

use super::MemoryStore;
use crate::store::NotificationStore;

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create_if_absent(
        &self,
        data: &CreateNotification,
        now: DateTime<Utc>,
    ) -> AppResult<(Notification, bool)> {
        let mut state = self.state.write().await;
        if let Some(existing) = state.notifications.iter().find(|n| {
            n.user_id == data.user_id && n.sighting_id == data.sighting_id && n.kind == data.kind
        }) {
            return Ok((existing.clone(), false));
        }
        let row = data.clone().into_notification(now);
        state.notifications.push(row.clone());
        Ok((row, true))
    }

    async fn find_by_id(&self, id: NotificationId) -> AppResult<Option<Notification>> {
        let state = self.state.read().await;
        Ok(state.notifications.iter().find(|n| n.id == id).cloned())
    }

    async fn find_by_user(
        &self,
        user_id: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Notification>> {
        let state = self.state.read().await;
        let mut rows: Vec<Notification> = state
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = rows.len() as u64;
        let items = rows
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();
        Ok(PageResponse::new(items, page, total))
    }

    async fn count_unread(&self, user_id: UserId) -> AppResult<u64> {
        let state = self.state.read().await;
        Ok(state
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count() as u64)
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Notification>> {
        let mut state = self.state.write().await;
        Ok(state.notifications.iter_mut().find(|n| n.id == id).map(|n| {
            if !n.is_read {
                n.is_read = true;
                n.read_at = Some(now);
            }
            n.clone()
        }))
    }

    async fn mark_all_read(&self, user_id: UserId, now: DateTime<Utc>) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let mut flipped = 0;
        for n in state
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.is_read)
        {
            n.is_read = true;
            n.read_at = Some(now);
            flipped += 1;
        }
        Ok(flipped)
    }
}
