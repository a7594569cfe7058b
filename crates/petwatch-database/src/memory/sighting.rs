use async_trait::async_trait;
use chrono::{DateTime, Utc};

use petwatch_core::config::RateLimitConfig;
use petwatch_core::error::AppError;
use petwatch_core::result::AppResult;
use petwatch_core::types::{PageRequest, PageResponse, SightingId, UserId};
use petwatch_entity::job::CreateJob;
use petwatch_entity::sighting::{Sighting, SightingDetails, SightingFilter};

use super::{MemoryState, MemoryStore};
use super::job::insert_job;
use crate::store::{InsertOutcome, SightingStore, retry_after_seconds, window_start};

fn newest_first(a: &Sighting, b: &Sighting) -> std::cmp::Ordering {
    b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id))
}

fn with_details(state: &MemoryState, sighting: &Sighting) -> SightingDetails {
    SightingDetails::new(sighting.clone(), state.profile(sighting.user_id))
}

#[async_trait]
impl SightingStore for MemoryStore {
    async fn insert_if_allowed(
        &self,
        sighting: &Sighting,
        limit: &RateLimitConfig,
        follow_up: &CreateJob,
    ) -> AppResult<InsertOutcome> {
        let now = sighting.created_at;
        let since = window_start(now, limit.window_seconds);
        let mut state = self.state.write().await;

        let recent: Vec<DateTime<Utc>> = state
            .sightings
            .iter()
            .filter(|s| s.user_id == sighting.user_id && s.created_at > since)
            .map(|s| s.created_at)
            .collect();

        if recent.len() >= limit.max_per_window as usize {
            let oldest = recent.iter().min().copied().unwrap_or(now);
            return Ok(InsertOutcome::RateLimited {
                retry_after_seconds: retry_after_seconds(oldest, limit.window_seconds, now),
            });
        }

        state.sightings.push(sighting.clone());
        insert_job(&mut state.jobs, follow_up, now);
        Ok(InsertOutcome::Inserted(sighting.clone()))
    }

    async fn find_by_id(&self, id: SightingId) -> AppResult<Option<Sighting>> {
        let state = self.state.read().await;
        Ok(state.sightings.iter().find(|s| s.id == id).cloned())
    }

    async fn find_details(&self, id: SightingId) -> AppResult<Option<SightingDetails>> {
        let state = self.state.read().await;
        Ok(state
            .sightings
            .iter()
            .find(|s| s.id == id)
            .map(|s| with_details(&state, s)))
    }

    async fn find_by_user(&self, user_id: UserId) -> AppResult<Vec<SightingDetails>> {
        let state = self.state.read().await;
        let mut own: Vec<&Sighting> = state
            .sightings
            .iter()
            .filter(|s| s.user_id == user_id)
            .collect();
        own.sort_by(|a, b| newest_first(a, b));
        Ok(own.into_iter().map(|s| with_details(&state, s)).collect())
    }

    async fn search_active(
        &self,
        filter: &SightingFilter,
        now: DateTime<Utc>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<SightingDetails>> {
        let state = self.state.read().await;
        let mut hits: Vec<&Sighting> = state
            .sightings
            .iter()
            .filter(|s| s.is_active(now) && filter.matches(s))
            .collect();
        match filter.near {
            Some(origin) => hits.sort_by(|a, b| {
                origin
                    .distance_rank(&a.location())
                    .total_cmp(&origin.distance_rank(&b.location()))
                    .then_with(|| newest_first(a, b))
            }),
            None => hits.sort_by(|a, b| newest_first(a, b)),
        }

        let total = hits.len() as u64;
        let items = hits
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .map(|s| with_details(&state, s))
            .collect();
        Ok(PageResponse::new(items, page, total))
    }

    async fn latest_active(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> AppResult<Vec<SightingDetails>> {
        let state = self.state.read().await;
        let mut hits: Vec<&Sighting> = state
            .sightings
            .iter()
            .filter(|s| s.is_active(now))
            .collect();
        hits.sort_by(|a, b| newest_first(a, b));
        hits.truncate(limit as usize);
        Ok(hits.into_iter().map(|s| with_details(&state, s)).collect())
    }

    async fn update(&self, sighting: &Sighting) -> AppResult<Sighting> {
        let mut state = self.state.write().await;
        let slot = state
            .sightings
            .iter_mut()
            .find(|s| s.id == sighting.id)
            .ok_or_else(|| AppError::not_found(format!("Sighting {} not found", sighting.id)))?;
        *slot = sighting.clone();
        Ok(sighting.clone())
    }

    async fn delete(&self, id: SightingId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let before = state.sightings.len();
        state.sightings.retain(|s| s.id != id);
        let removed = state.sightings.len() < before;
        if removed {
            state.notifications.retain(|n| n.sighting_id != id);
            state.comments.retain(|c| c.sighting_id != id);
        }
        Ok(removed)
    }
}
