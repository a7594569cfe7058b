//! Sighting submission, edits, and listings.

use std::sync::Arc;

use tracing::{info, warn};

use petwatch_core::config::IngestConfig;
use petwatch_core::error::AppError;
use petwatch_core::traits::Clock;
use petwatch_core::types::{PageRequest, PageResponse, SightingId};
use petwatch_database::store::{InsertOutcome, SightingStore};
use petwatch_entity::job::{CreateJob, JobPayload};
use petwatch_entity::sighting::{Sighting, SightingDetails, SightingFilter};

use super::input::{SightingDraft, SightingPatch};
use crate::context::RequestContext;

/// Default number of sightings returned by [`SightingService::latest`].
pub const DEFAULT_LATEST_LIMIT: u64 = 3;
/// Upper bound for [`SightingService::latest`].
pub const MAX_LATEST_LIMIT: u64 = 20;

/// Validates and stores sightings under the per-user rate limit.
#[derive(Clone)]
pub struct SightingService {
    /// Sighting store.
    sightings: Arc<dyn SightingStore>,
    /// Time source.
    clock: Arc<dyn Clock>,
    /// Ingest settings.
    config: IngestConfig,
    /// Attempts granted to the follow-up match job.
    job_max_attempts: i32,
}

impl std::fmt::Debug for SightingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SightingService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SightingService {
    /// Creates a new sighting service.
    pub fn new(
        sightings: Arc<dyn SightingStore>,
        clock: Arc<dyn Clock>,
        config: IngestConfig,
        job_max_attempts: i32,
    ) -> Self {
        Self {
            sightings,
            clock,
            config,
            job_max_attempts,
        }
    }

    /// Validates and stores a new sighting for the caller.
    ///
    /// Zone matching is handed off to a `sighting_match` job written in the
    /// same unit of work; the caller never waits for it.
    pub async fn submit_sighting(
        &self,
        ctx: &RequestContext,
        draft: SightingDraft,
    ) -> Result<Sighting, AppError> {
        let data = draft.validate()?;
        let sighting = data.into_sighting(ctx.user_id, self.clock.now());
        let follow_up = CreateJob::from_payload(
            &JobPayload::SightingMatch {
                sighting_id: sighting.id,
            },
            self.job_max_attempts,
        )?;

        match self
            .sightings
            .insert_if_allowed(&sighting, &self.config.rate_limit, &follow_up)
            .await?
        {
            InsertOutcome::Inserted(stored) => {
                info!(
                    sighting_id = %stored.id,
                    user_id = %stored.user_id,
                    category = %stored.category,
                    status = %stored.status,
                    "Sighting submitted"
                );
                Ok(stored)
            }
            InsertOutcome::RateLimited {
                retry_after_seconds,
            } => {
                warn!(
                    user_id = %ctx.user_id,
                    retry_after_seconds,
                    "Sighting rejected by rate limit"
                );
                Err(AppError::rate_limited(retry_after_seconds))
            }
        }
    }

    /// Returns a sighting by ID with its reporter's contact details,
    /// expired or not.
    pub async fn get_sighting(&self, id: SightingId) -> Result<SightingDetails, AppError> {
        self.sightings
            .find_details(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Sighting {id} not found")))
    }

    /// Lists the caller's own sightings, newest first.
    pub async fn list_own(&self, ctx: &RequestContext) -> Result<Vec<SightingDetails>, AppError> {
        self.sightings.find_by_user(ctx.user_id).await
    }

    /// Searches active sightings, nearest first when `filter.near` is set.
    pub async fn search(
        &self,
        filter: &SightingFilter,
        page: PageRequest,
    ) -> Result<PageResponse<SightingDetails>, AppError> {
        let page = PageRequest::new(page.page, page.page_size);
        self.sightings
            .search_active(filter, self.clock.now(), &page)
            .await
    }

    /// Returns the most recent active sightings.
    pub async fn latest(&self, limit: Option<u64>) -> Result<Vec<SightingDetails>, AppError> {
        let limit = limit
            .unwrap_or(DEFAULT_LATEST_LIMIT)
            .clamp(1, MAX_LATEST_LIMIT);
        self.sightings.latest_active(self.clock.now(), limit).await
    }

    /// Applies an owner edit.
    pub async fn update_sighting(
        &self,
        ctx: &RequestContext,
        id: SightingId,
        patch: SightingPatch,
    ) -> Result<Sighting, AppError> {
        let mut sighting = self.owned(ctx, id).await?;
        let update = patch.validate()?;

        if let Some(next) = update.status {
            if !sighting.status.can_transition_to(next) {
                return Err(AppError::invalid_field(
                    "status",
                    format!("cannot change from {} to {next}", sighting.status),
                ));
            }
        }

        let now = self.clock.now();
        update.apply_to(&mut sighting);
        sighting.updated_at = now;
        if self.config.renew_expiration_on_edit {
            sighting.expires_at = Sighting::expiry_from(now);
        }

        let saved = self.sightings.update(&sighting).await?;
        info!(sighting_id = %saved.id, status = %saved.status, "Sighting updated");
        Ok(saved)
    }

    /// Hard-deletes one of the caller's sightings.
    pub async fn delete_sighting(
        &self,
        ctx: &RequestContext,
        id: SightingId,
    ) -> Result<(), AppError> {
        self.owned(ctx, id).await?;
        if !self.sightings.delete(id).await? {
            return Err(AppError::not_found(format!("Sighting {id} not found")));
        }
        info!(sighting_id = %id, user_id = %ctx.user_id, "Sighting deleted");
        Ok(())
    }

    async fn owned(&self, ctx: &RequestContext, id: SightingId) -> Result<Sighting, AppError> {
        let sighting = self
            .sightings
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Sighting {id} not found")))?;
        if !ctx.owns(sighting.user_id) {
            return Err(AppError::forbidden("Sighting belongs to another user"));
        }
        Ok(sighting)
    }
}
