use std::sync::Arc;

use tracing::debug;

use petwatch_core::error::AppError;
use petwatch_database::store::ZoneStore;
use petwatch_entity::sighting::Sighting;
use petwatch_entity::zone::ZoneMatch;

/// Finds every zone that contains a sighting's location.
///
/// Candidates come from the store's bounding-box lookup; each is then
/// confirmed with an exact polygon test, boundary included.
#[derive(Clone)]
pub struct ZoneMatcher {
    zones: Arc<dyn ZoneStore>,
}

impl std::fmt::Debug for ZoneMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneMatcher").finish_non_exhaustive()
    }
}

impl ZoneMatcher {
    /// Creates a new matcher.
    pub fn new(zones: Arc<dyn ZoneStore>) -> Self {
        Self { zones }
    }

    /// Zones containing the sighting, across all owners. The author's own
    /// zones are included.
    pub async fn match_zones(&self, sighting: &Sighting) -> Result<Vec<ZoneMatch>, AppError> {
        let point = sighting.location();
        let candidates = self.zones.find_candidates(&point).await?;
        let total = candidates.len();

        let matches: Vec<ZoneMatch> = candidates
            .iter()
            .filter(|zone| zone.polygon.contains(&point))
            .map(ZoneMatch::from)
            .collect();

        debug!(
            sighting_id = %sighting.id,
            candidates = total,
            matched = matches.len(),
            "Zone matching complete"
        );
        Ok(matches)
    }
}
