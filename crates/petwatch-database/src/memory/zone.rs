use async_trait::async_trait;

use petwatch_core::result::AppResult;
use petwatch_core::types::{UserId, ZoneId};
use petwatch_entity::geo::GeoPoint;
use petwatch_entity::zone::AlertZone;

use super::MemoryStore;
use crate::store::ZoneStore;

#[async_trait]
impl ZoneStore for MemoryStore {
    async fn insert(&self, zone: &AlertZone) -> AppResult<AlertZone> {
        self.state.write().await.zones.push(zone.clone());
        Ok(zone.clone())
    }

    async fn find_by_id(&self, id: ZoneId) -> AppResult<Option<AlertZone>> {
        let state = self.state.read().await;
        Ok(state.zones.iter().find(|z| z.id == id).cloned())
    }

    async fn find_by_owner(&self, owner_id: UserId) -> AppResult<Vec<AlertZone>> {
        let state = self.state.read().await;
        Ok(state
            .zones
            .iter()
            .filter(|z| z.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn find_candidates(&self, point: &GeoPoint) -> AppResult<Vec<AlertZone>> {
        let state = self.state.read().await;
        Ok(state
            .zones
            .iter()
            .filter(|z| z.polygon.bounding_box().contains(point))
            .cloned()
            .collect())
    }

    async fn delete(&self, id: ZoneId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let before = state.zones.len();
        state.zones.retain(|z| z.id != id);
        Ok(state.zones.len() < before)
    }
}
