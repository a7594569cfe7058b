//! Zone lifecycle for the zone owner.

use std::sync::Arc;

use tracing::info;

use petwatch_core::error::AppError;
use petwatch_core::traits::Clock;
use petwatch_core::types::ZoneId;
use petwatch_database::store::ZoneStore;
use petwatch_entity::geo::{GeoPoint, Polygon};
use petwatch_entity::zone::{AlertZone, ZONE_NAME_MAX_LEN};

use crate::context::RequestContext;

/// Creates, lists, and deletes alert zones.
#[derive(Clone)]
pub struct ZoneService {
    /// Zone store.
    zones: Arc<dyn ZoneStore>,
    /// Time source.
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ZoneService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneService").finish_non_exhaustive()
    }
}

impl ZoneService {
    /// Creates a new zone service.
    pub fn new(zones: Arc<dyn ZoneStore>, clock: Arc<dyn Clock>) -> Self {
        Self { zones, clock }
    }

    /// Stores a new zone for the caller, closing the ring if needed.
    pub async fn create_zone(
        &self,
        ctx: &RequestContext,
        name: &str,
        vertices: Vec<GeoPoint>,
    ) -> Result<AlertZone, AppError> {
        let polygon =
            Polygon::from_vertices(vertices).map_err(|e| AppError::invalid_geometry(e.to_string()))?;

        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_field("name", "must not be empty"));
        }
        if name.chars().count() > ZONE_NAME_MAX_LEN {
            return Err(AppError::invalid_field(
                "name",
                format!("must be at most {ZONE_NAME_MAX_LEN} characters"),
            ));
        }

        let zone = AlertZone {
            id: ZoneId::new(),
            owner_id: ctx.user_id,
            name: name.to_string(),
            polygon,
            created_at: self.clock.now(),
        };
        let zone = self.zones.insert(&zone).await?;

        info!(
            zone_id = %zone.id,
            owner_id = %zone.owner_id,
            vertices = zone.polygon.vertices().len(),
            "Alert zone created"
        );
        Ok(zone)
    }

    /// Returns one of the caller's zones.
    pub async fn get_zone(&self, ctx: &RequestContext, zone_id: ZoneId) -> Result<AlertZone, AppError> {
        let zone = self
            .zones
            .find_by_id(zone_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Zone {zone_id} not found")))?;
        if !ctx.owns(zone.owner_id) {
            return Err(AppError::forbidden("Zone belongs to another user"));
        }
        Ok(zone)
    }

    /// Lists the caller's zones in creation order.
    pub async fn list_zones(&self, ctx: &RequestContext) -> Result<Vec<AlertZone>, AppError> {
        self.zones.find_by_owner(ctx.user_id).await
    }

    /// Deletes one of the caller's zones.
    pub async fn delete_zone(&self, ctx: &RequestContext, zone_id: ZoneId) -> Result<(), AppError> {
        self.get_zone(ctx, zone_id).await?;
        if !self.zones.delete(zone_id).await? {
            return Err(AppError::not_found(format!("Zone {zone_id} not found")));
        }
        info!(zone_id = %zone_id, owner_id = %ctx.user_id, "Alert zone deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use petwatch_core::error::ErrorKind;
    use petwatch_core::traits::ManualClock;
    use petwatch_core::types::UserId;
    use petwatch_database::MemoryStore;

    use super::*;

    fn service() -> ZoneService {
        ZoneService::new(Arc::new(MemoryStore::new()), Arc::new(ManualClock::new(Utc::now())))
    }

    fn square() -> Vec<GeoPoint> {
        vec![
            GeoPoint { lat: 0.0, lng: 0.0 },
            GeoPoint { lat: 0.0, lng: 1.0 },
            GeoPoint { lat: 1.0, lng: 1.0 },
            GeoPoint { lat: 1.0, lng: 0.0 },
        ]
    }

    #[tokio::test]
    async fn test_create_closes_ring() {
        let svc = service();
        let ctx = RequestContext::new(UserId::new(), Utc::now());
        let zone = svc.create_zone(&ctx, " Home ", square()).await.expect("create");
        assert_eq!(zone.name, "Home");
        assert_eq!(zone.polygon.ring().first(), zone.polygon.ring().last());
        assert_eq!(svc.list_zones(&ctx).await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_degenerate_polygon() {
        let svc = service();
        let ctx = RequestContext::new(UserId::new(), Utc::now());
        let err = svc
            .create_zone(&ctx, "Line", square().into_iter().take(2).collect())
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidGeometry);
        assert!(svc.list_zones(&ctx).await.expect("list").is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let svc = service();
        let ctx = RequestContext::new(UserId::new(), Utc::now());
        let err = svc.create_zone(&ctx, "   ", square()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.field.as_deref(), Some("name"));
    }

    #[tokio::test]
    async fn test_delete_twice_then_not_found() {
        let svc = service();
        let ctx = RequestContext::new(UserId::new(), Utc::now());
        let zone = svc.create_zone(&ctx, "Home", square()).await.expect("create");

        svc.delete_zone(&ctx, zone.id).await.expect("first delete");
        let err = svc.delete_zone(&ctx, zone.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_other_users_zone_forbidden() {
        let svc = service();
        let owner = RequestContext::new(UserId::new(), Utc::now());
        let intruder = RequestContext::new(UserId::new(), Utc::now());
        let zone = svc.create_zone(&owner, "Home", square()).await.expect("create");

        let err = svc.delete_zone(&intruder, zone.id).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert_eq!(svc.list_zones(&owner).await.expect("list").len(), 1);
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_owner() {
        let svc = service();
        let a = RequestContext::new(UserId::new(), Utc::now());
        let b = RequestContext::new(UserId::new(), Utc::now());
        svc.create_zone(&a, "A1", square()).await.expect("create");
        svc.create_zone(&a, "A2", square()).await.expect("create");
        svc.create_zone(&b, "B1", square()).await.expect("create");

        let names: Vec<String> = svc
            .list_zones(&a)
            .await
            .expect("list")
            .into_iter()
            .map(|z| z.name)
            .collect();
        assert_eq!(names, vec!["A1", "A2"]);
    }
}
