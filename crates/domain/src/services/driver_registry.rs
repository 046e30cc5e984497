//! Driver onboarding.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::errors::DomainError;
use crate::models::driver::CreateDriverRequest;
use crate::models::{DriverWithZones, NewDriver, ZoneSummary};
use crate::stores::{DriverStore, ZoneStore};

use super::driver_zone_linker::DriverZoneLinker;

/// Creates drivers and lists them with their zones.
#[derive(Clone)]
pub struct DriverRegistry {
    drivers: Arc<dyn DriverStore>,
    zones: Arc<dyn ZoneStore>,
    linker: DriverZoneLinker,
}

impl DriverRegistry {
    pub fn new(
        drivers: Arc<dyn DriverStore>,
        zones: Arc<dyn ZoneStore>,
        linker: DriverZoneLinker,
    ) -> Self {
        Self {
            drivers,
            zones,
            linker,
        }
    }

    /// Creates a driver, then links it to the requested zones.
    ///
    /// A zone that cannot be linked is logged and left out of the result;
    /// the driver is still created.
    pub async fn create(
        &self,
        owner_id: Uuid,
        request: CreateDriverRequest,
    ) -> Result<DriverWithZones, DomainError> {
        request.validate()?;

        let password_hash = request
            .password
            .as_deref()
            .map(shared::password::hash_password)
            .transpose()
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let account_details = if request.account_details.is_empty() {
            None
        } else {
            Some(serde_json::Value::Object(request.account_details))
        };

        let driver = self
            .drivers
            .insert_driver(NewDriver {
                owner_id,
                name: request.name.trim().to_string(),
                phone: request.phone.trim().to_string(),
                password_hash,
                account_details,
            })
            .await?;

        info!(driver_id = %driver.id, owner_id = %owner_id, "Driver created");

        let mut zones: Vec<ZoneSummary> = Vec::new();
        for zone_id in request.zone_ids.unwrap_or_default() {
            if zones.iter().any(|z| z.id == zone_id) {
                continue;
            }
            if let Err(e) = self.linker.assign(zone_id, &[driver.id]).await {
                warn!(driver_id = %driver.id, zone_id = %zone_id, error = %e, "Failed to assign driver to zone");
                continue;
            }
            match self.zones.find_zone(zone_id).await {
                Ok(Some(zone)) => zones.push(zone.summary()),
                Ok(None) => {}
                Err(e) => {
                    warn!(zone_id = %zone_id, error = %e, "Failed to load assigned zone")
                }
            }
        }

        Ok(DriverWithZones { driver, zones })
    }

    /// Active drivers, newest first.
    pub async fn list(&self) -> Result<Vec<DriverWithZones>, DomainError> {
        Ok(self.drivers.list_active_drivers().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewZone, ZoneGeometry};
    use crate::stores::{InMemoryStore, Stores};
    use serde_json::json;

    fn registry() -> (DriverRegistry, Arc<InMemoryStore>) {
        let (stores, backend) = Stores::in_memory();
        let linker = DriverZoneLinker::new(stores.zones.clone(), stores.assignments.clone());
        (
            DriverRegistry::new(stores.drivers, stores.zones, linker),
            backend,
        )
    }

    async fn zone(backend: &InMemoryStore, name: &str) -> Uuid {
        backend
            .insert_zone(NewZone {
                owner_id: Uuid::new_v4(),
                name: name.into(),
                description: None,
                geometry: ZoneGeometry::Point([46.7, 24.7]),
                color: "#6366F1".into(),
            })
            .await
            .unwrap()
            .id
    }

    fn request(zone_ids: Vec<Uuid>) -> CreateDriverRequest {
        serde_json::from_value(json!({
            "name": "Khalid",
            "phone": "+966511111111",
            "password": "driver-pass",
            "zone_ids": zone_ids,
            "plate_letters": "ABC",
            "plate_numbers": "1234"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_links_requested_zones() {
        let (registry, backend) = registry();
        let north = zone(&backend, "North").await;
        let south = zone(&backend, "South").await;

        let created = registry
            .create(Uuid::new_v4(), request(vec![north, south]))
            .await
            .unwrap();

        let ids: Vec<Uuid> = created.zones.iter().map(|z| z.id).collect();
        assert_eq!(ids, vec![north, south]);
        assert_eq!(
            created.driver.account_details,
            Some(json!({"plate_letters": "ABC", "plate_numbers": "1234"}))
        );
    }

    #[tokio::test]
    async fn test_unknown_zone_does_not_fail_creation() {
        let (registry, backend) = registry();
        let north = zone(&backend, "North").await;

        let created = registry
            .create(Uuid::new_v4(), request(vec![Uuid::new_v4(), north]))
            .await
            .unwrap();

        assert_eq!(created.zones.len(), 1);
        assert_eq!(created.zones[0].id, north);

        let listed = registry.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].zones.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_phone_is_rejected() {
        let (registry, _) = registry();
        let request: CreateDriverRequest =
            serde_json::from_value(json!({"name": "Khalid"})).unwrap();

        let err = registry.create(Uuid::new_v4(), request).await.unwrap_err();
        assert_eq!(err.field(), Some("phone"));
    }

    #[tokio::test]
    async fn test_password_is_not_exposed() {
        let (registry, _) = registry();
        let created = registry.create(Uuid::new_v4(), request(vec![])).await.unwrap();

        let value = serde_json::to_value(&created).unwrap();
        assert!(value.get("password").is_none());
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["name"], "Khalid");
    }

    #[tokio::test]
    async fn test_password_is_stored_hashed() {
        let (registry, backend) = registry();
        let created = registry.create(Uuid::new_v4(), request(vec![])).await.unwrap();

        let hash = backend
            .driver_password_hash(created.driver.id)
            .unwrap()
            .expect("password hash stored");
        assert_ne!(hash, "driver-pass");
        assert!(shared::password::verify_password("driver-pass", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_driver_without_password_has_no_hash() {
        let (registry, backend) = registry();
        let request: CreateDriverRequest =
            serde_json::from_value(json!({"name": "Mona", "phone": "+966522222222"})).unwrap();

        let created = registry.create(Uuid::new_v4(), request).await.unwrap();

        assert_eq!(backend.driver_password_hash(created.driver.id).unwrap(), None);
    }
}
