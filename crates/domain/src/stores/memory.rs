//! In-memory store backend.
//!
//! Used by tests and for running the API without a database. All state sits
//! behind one lock so uniqueness and cascade rules hold atomically, matching
//! what the PostgreSQL constraints give the real backend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{
    AssignmentStore, DriverStore, StoreResult, UserStore, WarehouseStore, ZoneStore,
};
use crate::errors::StoreError;
use crate::models::{
    Driver, DriverWithZones, NewDriver, NewWarehouse, NewZone, User, Warehouse,
    WarehouseWithZone, Zone, ZoneDriverInfo, ZonePatch,
};

#[derive(Debug, Clone)]
struct StoredDriver {
    driver: Driver,
    password_hash: Option<String>,
}

#[derive(Debug, Clone)]
struct Assignment {
    zone_id: Uuid,
    driver_id: Uuid,
    assigned_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    zones: Vec<Zone>,
    drivers: Vec<StoredDriver>,
    assignments: Vec<Assignment>,
    warehouses: Vec<Warehouse>,
    users: Vec<User>,
}

/// Store backend keeping everything in process memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
    unavailable: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail with [`StoreError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Adds an operator account.
    pub fn seed_user(
        &self,
        email: &str,
        name: Option<&str>,
        password_hash: &str,
        is_active: bool,
    ) -> StoreResult<User> {
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_lowercase(),
            name: name.map(str::to_string),
            password_hash: password_hash.to_string(),
            is_active,
            created_at: Utc::now(),
        };
        self.write()?.users.push(user.clone());
        Ok(user)
    }

    /// Returns the stored password hash of a driver, if one was set.
    pub fn driver_password_hash(&self, driver_id: Uuid) -> StoreResult<Option<String>> {
        Ok(self
            .read()?
            .drivers
            .iter()
            .find(|d| d.driver.id == driver_id)
            .and_then(|d| d.password_hash.clone()))
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("in-memory store offline".into()))
        } else {
            Ok(())
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, State>> {
        self.check_available()?;
        self.state
            .read()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, State>> {
        self.check_available()?;
        self.state
            .write()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".into()))
    }
}

/// Newest first; later inserts win ties on identical timestamps.
fn newest_first<T: Clone>(items: &[T], created_at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut out: Vec<T> = items.iter().rev().cloned().collect();
    out.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    out
}

#[async_trait]
impl ZoneStore for InMemoryStore {
    async fn insert_zone(&self, zone: NewZone) -> StoreResult<Zone> {
        let now = Utc::now();
        let zone = Zone {
            id: Uuid::new_v4(),
            owner_id: zone.owner_id,
            name: zone.name,
            description: zone.description,
            geometry: zone.geometry,
            color: zone.color,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.write()?.zones.push(zone.clone());
        Ok(zone)
    }

    async fn find_zone(&self, id: Uuid) -> StoreResult<Option<Zone>> {
        Ok(self.read()?.zones.iter().find(|z| z.id == id).cloned())
    }

    async fn list_zones(&self, active_only: bool) -> StoreResult<Vec<Zone>> {
        let state = self.read()?;
        let zones: Vec<Zone> = state
            .zones
            .iter()
            .filter(|z| !active_only || z.is_active)
            .cloned()
            .collect();
        Ok(newest_first(&zones, |z| z.created_at))
    }

    async fn update_zone(&self, id: Uuid, patch: ZonePatch) -> StoreResult<Option<Zone>> {
        let mut state = self.write()?;
        let Some(zone) = state.zones.iter_mut().find(|z| z.id == id) else {
            return Ok(None);
        };

        if let Some(name) = patch.name {
            zone.name = name;
        }
        if let Some(description) = patch.description {
            zone.description = Some(description);
        }
        if let Some(geometry) = patch.geometry {
            zone.geometry = geometry;
        }
        if let Some(color) = patch.color {
            zone.color = color;
        }
        if let Some(is_active) = patch.is_active {
            zone.is_active = is_active;
        }
        zone.updated_at = Utc::now();

        Ok(Some(zone.clone()))
    }

    async fn delete_zone(&self, id: Uuid) -> StoreResult<bool> {
        let mut state = self.write()?;
        let before = state.zones.len();
        state.zones.retain(|z| z.id != id);
        let deleted = state.zones.len() != before;
        if deleted {
            state.assignments.retain(|a| a.zone_id != id);
        }
        Ok(deleted)
    }
}

#[async_trait]
impl DriverStore for InMemoryStore {
    async fn insert_driver(&self, driver: NewDriver) -> StoreResult<Driver> {
        let stored = StoredDriver {
            driver: Driver {
                id: Uuid::new_v4(),
                owner_id: driver.owner_id,
                name: driver.name,
                phone: driver.phone,
                account_details: driver.account_details,
                is_active: true,
                created_at: Utc::now(),
            },
            password_hash: driver.password_hash,
        };
        let created = stored.driver.clone();
        self.write()?.drivers.push(stored);
        Ok(created)
    }

    async fn list_active_drivers(&self) -> StoreResult<Vec<DriverWithZones>> {
        let state = self.read()?;
        let drivers: Vec<Driver> = state
            .drivers
            .iter()
            .filter(|d| d.driver.is_active)
            .map(|d| d.driver.clone())
            .collect();

        Ok(newest_first(&drivers, |d| d.created_at)
            .into_iter()
            .map(|driver| {
                let zones = state
                    .assignments
                    .iter()
                    .filter(|a| a.driver_id == driver.id)
                    .filter_map(|a| state.zones.iter().find(|z| z.id == a.zone_id))
                    .map(Zone::summary)
                    .collect();
                DriverWithZones { driver, zones }
            })
            .collect())
    }
}

#[async_trait]
impl AssignmentStore for InMemoryStore {
    async fn insert_assignment(&self, zone_id: Uuid, driver_id: Uuid) -> StoreResult<()> {
        let mut state = self.write()?;

        if !state.zones.iter().any(|z| z.id == zone_id) {
            return Err(StoreError::MissingReference("zone_id".into()));
        }
        if !state.drivers.iter().any(|d| d.driver.id == driver_id) {
            return Err(StoreError::MissingReference("driver_id".into()));
        }
        if state
            .assignments
            .iter()
            .any(|a| a.zone_id == zone_id && a.driver_id == driver_id)
        {
            return Err(StoreError::UniqueViolation("zone_drivers_pkey".into()));
        }

        state.assignments.push(Assignment {
            zone_id,
            driver_id,
            assigned_at: Utc::now(),
        });
        Ok(())
    }

    async fn list_zone_drivers(&self, zone_id: Uuid) -> StoreResult<Vec<ZoneDriverInfo>> {
        let state = self.read()?;
        Ok(state
            .assignments
            .iter()
            .filter(|a| a.zone_id == zone_id)
            .filter_map(|a| {
                state
                    .drivers
                    .iter()
                    .find(|d| d.driver.id == a.driver_id)
                    .map(|d| ZoneDriverInfo {
                        driver_id: d.driver.id,
                        name: d.driver.name.clone(),
                        phone: d.driver.phone.clone(),
                        assigned_at: a.assigned_at,
                    })
            })
            .collect())
    }

    async fn delete_assignment(&self, zone_id: Uuid, driver_id: Uuid) -> StoreResult<bool> {
        let mut state = self.write()?;
        let before = state.assignments.len();
        state
            .assignments
            .retain(|a| !(a.zone_id == zone_id && a.driver_id == driver_id));
        Ok(state.assignments.len() != before)
    }
}

#[async_trait]
impl WarehouseStore for InMemoryStore {
    async fn insert_warehouse(&self, warehouse: NewWarehouse) -> StoreResult<Warehouse> {
        let warehouse = Warehouse {
            id: Uuid::new_v4(),
            owner_id: warehouse.owner_id,
            name: warehouse.name,
            description: warehouse.description,
            address: warehouse.address,
            city: warehouse.city,
            state: warehouse.state,
            country: warehouse.country,
            postal_code: warehouse.postal_code,
            latitude: warehouse.latitude,
            longitude: warehouse.longitude,
            phone: warehouse.phone,
            email: warehouse.email,
            manager_name: warehouse.manager_name,
            manager_phone: warehouse.manager_phone,
            working_hours: warehouse.working_hours,
            capacity: warehouse.capacity,
            warehouse_type: warehouse.warehouse_type,
            features: warehouse.features,
            assigned_zone_id: warehouse.assigned_zone_id,
            is_active: true,
            created_at: Utc::now(),
        };
        self.write()?.warehouses.push(warehouse.clone());
        Ok(warehouse)
    }

    async fn list_active_warehouses(&self) -> StoreResult<Vec<WarehouseWithZone>> {
        let state = self.read()?;
        let warehouses: Vec<Warehouse> = state
            .warehouses
            .iter()
            .filter(|w| w.is_active)
            .cloned()
            .collect();

        Ok(newest_first(&warehouses, |w| w.created_at)
            .into_iter()
            .map(|warehouse| {
                let zone = warehouse
                    .assigned_zone_id
                    .and_then(|id| state.zones.iter().find(|z| z.id == id))
                    .map(Zone::summary);
                WarehouseWithZone { warehouse, zone }
            })
            .collect())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let email = email.to_lowercase();
        Ok(self.read()?.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.iter().find(|u| u.id == id).cloned())
    }
}
