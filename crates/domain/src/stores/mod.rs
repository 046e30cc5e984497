//! Storage seams used by domain services.
//!
//! Each trait is implemented by the PostgreSQL repositories in the
//! `persistence` crate and by [`InMemoryStore`] for tests and local runs.

mod memory;

pub use memory::InMemoryStore;

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::{
    Driver, DriverWithZones, NewDriver, NewWarehouse, NewZone, User, Warehouse,
    WarehouseWithZone, Zone, ZoneDriverInfo, ZonePatch,
};

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait ZoneStore: Send + Sync {
    async fn insert_zone(&self, zone: NewZone) -> StoreResult<Zone>;

    async fn find_zone(&self, id: Uuid) -> StoreResult<Option<Zone>>;

    /// Lists zones newest first. Rows whose geometry cannot be read are skipped.
    async fn list_zones(&self, active_only: bool) -> StoreResult<Vec<Zone>>;

    /// Applies a merge-patch. Returns `None` when the zone does not exist.
    async fn update_zone(&self, id: Uuid, patch: ZonePatch) -> StoreResult<Option<Zone>>;

    /// Deletes a zone and its driver assignments. Returns whether a row was removed.
    async fn delete_zone(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait DriverStore: Send + Sync {
    async fn insert_driver(&self, driver: NewDriver) -> StoreResult<Driver>;

    /// Active drivers newest first, each with the zones it is assigned to.
    async fn list_active_drivers(&self) -> StoreResult<Vec<DriverWithZones>>;
}

#[async_trait]
pub trait AssignmentStore: Send + Sync {
    /// Inserts a zone membership.
    ///
    /// Fails with [`StoreError::UniqueViolation`] when the pair already exists
    /// and [`StoreError::MissingReference`] naming `zone_id` or `driver_id`
    /// when either side does not exist.
    async fn insert_assignment(&self, zone_id: Uuid, driver_id: Uuid) -> StoreResult<()>;

    /// Drivers of a zone in assignment order.
    async fn list_zone_drivers(&self, zone_id: Uuid) -> StoreResult<Vec<ZoneDriverInfo>>;

    async fn delete_assignment(&self, zone_id: Uuid, driver_id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait WarehouseStore: Send + Sync {
    async fn insert_warehouse(&self, warehouse: NewWarehouse) -> StoreResult<Warehouse>;

    /// Active warehouses newest first. A dangling zone reference yields no zone.
    async fn list_active_warehouses(&self) -> StoreResult<Vec<WarehouseWithZone>>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
}

/// The set of stores a running service works against.
#[derive(Clone)]
pub struct Stores {
    pub zones: Arc<dyn ZoneStore>,
    pub drivers: Arc<dyn DriverStore>,
    pub assignments: Arc<dyn AssignmentStore>,
    pub warehouses: Arc<dyn WarehouseStore>,
    pub users: Arc<dyn UserStore>,
}

impl Stores {
    /// Builds every store from one backend implementing all traits.
    pub fn from_backend<B>(backend: Arc<B>) -> Self
    where
        B: ZoneStore + DriverStore + AssignmentStore + WarehouseStore + UserStore + 'static,
    {
        Self {
            zones: backend.clone(),
            drivers: backend.clone(),
            assignments: backend.clone(),
            warehouses: backend.clone(),
            users: backend,
        }
    }

    /// Fresh in-memory stores. Returns the backend too so callers can seed it.
    pub fn in_memory() -> (Self, Arc<InMemoryStore>) {
        let backend = Arc::new(InMemoryStore::new());
        (Self::from_backend(backend.clone()), backend)
    }
}
