//! Warehouse registration with nearest-zone assignment.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::errors::DomainError;
use crate::models::warehouse::{CreateWarehouseRequest, CreatedWarehouse, WarehouseDefaults};
use crate::models::WarehouseWithZone;
use crate::stores::WarehouseStore;

use super::zone_resolver::ZoneAssignmentResolver;

/// Registers warehouses and lists them with their zones.
#[derive(Clone)]
pub struct WarehouseRegistry {
    warehouses: Arc<dyn WarehouseStore>,
    resolver: ZoneAssignmentResolver,
    defaults: WarehouseDefaults,
}

impl WarehouseRegistry {
    pub fn new(
        warehouses: Arc<dyn WarehouseStore>,
        resolver: ZoneAssignmentResolver,
        defaults: WarehouseDefaults,
    ) -> Self {
        Self {
            warehouses,
            resolver,
            defaults,
        }
    }

    /// Validates, resolves the nearest zone and persists the warehouse.
    ///
    /// The zone id is a snapshot taken now; later zone changes do not move it.
    pub async fn create(
        &self,
        owner_id: Uuid,
        request: CreateWarehouseRequest,
    ) -> Result<CreatedWarehouse, DomainError> {
        let mut new = request.into_new_warehouse(owner_id, &self.defaults)?;

        let zone = self.resolver.resolve(new.latitude, new.longitude).await?;
        new.assigned_zone_id = zone.as_ref().map(|z| z.id);

        let warehouse = self.warehouses.insert_warehouse(new).await?;

        info!(
            warehouse_id = %warehouse.id,
            owner_id = %owner_id,
            zone_id = ?warehouse.assigned_zone_id,
            "Warehouse created"
        );

        Ok(CreatedWarehouse { warehouse, zone })
    }

    /// Active warehouses, newest first, each with its zone if it still exists.
    pub async fn list(&self) -> Result<Vec<WarehouseWithZone>, DomainError> {
        Ok(self.warehouses.list_active_warehouses().await?)
    }
}
