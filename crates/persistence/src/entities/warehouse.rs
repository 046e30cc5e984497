//! Warehouse entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Warehouse, WarehouseType, WarehouseWithZone, ZoneSummary};
use domain::StoreError;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the warehouses table.
#[derive(Debug, Clone, FromRow)]
pub struct WarehouseEntity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub city: String,
    pub state: Option<String>,
    pub country: String,
    pub postal_code: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub manager_name: Option<String>,
    pub manager_phone: Option<String>,
    pub working_hours: Option<serde_json::Value>,
    pub capacity: i32,
    pub warehouse_type: String,
    pub features: Option<serde_json::Value>,
    pub assigned_zone_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<WarehouseEntity> for Warehouse {
    type Error = StoreError;

    fn try_from(entity: WarehouseEntity) -> Result<Self, Self::Error> {
        let warehouse_type = WarehouseType::parse(&entity.warehouse_type).ok_or_else(|| {
            StoreError::InvalidRow(format!(
                "warehouse {} has unknown type '{}'",
                entity.id, entity.warehouse_type
            ))
        })?;

        Ok(Self {
            id: entity.id,
            owner_id: entity.owner_id,
            name: entity.name,
            description: entity.description,
            address: entity.address,
            city: entity.city,
            state: entity.state,
            country: entity.country,
            postal_code: entity.postal_code,
            latitude: entity.latitude,
            longitude: entity.longitude,
            phone: entity.phone,
            email: entity.email,
            manager_name: entity.manager_name,
            manager_phone: entity.manager_phone,
            working_hours: entity.working_hours,
            capacity: entity.capacity,
            warehouse_type,
            features: entity.features,
            assigned_zone_id: entity.assigned_zone_id,
            is_active: entity.is_active,
            created_at: entity.created_at,
        })
    }
}

/// Warehouse row left-joined with its zone. Zone columns are null when the
/// zone no longer exists.
#[derive(Debug, Clone, FromRow)]
pub struct WarehouseWithZoneEntity {
    #[sqlx(flatten)]
    pub warehouse: WarehouseEntity,
    pub zone_ref_id: Option<Uuid>,
    pub zone_name: Option<String>,
    pub zone_color: Option<String>,
}

impl TryFrom<WarehouseWithZoneEntity> for WarehouseWithZone {
    type Error = StoreError;

    fn try_from(entity: WarehouseWithZoneEntity) -> Result<Self, Self::Error> {
        let zone = match (entity.zone_ref_id, entity.zone_name, entity.zone_color) {
            (Some(id), Some(name), Some(color)) => Some(ZoneSummary { id, name, color }),
            _ => None,
        };

        Ok(Self {
            warehouse: entity.warehouse.try_into()?,
            zone,
        })
    }
}
