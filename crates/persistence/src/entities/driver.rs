//! Driver entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Driver, ZoneDriverInfo};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the drivers table.
#[derive(Debug, Clone, FromRow)]
pub struct DriverEntity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub phone: String,
    pub account_details: Option<serde_json::Value>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DriverEntity> for Driver {
    fn from(entity: DriverEntity) -> Self {
        Self {
            id: entity.id,
            owner_id: entity.owner_id,
            name: entity.name,
            phone: entity.phone,
            account_details: entity.account_details,
            is_active: entity.is_active,
            created_at: entity.created_at,
        }
    }
}

/// A zone_drivers row joined with the driver's contact fields.
#[derive(Debug, Clone, FromRow)]
pub struct ZoneDriverEntity {
    pub driver_id: Uuid,
    pub name: String,
    pub phone: String,
    pub assigned_at: DateTime<Utc>,
}

impl From<ZoneDriverEntity> for ZoneDriverInfo {
    fn from(entity: ZoneDriverEntity) -> Self {
        Self {
            driver_id: entity.driver_id,
            name: entity.name,
            phone: entity.phone,
            assigned_at: entity.assigned_at,
        }
    }
}
