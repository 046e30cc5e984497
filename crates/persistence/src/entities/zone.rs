//! Zone entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{Zone, ZoneGeometry};
use domain::StoreError;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the zones table.
///
/// `polygon` is the legacy geometry column, read only when `geometry` is null.
#[derive(Debug, Clone, FromRow)]
pub struct ZoneEntity {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub geometry: Option<serde_json::Value>,
    pub polygon: Option<serde_json::Value>,
    pub color: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ZoneEntity> for Zone {
    type Error = StoreError;

    fn try_from(entity: ZoneEntity) -> Result<Self, Self::Error> {
        let raw = entity
            .geometry
            .filter(|v| !v.is_null())
            .or(entity.polygon.filter(|v| !v.is_null()))
            .ok_or_else(|| StoreError::InvalidRow(format!("zone {} has no geometry", entity.id)))?;

        let geometry: ZoneGeometry = serde_json::from_value(raw).map_err(|e| {
            StoreError::InvalidRow(format!("zone {} has unreadable geometry: {}", entity.id, e))
        })?;

        Ok(Self {
            id: entity.id,
            owner_id: entity.owner_id,
            name: entity.name,
            description: entity.description,
            geometry,
            color: entity.color,
            is_active: entity.is_active,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

/// Zone summary joined onto another row.
#[derive(Debug, Clone, FromRow)]
pub struct DriverZoneEntity {
    pub driver_id: Uuid,
    pub zone_id: Uuid,
    pub zone_name: String,
    pub zone_color: String,
}
