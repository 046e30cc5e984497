//! Zone persistence service.

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;
use validator::Validate;

use crate::errors::DomainError;
use crate::models::zone::{CreateZoneRequest, UpdateZoneRequest};
use crate::models::{NewZone, Zone, ZoneGeometry, ZonePatch};
use crate::stores::{StoreResult, ZoneStore};

/// Color applied to zones created without one.
pub const DEFAULT_ZONE_COLOR: &str = "#3B82F6";

/// Lists zones, widening an empty active-only result to all zones.
///
/// Rows created before the active flag existed may all read as inactive; an
/// operator should still see them.
pub async fn list_zones_with_fallback(
    store: &dyn ZoneStore,
    active_only: bool,
) -> StoreResult<Vec<Zone>> {
    let zones = store.list_zones(active_only).await?;
    if active_only && zones.is_empty() {
        debug!("No active zones, falling back to all zones");
        return store.list_zones(false).await;
    }
    Ok(zones)
}

/// Creates, reads, updates and deletes zones.
#[derive(Clone)]
pub struct GeometryStore {
    zones: Arc<dyn ZoneStore>,
    default_color: String,
}

impl GeometryStore {
    pub fn new(zones: Arc<dyn ZoneStore>, default_color: impl Into<String>) -> Self {
        Self {
            zones,
            default_color: default_color.into(),
        }
    }

    pub async fn create(
        &self,
        owner_id: Uuid,
        request: CreateZoneRequest,
    ) -> Result<Zone, DomainError> {
        request.validate()?;
        let name = non_blank_name(&request.name)?;
        let geometry = ZoneGeometry::from_json(request.geometry.as_ref())?;

        let color = request
            .color
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| self.default_color.clone());

        let zone = self
            .zones
            .insert_zone(NewZone {
                owner_id,
                name,
                description: request.description,
                geometry,
                color,
            })
            .await?;

        info!(
            zone_id = %zone.id,
            owner_id = %owner_id,
            geometry = zone.geometry.kind(),
            "Zone created"
        );

        Ok(zone)
    }

    pub async fn get(&self, id: Uuid) -> Result<Zone, DomainError> {
        self.zones
            .find_zone(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Zone", id))
    }

    pub async fn list(&self, active_only: bool) -> Result<Vec<Zone>, DomainError> {
        Ok(list_zones_with_fallback(self.zones.as_ref(), active_only).await?)
    }

    /// Merge-patches a zone. Absent fields keep their stored values.
    pub async fn update(&self, id: Uuid, request: UpdateZoneRequest) -> Result<Zone, DomainError> {
        request.validate()?;

        let patch = ZonePatch {
            name: request.name.as_deref().map(non_blank_name).transpose()?,
            description: request.description,
            geometry: request
                .geometry
                .as_ref()
                .map(|g| ZoneGeometry::from_json(Some(g)))
                .transpose()?,
            color: request.color.as_deref().map(non_blank_color).transpose()?,
            is_active: request.is_active,
        };

        if patch.is_empty() {
            return self.get(id).await;
        }

        let zone = self
            .zones
            .update_zone(id, patch)
            .await?
            .ok_or_else(|| DomainError::not_found("Zone", id))?;

        info!(zone_id = %id, "Zone updated");
        Ok(zone)
    }

    /// Deletes a zone. Deleting a missing zone succeeds and returns `false`.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let deleted = self.zones.delete_zone(id).await?;
        info!(zone_id = %id, deleted, "Zone delete requested");
        Ok(deleted)
    }
}

fn non_blank_color(color: &str) -> Result<String, DomainError> {
    let trimmed = color.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("color", "Color must not be blank"));
    }
    Ok(trimmed.to_string())
}

fn non_blank_name(name: &str) -> Result<String, DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("name", "Name is required"));
    }
    Ok(trimmed.to_string())
}
