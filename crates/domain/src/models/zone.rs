//! Delivery zone domain models.

use chrono::{DateTime, Utc};
use geo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::errors::DomainError;

use super::driver::ZoneDriverInfo;

/// A `[longitude, latitude]` pair, GeoJSON order.
pub type LngLat = [f64; 2];

/// Zone geometry, stored and exchanged as a GeoJSON-shaped tagged value.
///
/// Polygons carry rings; only the outer ring (the first) is meaningful here and
/// it is implicitly closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum ZoneGeometry {
    Point(LngLat),
    Polygon(Vec<Vec<LngLat>>),
}

impl ZoneGeometry {
    /// Parses and validates geometry from raw request JSON.
    ///
    /// Absent or `null` geometry, unknown types, non-numeric coordinates,
    /// out-of-range coordinates and polygons with fewer than three distinct
    /// vertices are all rejected as validation errors on `geometry`.
    pub fn from_json(value: Option<&serde_json::Value>) -> Result<Self, DomainError> {
        let value = match value {
            None | Some(serde_json::Value::Null) => {
                return Err(DomainError::validation("geometry", "Geometry is required"))
            }
            Some(v) => v,
        };

        let geometry: ZoneGeometry = serde_json::from_value(value.clone()).map_err(|e| {
            DomainError::validation("geometry", format!("Malformed geometry: {}", e))
        })?;
        geometry.validate()?;
        Ok(geometry)
    }

    /// Checks coordinate ranges and the polygon vertex count.
    pub fn validate(&self) -> Result<(), DomainError> {
        match self {
            ZoneGeometry::Point(coord) => check_coordinate(coord),
            ZoneGeometry::Polygon(rings) => {
                let ring = rings.first().ok_or_else(|| {
                    DomainError::validation("geometry", "Polygon must have an outer ring")
                })?;
                for coord in ring {
                    check_coordinate(coord)?;
                }

                let mut distinct: Vec<&LngLat> = Vec::with_capacity(ring.len());
                for coord in ring {
                    if !distinct.iter().any(|seen| *seen == coord) {
                        distinct.push(coord);
                    }
                }
                if distinct.len() < 3 {
                    return Err(DomainError::validation(
                        "geometry",
                        "Polygon must have at least 3 distinct vertices",
                    ));
                }
                Ok(())
            }
        }
    }

    /// The coordinate standing in for this zone in distance calculations.
    ///
    /// Points use themselves; polygons use their first vertex. No centroid is
    /// computed.
    pub fn representative_point(&self) -> Option<Point<f64>> {
        match self {
            ZoneGeometry::Point([lng, lat]) => Some(Point::new(*lng, *lat)),
            ZoneGeometry::Polygon(rings) => rings
                .first()
                .and_then(|ring| ring.first())
                .map(|[lng, lat]| Point::new(*lng, *lat)),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ZoneGeometry::Point(_) => "point",
            ZoneGeometry::Polygon(_) => "polygon",
        }
    }
}

fn check_coordinate(coord: &LngLat) -> Result<(), DomainError> {
    let [lng, lat] = *coord;
    shared::validation::validate_longitude(lng).map_err(|_| {
        DomainError::validation(
            "geometry",
            format!("Longitude {} must be between -180 and 180", lng),
        )
    })?;
    shared::validation::validate_latitude(lat).map_err(|_| {
        DomainError::validation(
            "geometry",
            format!("Latitude {} must be between -90 and 90", lat),
        )
    })
}

/// A delivery zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Zone {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub geometry: ZoneGeometry,
    pub color: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Zone {
    pub fn summary(&self) -> ZoneSummary {
        ZoneSummary {
            id: self.id,
            name: self.name.clone(),
            color: self.color.clone(),
        }
    }
}

/// Compact zone reference embedded in driver and warehouse listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ZoneSummary {
    pub id: Uuid,
    pub name: String,
    pub color: String,
}

/// Validated input for inserting a zone.
#[derive(Debug, Clone)]
pub struct NewZone {
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub geometry: ZoneGeometry,
    pub color: String,
}

/// Validated merge-patch for a zone. `None` leaves the stored value as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZonePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub geometry: Option<ZoneGeometry>,
    pub color: Option<String>,
    pub is_active: Option<bool>,
}

impl ZonePatch {
    pub fn is_empty(&self) -> bool {
        *self == ZonePatch::default()
    }
}

/// Request for creating a zone.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateZoneRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    pub description: Option<String>,
    /// Raw geometry; parsed by [`ZoneGeometry::from_json`].
    pub geometry: Option<serde_json::Value>,
    #[validate(length(min = 1, message = "Color must not be empty"))]
    pub color: Option<String>,
}

/// Request for updating a zone. Only provided fields change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateZoneRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "polygon")]
    pub geometry: Option<serde_json::Value>,
    #[validate(length(min = 1, message = "Color must not be empty"))]
    pub color: Option<String>,
    #[serde(alias = "isActive")]
    pub is_active: Option<bool>,
}

/// Query parameters for listing zones.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListZonesQuery {
    #[serde(default = "default_active_only", alias = "activeOnly")]
    pub active_only: bool,
}

impl Default for ListZonesQuery {
    fn default() -> Self {
        Self {
            active_only: default_active_only(),
        }
    }
}

fn default_active_only() -> bool {
    true
}

/// Query parameters for the nearest-zone preview.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveZoneQuery {
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude")]
    pub lng: f64,
}

/// Response wrapping a single zone.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneResponse {
    pub zone: Zone,
}

/// Zone with its assigned drivers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ZoneDetail {
    #[serde(flatten)]
    pub zone: Zone,
    pub assigned_drivers: Vec<ZoneDriverInfo>,
}

/// Response for fetching a single zone.
#[derive(Debug, Clone, Serialize)]
pub struct ZoneDetailResponse {
    pub zone: ZoneDetail,
}

/// Response for listing zones.
#[derive(Debug, Clone, Serialize)]
pub struct ListZonesResponse {
    pub zones: Vec<Zone>,
    pub total: usize,
}

/// Response for deleting a zone. `deleted` is false when the zone was already gone.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DeleteZoneResponse {
    pub deleted: bool,
    pub zone_id: Uuid,
}

/// Response for the nearest-zone preview.
#[derive(Debug, Clone, Serialize)]
pub struct ResolveZoneResponse {
    pub zone: Option<Zone>,
}
