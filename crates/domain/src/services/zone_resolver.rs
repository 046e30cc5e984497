//! Nearest-zone resolution.
//!
//! A coordinate is matched to the zone whose representative point is closest
//! by straight-line distance in degree space. This is proximity, not
//! containment: a warehouse outside every polygon still gets the nearest zone.

use std::cmp::Ordering;
use std::sync::Arc;

use geo::{EuclideanDistance, Point};
use tracing::debug;

use crate::errors::DomainError;
use crate::models::Zone;
use crate::stores::ZoneStore;

use super::geometry_store::list_zones_with_fallback;

/// Distance between two `(lng, lat)` points, in degrees.
pub fn degree_distance(a: &Point<f64>, b: &Point<f64>) -> f64 {
    a.euclidean_distance(b)
}

/// Picks the zone nearest to `target`.
///
/// Ties go to the earliest created zone, then to the smallest id. Zones
/// without a usable representative point are ignored.
pub fn nearest_zone<'a>(zones: &'a [Zone], target: &Point<f64>) -> Option<&'a Zone> {
    zones
        .iter()
        .filter_map(|zone| {
            zone.geometry
                .representative_point()
                .map(|point| (zone, degree_distance(&point, target)))
        })
        .min_by(|(a, da), (b, db)| {
            da.partial_cmp(db)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.created_at.cmp(&b.created_at))
                .then_with(|| a.id.cmp(&b.id))
        })
        .map(|(zone, _)| zone)
}

/// Resolves coordinates to the nearest zone.
#[derive(Clone)]
pub struct ZoneAssignmentResolver {
    zones: Arc<dyn ZoneStore>,
}

impl ZoneAssignmentResolver {
    pub fn new(zones: Arc<dyn ZoneStore>) -> Self {
        Self { zones }
    }

    /// Returns the nearest zone, or `None` when no zones exist.
    ///
    /// Candidates are active zones, or every zone when none is active.
    pub async fn resolve(&self, lat: f64, lng: f64) -> Result<Option<Zone>, DomainError> {
        shared::validation::validate_latitude(lat).map_err(|_| {
            DomainError::validation("latitude", "Latitude must be between -90 and 90")
        })?;
        shared::validation::validate_longitude(lng).map_err(|_| {
            DomainError::validation("longitude", "Longitude must be between -180 and 180")
        })?;

        let zones = list_zones_with_fallback(self.zones.as_ref(), true).await?;
        let target = Point::new(lng, lat);
        let nearest = nearest_zone(&zones, &target).cloned();

        debug!(
            lat,
            lng,
            candidates = zones.len(),
            zone_id = ?nearest.as_ref().map(|z| z.id),
            "Resolved nearest zone"
        );

        Ok(nearest)
    }
}
