//! Driver to zone membership.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{DomainError, StoreError};
use crate::models::{AssignmentOutcome, ZoneDriverInfo};
use crate::stores::{AssignmentStore, ZoneStore};

/// Assigns drivers to zones and removes them again.
///
/// Duplicate assignments are detected by the store's uniqueness constraint,
/// not by a lookup beforehand, so concurrent calls cannot create two rows.
#[derive(Clone)]
pub struct DriverZoneLinker {
    zones: Arc<dyn ZoneStore>,
    assignments: Arc<dyn AssignmentStore>,
}

impl DriverZoneLinker {
    pub fn new(zones: Arc<dyn ZoneStore>, assignments: Arc<dyn AssignmentStore>) -> Self {
        Self { zones, assignments }
    }

    /// Assigns every driver in `driver_ids` to the zone.
    ///
    /// Existing memberships are reported as already assigned. Ids that match
    /// no driver are reported as unknown. Neither fails the call.
    pub async fn assign(
        &self,
        zone_id: Uuid,
        driver_ids: &[Uuid],
    ) -> Result<AssignmentOutcome, DomainError> {
        if driver_ids.is_empty() {
            return Err(DomainError::validation(
                "driver_ids",
                "At least one driver id is required",
            ));
        }
        self.ensure_zone(zone_id).await?;

        let mut outcome = AssignmentOutcome::default();
        let mut seen: Vec<Uuid> = Vec::with_capacity(driver_ids.len());

        for &driver_id in driver_ids {
            if seen.contains(&driver_id) {
                continue;
            }
            seen.push(driver_id);

            match self.assignments.insert_assignment(zone_id, driver_id).await {
                Ok(()) => outcome.assigned.push(driver_id),
                Err(StoreError::UniqueViolation(_)) => outcome.already_assigned.push(driver_id),
                Err(StoreError::MissingReference(column)) if column == "driver_id" => {
                    warn!(zone_id = %zone_id, driver_id = %driver_id, "Assignment skipped for unknown driver");
                    outcome.unknown_drivers.push(driver_id);
                }
                Err(StoreError::MissingReference(_)) => {
                    // Zone was deleted while assigning.
                    return Err(DomainError::not_found("Zone", zone_id));
                }
                Err(e) => return Err(e.into()),
            }
        }

        info!(
            zone_id = %zone_id,
            assigned = outcome.assigned.len(),
            already_assigned = outcome.already_assigned.len(),
            unknown = outcome.unknown_drivers.len(),
            "Drivers assigned to zone"
        );

        Ok(outcome)
    }

    /// Drivers assigned to a zone, in assignment order.
    pub async fn list(&self, zone_id: Uuid) -> Result<Vec<ZoneDriverInfo>, DomainError> {
        self.ensure_zone(zone_id).await?;
        Ok(self.assignments.list_zone_drivers(zone_id).await?)
    }

    /// Removes a membership. Returns `false` when there was nothing to remove.
    pub async fn remove(&self, zone_id: Uuid, driver_id: Uuid) -> Result<bool, DomainError> {
        let removed = self.assignments.delete_assignment(zone_id, driver_id).await?;
        info!(zone_id = %zone_id, driver_id = %driver_id, removed, "Driver removed from zone");
        Ok(removed)
    }

    async fn ensure_zone(&self, zone_id: Uuid) -> Result<(), DomainError> {
        match self.zones.find_zone(zone_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found("Zone", zone_id)),
        }
    }
}
