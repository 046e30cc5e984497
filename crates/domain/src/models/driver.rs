//! Driver and zone membership models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::zone::ZoneSummary;

/// A delivery driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Driver {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub phone: String,
    /// Identity documents, vehicle details and the like. Never interpreted.
    pub account_details: Option<serde_json::Value>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Validated input for inserting a driver.
#[derive(Debug, Clone)]
pub struct NewDriver {
    pub owner_id: Uuid,
    pub name: String,
    pub phone: String,
    pub password_hash: Option<String>,
    pub account_details: Option<serde_json::Value>,
}

/// Request for creating a driver.
///
/// Any fields besides the known ones are kept as the driver's account details.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateDriverRequest {
    #[serde(default)]
    #[validate(
        length(min = 1, max = 255, message = "Name is required"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: String,
    #[serde(default)]
    #[validate(
        length(min = 1, max = 50, message = "Phone is required"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub phone: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
    #[serde(alias = "zoneIds")]
    pub zone_ids: Option<Vec<Uuid>>,
    #[serde(flatten)]
    pub account_details: serde_json::Map<String, serde_json::Value>,
}

/// Driver with the zones it serves.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DriverWithZones {
    #[serde(flatten)]
    pub driver: Driver,
    pub zones: Vec<ZoneSummary>,
}

/// Response for listing drivers.
#[derive(Debug, Clone, Serialize)]
pub struct ListDriversResponse {
    pub drivers: Vec<DriverWithZones>,
    pub total: usize,
}

/// Response for creating a driver.
#[derive(Debug, Clone, Serialize)]
pub struct CreateDriverResponse {
    pub driver: DriverWithZones,
}

/// A driver as seen from a zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ZoneDriverInfo {
    pub driver_id: Uuid,
    pub name: String,
    pub phone: String,
    pub assigned_at: DateTime<Utc>,
}

/// Request for assigning drivers to a zone. Accepts one id or a list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AssignDriversRequest {
    #[serde(alias = "driverId")]
    pub driver_id: Option<Uuid>,
    #[serde(alias = "driverIds")]
    pub driver_ids: Option<Vec<Uuid>>,
}

impl AssignDriversRequest {
    /// All requested driver ids, single id first.
    pub fn driver_ids(&self) -> Vec<Uuid> {
        self.driver_id
            .iter()
            .chain(self.driver_ids.iter().flatten())
            .copied()
            .collect()
    }
}

/// Result of an assignment call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AssignmentOutcome {
    pub assigned: Vec<Uuid>,
    pub already_assigned: Vec<Uuid>,
    pub unknown_drivers: Vec<Uuid>,
}

impl AssignmentOutcome {
    pub fn created_any(&self) -> bool {
        !self.assigned.is_empty()
    }
}

/// Response for assigning drivers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct AssignDriversResponse {
    pub zone_id: Uuid,
    #[serde(flatten)]
    pub outcome: AssignmentOutcome,
    pub message: String,
}

impl AssignDriversResponse {
    pub fn new(zone_id: Uuid, outcome: AssignmentOutcome) -> Self {
        let message = match (outcome.assigned.len(), outcome.already_assigned.len()) {
            (0, 0) => "No drivers assigned".to_string(),
            (0, _) => "Drivers already assigned to this zone".to_string(),
            (n, _) => format!("{} driver(s) assigned", n),
        };
        Self {
            zone_id,
            outcome,
            message,
        }
    }
}

/// Response for listing a zone's drivers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ZoneDriversResponse {
    pub zone_id: Uuid,
    pub drivers: Vec<ZoneDriverInfo>,
}

/// Response for removing a driver from a zone.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RemoveDriverResponse {
    pub removed: bool,
    pub zone_id: Uuid,
    pub driver_id: Uuid,
}
