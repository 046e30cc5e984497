//! Warehouse domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::DomainError;

use super::zone::{Zone, ZoneSummary};

/// Kind of warehouse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarehouseType {
    #[default]
    Standard,
    PickupPoint,
    DistributionCenter,
}

impl WarehouseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WarehouseType::Standard => "standard",
            WarehouseType::PickupPoint => "pickup_point",
            WarehouseType::DistributionCenter => "distribution_center",
        }
    }

    /// Parses the stored or requested form. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "standard" => Some(WarehouseType::Standard),
            "pickup_point" => Some(WarehouseType::PickupPoint),
            "distribution_center" => Some(WarehouseType::DistributionCenter),
            _ => None,
        }
    }
}

impl std::fmt::Display for WarehouseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A coordinate sent either as a JSON number or as a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoordinateInput {
    Number(f64),
    Text(String),
}

impl CoordinateInput {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CoordinateInput::Number(n) => Some(*n),
            CoordinateInput::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

impl From<f64> for CoordinateInput {
    fn from(value: f64) -> Self {
        CoordinateInput::Number(value)
    }
}

/// A warehouse with its snapshot zone assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Warehouse {
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
    pub warehouse_type: WarehouseType,
    pub features: Option<serde_json::Value>,
    /// Zone resolved at creation time. Not kept in sync afterwards.
    pub assigned_zone_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Request for creating a warehouse.
///
/// Required fields are optional here so a missing field surfaces as a
/// validation error naming it rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateWarehouseRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub latitude: Option<CoordinateInput>,
    pub longitude: Option<CoordinateInput>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub manager_name: Option<String>,
    pub manager_phone: Option<String>,
    pub working_hours: Option<serde_json::Value>,
    pub capacity: Option<i64>,
    pub warehouse_type: Option<String>,
    pub features: Option<serde_json::Value>,
}

/// Values applied when a request leaves a field out.
#[derive(Debug, Clone)]
pub struct WarehouseDefaults {
    pub capacity: i32,
    pub country: String,
}

impl Default for WarehouseDefaults {
    fn default() -> Self {
        Self {
            capacity: 100,
            country: "Saudi Arabia".to_string(),
        }
    }
}

/// Validated input for inserting a warehouse.
#[derive(Debug, Clone)]
pub struct NewWarehouse {
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
    pub warehouse_type: WarehouseType,
    pub features: Option<serde_json::Value>,
    pub assigned_zone_id: Option<Uuid>,
}

impl CreateWarehouseRequest {
    /// Checks every field and applies defaults. The zone is left unassigned.
    pub fn into_new_warehouse(
        self,
        owner_id: Uuid,
        defaults: &WarehouseDefaults,
    ) -> Result<NewWarehouse, DomainError> {
        let name = required_text("name", self.name)?;
        let address = required_text("address", self.address)?;
        let city = required_text("city", self.city)?;

        let latitude = coordinate("latitude", self.latitude.as_ref())?;
        shared::validation::validate_latitude(latitude).map_err(|_| {
            DomainError::validation("latitude", "Latitude must be between -90 and 90")
        })?;
        let longitude = coordinate("longitude", self.longitude.as_ref())?;
        shared::validation::validate_longitude(longitude).map_err(|_| {
            DomainError::validation("longitude", "Longitude must be between -180 and 180")
        })?;

        let capacity = match self.capacity {
            None => defaults.capacity,
            Some(c) if c > 0 && c <= i64::from(i32::MAX) => c as i32,
            Some(_) => {
                return Err(DomainError::validation(
                    "capacity",
                    "Capacity must be a positive integer",
                ))
            }
        };

        let warehouse_type = match self.warehouse_type.as_deref().map(str::trim) {
            None | Some("") => WarehouseType::default(),
            Some(value) => WarehouseType::parse(value).ok_or_else(|| {
                DomainError::validation(
                    "warehouse_type",
                    format!(
                        "Unknown warehouse type '{}', expected standard, pickup_point or distribution_center",
                        value
                    ),
                )
            })?,
        };

        let country = optional_text(self.country).unwrap_or_else(|| defaults.country.clone());

        Ok(NewWarehouse {
            owner_id,
            name,
            description: optional_text(self.description),
            address,
            city,
            state: optional_text(self.state),
            country,
            postal_code: optional_text(self.postal_code),
            latitude,
            longitude,
            phone: optional_text(self.phone),
            email: optional_text(self.email),
            manager_name: optional_text(self.manager_name),
            manager_phone: optional_text(self.manager_phone),
            working_hours: self.working_hours.filter(|v| !v.is_null()),
            capacity,
            warehouse_type,
            features: self.features.filter(|v| !v.is_null()),
            assigned_zone_id: None,
        })
    }
}

fn required_text(field: &str, value: Option<String>) -> Result<String, DomainError> {
    optional_text(value).ok_or_else(|| {
        DomainError::validation(field, format!("{} is required", capitalize(field)))
    })
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn coordinate(field: &str, value: Option<&CoordinateInput>) -> Result<f64, DomainError> {
    let value = value.ok_or_else(|| {
        DomainError::validation(field, format!("{} is required", capitalize(field)))
    })?;
    value
        .as_f64()
        .ok_or_else(|| DomainError::validation(field, format!("{} must be a number", capitalize(field))))
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Warehouse joined with its assigned zone, when that zone still exists.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct WarehouseWithZone {
    #[serde(flatten)]
    pub warehouse: Warehouse,
    pub zone: Option<ZoneSummary>,
}

/// Result of creating a warehouse.
#[derive(Debug, Clone)]
pub struct CreatedWarehouse {
    pub warehouse: Warehouse,
    pub zone: Option<Zone>,
}

/// Response for creating a warehouse.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateWarehouseResponse {
    pub warehouse: WarehouseWithZone,
    pub message: String,
}

impl From<CreatedWarehouse> for CreateWarehouseResponse {
    fn from(created: CreatedWarehouse) -> Self {
        let message = match &created.zone {
            Some(zone) => format!("Warehouse created and assigned to zone {}", zone.name),
            None => "Warehouse created without a zone".to_string(),
        };
        Self {
            warehouse: WarehouseWithZone {
                warehouse: created.warehouse,
                zone: created.zone.as_ref().map(Zone::summary),
            },
            message,
        }
    }
}

/// Response for listing warehouses.
#[derive(Debug, Clone, Serialize)]
pub struct ListWarehousesResponse {
    pub warehouses: Vec<WarehouseWithZone>,
    pub total: usize,
}
