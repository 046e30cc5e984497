//! Domain models for the last-mile admin API.

pub mod driver;
pub mod user;
pub mod warehouse;
pub mod zone;

pub use driver::{AssignmentOutcome, Driver, DriverWithZones, NewDriver, ZoneDriverInfo};
pub use user::User;
pub use warehouse::{NewWarehouse, Warehouse, WarehouseType, WarehouseWithZone};
pub use zone::{NewZone, Zone, ZoneGeometry, ZonePatch, ZoneSummary};
