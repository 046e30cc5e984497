//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod driver;
pub mod user;
pub mod warehouse;
pub mod zone;

pub use driver::{DriverEntity, ZoneDriverEntity};
pub use user::UserEntity;
pub use warehouse::{WarehouseEntity, WarehouseWithZoneEntity};
pub use zone::{DriverZoneEntity, ZoneEntity};
