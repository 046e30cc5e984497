//! Domain services for the last-mile admin API.
//!
//! Services hold the business rules and work against the store traits, so the
//! same code runs over PostgreSQL and the in-memory backend.

pub mod driver_registry;
pub mod driver_zone_linker;
pub mod geometry_store;
pub mod warehouse_registry;
pub mod zone_resolver;

pub use driver_registry::DriverRegistry;
pub use driver_zone_linker::DriverZoneLinker;
pub use geometry_store::{list_zones_with_fallback, GeometryStore, DEFAULT_ZONE_COLOR};
pub use warehouse_registry::WarehouseRegistry;
pub use zone_resolver::{degree_distance, nearest_zone, ZoneAssignmentResolver};
