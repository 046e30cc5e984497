//! HTTP route handlers.

pub mod auth;
pub mod drivers;
pub mod health;
pub mod warehouses;
pub mod zone_drivers;
pub mod zones;
