//! Persistence layer for the last-mile admin backend.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations of the domain store traits
//! - SQL migrations

pub mod db;
pub mod entities;
pub mod error;
pub mod metrics;
pub mod repositories;

use std::sync::Arc;

use domain::stores::Stores;
use sqlx::PgPool;

use repositories::{
    DriverRepository, UserRepository, WarehouseRepository, ZoneDriverRepository, ZoneRepository,
};

/// Builds the PostgreSQL-backed stores sharing one pool.
pub fn stores(pool: PgPool) -> Stores {
    Stores {
        zones: Arc::new(ZoneRepository::new(pool.clone())),
        drivers: Arc::new(DriverRepository::new(pool.clone())),
        assignments: Arc::new(ZoneDriverRepository::new(pool.clone())),
        warehouses: Arc::new(WarehouseRepository::new(pool.clone())),
        users: Arc::new(UserRepository::new(pool)),
    }
}
