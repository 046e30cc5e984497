//! Domain layer for the last-mile admin backend.
//!
//! This crate contains:
//! - Domain models (Zone, Driver, Warehouse, User)
//! - Store traits and an in-memory store
//! - Zone geometry, nearest-zone resolution, driver linking and warehouse registration
//! - Domain error types

pub mod errors;
pub mod models;
pub mod services;
pub mod stores;

pub use errors::{DomainError, StoreError};
