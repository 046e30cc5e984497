//! Repository implementations for database operations.

pub mod driver;
pub mod user;
pub mod warehouse;
pub mod zone;
pub mod zone_driver;

pub use driver::DriverRepository;
pub use user::UserRepository;
pub use warehouse::WarehouseRepository;
pub use zone::ZoneRepository;
pub use zone_driver::ZoneDriverRepository;
