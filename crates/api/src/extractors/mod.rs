//! Custom Axum extractors.

pub mod request;
pub mod user_auth;

pub use request::{JsonBody, QueryParams};
pub use user_auth::UserAuth;
