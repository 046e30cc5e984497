//! Request-facing services that sit outside the domain crate.

pub mod auth;
pub mod cookies;

pub use auth::{AuthError, SessionAuthenticator};
pub use cookies::CookieHelper;
