//! Data models
//!
//! Shared between menu-cloud and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64`, timestamps are unix milliseconds unless noted.

pub mod catalog;
pub mod restaurant;
pub mod satellite;
pub mod token;
pub mod user;

// Re-exports
pub use catalog::*;
pub use restaurant::*;
pub use satellite::*;
pub use token::*;
pub use user::*;
