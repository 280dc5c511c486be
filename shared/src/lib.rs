//! Shared types for the menu platform
//!
//! Domain models, the unified error system and small utilities used by
//! `menu-cloud` and its clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};
