//! menu-cloud: multi-tenant restaurant menu service
//!
//! REST API for restaurant owners (account, restaurant profile, branches,
//! categories, add-ons, dishes) plus public menu lookups by URL slug.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod services;
pub mod state;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
