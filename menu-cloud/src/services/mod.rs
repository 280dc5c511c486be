//! Business flows
//!
//! Handlers stay thin: they parse the request and call one function here
//! with the acting user passed explicitly.

pub mod auth;
pub mod catalog;
pub mod restaurant;
pub mod upload;
