//! API routes for menu-cloud

pub mod addon;
pub mod auth;
pub mod category;
pub mod dish;
pub mod form;
pub mod health;
pub mod restaurant;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::{Router, middleware};
use http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::auth::resolve_identity;
use crate::config::Config;
use crate::services::upload::STATIC_PREFIX;
use crate::state::AppState;

/// Multipart bodies carry up to two images plus text fields
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Create the combined router
pub fn build_app(state: AppState) -> Router {
    let body_limit = state.config.max_image_size_bytes * 2 + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/", get(health::health_check))
        .route("/health", get(health::health_check))
        .merge(auth::router())
        .merge(restaurant::router())
        .merge(category::router())
        .merge(addon::router())
        .merge(dish::router())
        .nest_service(STATIC_PREFIX, ServeDir::new(&state.config.upload_dir))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            resolve_identity,
        ))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
