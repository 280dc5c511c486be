//! Add-on routes

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use shared::models::{Addon, AddonCreate, AddonUpdate};

use crate::auth::AuthUser;
use crate::error::ServiceResult;
use crate::services::catalog;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/addon", get(list).post(create))
        .route("/api/v1/addon/{id}", put(update).delete(remove))
}

async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(input): Json<AddonCreate>,
) -> ServiceResult<(StatusCode, Json<Addon>)> {
    let addon = catalog::create_addon(&state, &user, input).await?;
    Ok((StatusCode::CREATED, Json(addon)))
}

async fn list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ServiceResult<Json<Vec<Addon>>> {
    Ok(Json(catalog::list_addons(&state, &user).await?))
}

async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(patch): Json<AddonUpdate>,
) -> ServiceResult<Json<Addon>> {
    Ok(Json(catalog::update_addon(&state, &user, id, patch).await?))
}

async fn remove(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> ServiceResult<StatusCode> {
    catalog::delete_addon(&state, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
