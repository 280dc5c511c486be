//! Category routes

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, put};
use axum::{Json, Router};
use shared::models::{Category, CategoryCreate, CategoryUpdate};

use crate::auth::AuthUser;
use crate::error::ServiceResult;
use crate::services::catalog;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/category", get(list).post(create))
        .route("/api/v1/category/{id}", put(update).delete(remove))
}

async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(input): Json<CategoryCreate>,
) -> ServiceResult<(StatusCode, Json<Category>)> {
    let category = catalog::create_category(&state, &user, input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

async fn list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ServiceResult<Json<Vec<Category>>> {
    Ok(Json(catalog::list_categories(&state, &user).await?))
}

async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Json(patch): Json<CategoryUpdate>,
) -> ServiceResult<Json<Category>> {
    Ok(Json(catalog::update_category(&state, &user, id, patch).await?))
}

async fn remove(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> ServiceResult<StatusCode> {
    catalog::delete_category(&state, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
