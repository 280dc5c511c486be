//! Dish routes
//!
//! Create and update take multipart forms so an image can ride along;
//! `addon_ids` is a comma separated list.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_decimal::Decimal;
use shared::error::AppError;
use shared::models::{Dish, DishCreate, DishDetail, DishUpdate};

use super::form::{FormData, Pagination};
use crate::auth::AuthUser;
use crate::error::ServiceResult;
use crate::services::catalog;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/dish", post(create))
        .route("/api/v1/dish/{id}", get(get_one).put(update).delete(remove))
        .route("/api/v1/dish/restaurant/{slug}", get(list_by_slug))
}

fn dish_create(form: &FormData) -> Result<DishCreate, AppError> {
    Ok(DishCreate {
        category_id: form.require("category_id")?,
        name: form.require("name")?,
        price: form.require::<Decimal>("price")?,
        discount: form.parse("discount")?,
        availability: form.text("availability"),
        image: None,
        description: form.text("description"),
        spice_level: form.require("spice_level")?,
        hot_seller: form.text("hot_seller"),
        sub_category: form.text("sub_category"),
        variant: form.text("variant"),
        addon_ids: form.ids("addon_ids")?.unwrap_or_default(),
    })
}

fn dish_update(form: &FormData) -> Result<DishUpdate, AppError> {
    Ok(DishUpdate {
        category_id: form.parse("category_id")?,
        name: form.text("name"),
        price: form.parse("price")?,
        discount: form.parse("discount")?,
        availability: form.text("availability"),
        image: None,
        description: form.text("description"),
        spice_level: form.text("spice_level"),
        hot_seller: form.text("hot_seller"),
        sub_category: form.text("sub_category"),
        variant: form.text("variant"),
        addon_ids: form.ids("addon_ids")?,
    })
}

async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    multipart: Multipart,
) -> ServiceResult<(StatusCode, Json<Dish>)> {
    let mut form = FormData::read(multipart).await?;
    let input = dish_create(&form)?;
    let image = form.take_file("image");
    let dish = catalog::create_dish(&state, &user, input, image).await?;
    Ok((StatusCode::CREATED, Json(dish)))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ServiceResult<Json<DishDetail>> {
    Ok(Json(catalog::get_dish(&state, id).await?))
}

async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> ServiceResult<Json<Dish>> {
    let mut form = FormData::read(multipart).await?;
    let patch = dish_update(&form)?;
    let image = form.take_file("image");
    Ok(Json(
        catalog::update_dish(&state, &user, id, patch, image).await?,
    ))
}

async fn remove(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> ServiceResult<StatusCode> {
    catalog::delete_dish(&state, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(page): Query<Pagination>,
) -> ServiceResult<Json<Vec<Dish>>> {
    Ok(Json(
        catalog::list_dishes_by_slug(&state, &slug, page.skip, page.limit).await?,
    ))
}
