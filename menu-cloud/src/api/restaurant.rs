//! Restaurant routes

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use shared::error::ApiResponse;
use shared::models::{
    BranchCreated, BranchRestaurantCreate, Restaurant, RestaurantAddress, RestaurantAddressUpdate,
    RestaurantContactInfo, RestaurantContactInfoUpdate, RestaurantCreate, RestaurantDetail,
    RestaurantImages, RestaurantListItem, RestaurantOperationsTime,
    RestaurantOperationsTimeUpdate, RestaurantSocials, RestaurantSocialsUpdate, RestaurantUpdate,
};

use super::form::{FormData, Pagination};
use crate::auth::AuthUser;
use crate::error::ServiceResult;
use crate::services::restaurant;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/restaurant/fetch-restaurants", get(list))
        .route("/api/v1/restaurant", post(create))
        .route("/api/v1/restaurant/", post(create))
        .route("/api/v1/restaurant/update", put(update))
        .route(
            "/api/v1/restaurant/update-restaurant-address",
            put(update_address),
        )
        .route(
            "/api/v1/restaurant/update-restaurant-socials",
            put(update_socials),
        )
        .route(
            "/api/v1/restaurant/update-restaurant-contact",
            put(update_contact),
        )
        .route("/api/v1/restaurant/upload_images", put(upload_images))
        .route(
            "/api/v1/restaurant/update_operations_time",
            post(update_operations_time),
        )
        .route(
            "/api/v1/restaurant/delete_operations_time",
            post(delete_operations_time),
        )
        .route(
            "/api/v1/restaurant/create-branch-restaurant",
            post(create_branch),
        )
        .route(
            "/api/v1/restaurant/get-branch-restaurants",
            get(fetch_branches),
        )
        .route("/api/v1/restaurant/user-restaurant", get(user_restaurant))
        .route("/api/v1/restaurant/{id}", delete(remove))
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: i64,
}

async fn list(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> ServiceResult<Json<Vec<RestaurantListItem>>> {
    let items = restaurant::list_restaurants(&state, page.skip, page.limit).await?;
    Ok(Json(items))
}

async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(input): Json<RestaurantCreate>,
) -> ServiceResult<(StatusCode, Json<Restaurant>)> {
    let created = restaurant::create_restaurant(&state, &user, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(patch): Json<RestaurantUpdate>,
) -> ServiceResult<Json<Restaurant>> {
    Ok(Json(restaurant::update_restaurant(&state, &user, patch).await?))
}

async fn update_address(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(patch): Json<RestaurantAddressUpdate>,
) -> ServiceResult<Json<RestaurantAddress>> {
    Ok(Json(restaurant::update_address(&state, &user, patch).await?))
}

async fn update_socials(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(patch): Json<RestaurantSocialsUpdate>,
) -> ServiceResult<Json<RestaurantSocials>> {
    Ok(Json(restaurant::update_socials(&state, &user, patch).await?))
}

async fn update_contact(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(patch): Json<RestaurantContactInfoUpdate>,
) -> ServiceResult<Json<RestaurantContactInfo>> {
    Ok(Json(
        restaurant::update_contact_info(&state, &user, patch).await?,
    ))
}

async fn upload_images(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    multipart: Multipart,
) -> ServiceResult<Json<RestaurantImages>> {
    let mut form = FormData::read(multipart).await?;
    let logo = form.take_file("logo");
    let cover_photo = form.take_file("cover_photo");
    Ok(Json(
        restaurant::upload_images(&state, &user, logo, cover_photo).await?,
    ))
}

async fn update_operations_time(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(patch): Json<RestaurantOperationsTimeUpdate>,
) -> ServiceResult<Json<RestaurantOperationsTime>> {
    Ok(Json(
        restaurant::update_operations_time(&state, &user, patch).await?,
    ))
}

async fn delete_operations_time(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<IdQuery>,
) -> ServiceResult<ApiResponse> {
    restaurant::delete_operations_time(&state, &user, query.id).await?;
    Ok(ApiResponse::ok())
}

async fn create_branch(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(input): Json<BranchRestaurantCreate>,
) -> ServiceResult<(StatusCode, Json<BranchCreated>)> {
    let created = restaurant::create_branch(&state, &user, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn fetch_branches(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ServiceResult<Json<Vec<RestaurantDetail>>> {
    Ok(Json(restaurant::fetch_branches(&state, &user).await?))
}

async fn user_restaurant(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ServiceResult<Json<RestaurantDetail>> {
    Ok(Json(restaurant::get_user_restaurant(&state, &user).await?))
}

async fn remove(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> ServiceResult<StatusCode> {
    restaurant::delete_restaurant(&state, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
