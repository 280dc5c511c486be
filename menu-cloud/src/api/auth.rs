//! Authentication routes

use axum::extract::{Form, Multipart, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use shared::models::{RestaurantUser, TokenPair, UserCreate, UserProfileUpdate};

use super::form::FormData;
use crate::auth::AuthUser;
use crate::error::ServiceResult;
use crate::services::auth;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/auth/register-user", post(register))
        .route("/api/v1/auth/token", post(login))
        .route("/api/v1/auth/refresh-token", post(refresh))
        .route("/api/v1/auth/me", get(me))
        .route("/api/v1/restaurant/user-profile-update", put(update_profile))
}

/// OAuth2 password form; `username` carries the email
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshQuery {
    #[serde(default)]
    pub token: String,
}

async fn register(
    State(state): State<AppState>,
    Json(input): Json<UserCreate>,
) -> ServiceResult<(StatusCode, Json<RestaurantUser>)> {
    let user = auth::register(&state, input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ServiceResult<Json<TokenPair>> {
    let pair = auth::login(&state, &form.username, &form.password).await?;
    Ok(Json(pair))
}

async fn refresh(
    State(state): State<AppState>,
    Query(query): Query<RefreshQuery>,
) -> ServiceResult<(StatusCode, Json<TokenPair>)> {
    let pair = auth::refresh(&state, &query.token).await?;
    Ok((StatusCode::CREATED, Json(pair)))
}

async fn me(AuthUser(user): AuthUser) -> Json<RestaurantUser> {
    Json(user)
}

async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    multipart: Multipart,
) -> ServiceResult<Json<RestaurantUser>> {
    let mut form = FormData::read(multipart).await?;
    let patch = UserProfileUpdate {
        email: form.text("email"),
        first_name: form.text("first_name"),
        last_name: form.text("last_name"),
        image: None,
    };
    let image = form.take_file("image");
    let user = auth::update_profile(&state, &user, patch, image).await?;
    Ok(Json(user))
}
