//! Request identity
//!
//! [`resolve_identity`] runs once per request and stores a [`Principal`] in
//! the request extensions. Protected handlers take [`AuthUser`], which
//! rejects guests.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use http::HeaderMap;
use shared::error::{AppError, ErrorCode};
use shared::models::RestaurantUser;

use super::TokenIssuer;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub enum Principal {
    User(Box<RestaurantUser>),
    Guest,
}

/// Resolve the bearer token into a [`Principal`]. Never rejects.
pub async fn resolve_identity(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    let principal = resolve(&state, req.headers()).await;
    req.extensions_mut().insert(principal);
    next.run(req).await
}

async fn resolve(state: &AppState, headers: &HeaderMap) -> Principal {
    let Some(token) = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(TokenIssuer::extract_from_header)
    else {
        return Principal::Guest;
    };

    let Some(user_id) = state.tokens.decode_access(token).and_then(|c| c.user_id()) else {
        return Principal::Guest;
    };

    match state.store.find_user_by_id(user_id).await {
        Ok(Some(user)) => Principal::User(Box::new(user)),
        Ok(None) => {
            tracing::warn!(user_id, "Token refers to a missing user");
            Principal::Guest
        }
        Err(e) => {
            tracing::error!(user_id, error = %e, "Failed to load user for token");
            Principal::Guest
        }
    }
}

/// An authenticated, active user
#[derive(Debug, Clone)]
pub struct AuthUser(pub RestaurantUser);

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Principal>() {
            Some(Principal::User(user)) if !user.is_active => {
                Err(AppError::new(ErrorCode::AccountInactive))
            }
            Some(Principal::User(user)) => Ok(AuthUser(user.as_ref().clone())),
            _ => Err(AppError::not_authenticated()),
        }
    }
}
