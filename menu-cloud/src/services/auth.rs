//! Authentication flow: registration, login, refresh, profile

use shared::error::{AppError, ErrorCode};
use shared::models::{RestaurantUser, TokenPair, UserCreate, UserProfileUpdate};
use shared::util::now_millis;
use validator::ValidateEmail;

use super::upload::{self, ImageUpload};
use crate::auth::password::{self, MIN_PASSWORD_LEN};
use crate::error::ServiceResult;
use crate::state::AppState;

/// Emails are compared trimmed and lowercased
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Normalise and validate an email address
pub(crate) fn checked_email(email: &str) -> Result<String, AppError> {
    let email = normalize_email(email);
    if !email.validate_email() {
        return Err(AppError::validation("Invalid email address").with_detail("field", "email"));
    }
    Ok(email)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn hash_password(plaintext: &str) -> Result<String, AppError> {
    password::hash_password(plaintext).map_err(|e| {
        tracing::error!(error = %e, "Password hashing failed");
        AppError::new(ErrorCode::InternalError)
    })
}

pub async fn register(state: &AppState, input: UserCreate) -> ServiceResult<RestaurantUser> {
    let email = checked_email(&input.email)?;
    if input.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::with_message(
            ErrorCode::PasswordTooShort,
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        )
        .into());
    }

    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::new(ErrorCode::EmailExists).into());
    }

    let now = now_millis();
    let user = state
        .store
        .insert_user(RestaurantUser {
            id: 0,
            restaurant_id: None,
            email,
            image: None,
            password: hash_password(&input.password)?,
            first_name: non_blank(input.first_name),
            last_name: non_blank(input.last_name),
            level: Some(1),
            is_active: true,
            created_at: now,
            updated_at: now,
        })
        .await?;

    tracing::info!(user_id = user.id, "User registered");
    Ok(user)
}

pub async fn login(state: &AppState, email: &str, password: &str) -> ServiceResult<TokenPair> {
    let email = normalize_email(email);
    let Some(user) = state.store.find_user_by_email(&email).await? else {
        return Err(AppError::new(ErrorCode::EmailNotRegistered).into());
    };

    if !password::verify_password(password, &user.password) {
        tracing::info!(user_id = user.id, "Login with invalid credentials");
        return Err(AppError::invalid_credentials().into());
    }
    if !user.is_active {
        return Err(AppError::new(ErrorCode::AccountInactive).into());
    }

    let pair = state.tokens.issue(state.store.as_ref(), user.id, None).await?;
    tracing::info!(user_id = user.id, "User logged in");
    Ok(pair)
}

pub async fn refresh(state: &AppState, token: &str) -> ServiceResult<TokenPair> {
    state
        .tokens
        .validate_refresh(state.store.as_ref(), token)
        .await
}

pub async fn update_profile(
    state: &AppState,
    user: &RestaurantUser,
    mut patch: UserProfileUpdate,
    image: Option<ImageUpload>,
) -> ServiceResult<RestaurantUser> {
    if let Some(email) = patch.email.take() {
        let email = checked_email(&email)?;
        if email != user.email {
            let taken = state.store.find_user_by_email(&email).await?;
            if taken.is_some_and(|other| other.id != user.id) {
                return Err(AppError::new(ErrorCode::EmailExists).into());
            }
        }
        patch.email = Some(email);
    }
    patch.first_name = non_blank(patch.first_name);
    patch.last_name = non_blank(patch.last_name);

    if let Some(image) = image {
        patch.image = Some(upload::save_image(&state.config, &image).await?);
    }

    if patch.is_empty() {
        return Ok(user.clone());
    }

    let updated = state
        .store
        .update_user_profile(user.id, &patch, now_millis())
        .await?;

    tracing::info!(user_id = updated.id, "Profile updated");
    Ok(updated)
}
