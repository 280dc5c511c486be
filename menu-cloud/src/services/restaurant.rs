//! Restaurant management flow
//!
//! Every operation takes the acting user explicitly. A user owns at most
//! one restaurant; owners of a top-level restaurant may create branches
//! (one level deep), each with its own provisioned owner account.

use shared::error::{AppError, ErrorCode};
use shared::models::{
    BranchCreated, BranchRestaurantCreate, Restaurant, RestaurantAddress, RestaurantAddressUpdate,
    RestaurantContactInfo, RestaurantContactInfoUpdate, RestaurantCreate, RestaurantDetail,
    RestaurantImages, RestaurantImagesUpdate, RestaurantListItem, RestaurantOperationsTime,
    RestaurantOperationsTimeUpdate, RestaurantSocials, RestaurantSocialsUpdate, RestaurantUpdate,
    RestaurantUser,
};
use shared::util::now_millis;

use super::auth::{checked_email, hash_password};
use super::upload::{self, ImageUpload};
use crate::auth::password::generate_password;
use crate::error::ServiceResult;
use crate::state::AppState;

// ── Lookups ──

/// The restaurant the user owns
pub async fn owned_restaurant(state: &AppState, user: &RestaurantUser) -> ServiceResult<Restaurant> {
    let Some(restaurant_id) = user.restaurant_id else {
        return Err(AppError::new(ErrorCode::NoRestaurantAssigned).into());
    };
    state
        .store
        .find_restaurant(restaurant_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound).into())
}

/// Owned restaurant that may have branches
async fn owned_parent(state: &AppState, user: &RestaurantUser) -> ServiceResult<Restaurant> {
    let restaurant = owned_restaurant(state, user).await?;
    if restaurant.parent_restaurant_id.is_some() {
        return Err(AppError::new(ErrorCode::NotParentRestaurant).into());
    }
    Ok(restaurant)
}

async fn parent_summary(
    state: &AppState,
    restaurant: &Restaurant,
) -> ServiceResult<Option<shared::models::RestaurantSummary>> {
    let Some(parent_id) = restaurant.parent_restaurant_id else {
        return Ok(None);
    };
    Ok(state
        .store
        .find_restaurant(parent_id)
        .await?
        .map(|parent| parent.summary()))
}

/// Restaurant with every satellite record joined
pub async fn detail(state: &AppState, restaurant: Restaurant) -> ServiceResult<RestaurantDetail> {
    let store = state.store.as_ref();
    let id = restaurant.id;
    Ok(RestaurantDetail {
        contact_info: store.find_contact_info(id).await?,
        images: store.find_images(id).await?,
        address: store.find_address(id).await?,
        socials: store.find_socials(id).await?,
        operations_time: store.list_operations_time(id).await?,
        user: store.find_restaurant_owner(id).await?,
        parent_restaurant: parent_summary(state, &restaurant).await?,
        restaurant,
    })
}

pub async fn get_user_restaurant(
    state: &AppState,
    user: &RestaurantUser,
) -> ServiceResult<RestaurantDetail> {
    let restaurant = owned_restaurant(state, user).await?;
    detail(state, restaurant).await
}

pub async fn fetch_branches(
    state: &AppState,
    user: &RestaurantUser,
) -> ServiceResult<Vec<RestaurantDetail>> {
    let parent = owned_parent(state, user).await?;
    let branches = state.store.list_branches(parent.id).await?;

    let mut details = Vec::with_capacity(branches.len());
    for branch in branches {
        details.push(detail(state, branch).await?);
    }
    Ok(details)
}

pub async fn list_restaurants(
    state: &AppState,
    skip: i64,
    limit: i64,
) -> ServiceResult<Vec<RestaurantListItem>> {
    let restaurants = state.store.list_restaurants(skip, limit).await?;

    let mut items = Vec::with_capacity(restaurants.len());
    for restaurant in restaurants {
        items.push(RestaurantListItem {
            parent_restaurant: parent_summary(state, &restaurant).await?,
            restaurant,
        });
    }
    Ok(items)
}

// ── Create / update / delete ──

fn required(value: &str, field: &'static str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} is required"),
        )
        .with_detail("field", field));
    }
    Ok(value.to_string())
}

fn cleaned(input: RestaurantCreate) -> Result<RestaurantCreate, AppError> {
    Ok(RestaurantCreate {
        business_number: required(&input.business_number, "business_number")?,
        restaurant_name: required(&input.restaurant_name, "restaurant_name")?,
        url_slug: required(&input.url_slug, "url_slug")?,
        tagline: input.tagline.trim().to_string(),
    })
}

/// Each identifying field must not be held by another restaurant
async fn ensure_unique(
    state: &AppState,
    business_number: Option<&str>,
    restaurant_name: Option<&str>,
    url_slug: Option<&str>,
    own_id: Option<i64>,
) -> ServiceResult<()> {
    let store = state.store.as_ref();
    let taken = |found: Option<Restaurant>| found.is_some_and(|r| Some(r.id) != own_id);

    if let Some(name) = restaurant_name
        && taken(store.find_restaurant_by_name(name).await?)
    {
        return Err(AppError::with_message(
            ErrorCode::RestaurantNameExists,
            "A restaurant with this name already exists.",
        )
        .into());
    }
    if let Some(number) = business_number
        && taken(store.find_restaurant_by_business_number(number).await?)
    {
        return Err(AppError::with_message(
            ErrorCode::BusinessNumberExists,
            "A restaurant with this business number already exists.",
        )
        .into());
    }
    if let Some(slug) = url_slug
        && taken(store.find_restaurant_by_slug(slug).await?)
    {
        return Err(AppError::with_message(
            ErrorCode::UrlSlugExists,
            "A restaurant with this url slug already exists.",
        )
        .into());
    }
    Ok(())
}

fn new_restaurant(input: RestaurantCreate, parent_id: Option<i64>, now: i64) -> Restaurant {
    Restaurant {
        id: 0,
        business_number: input.business_number,
        restaurant_name: input.restaurant_name,
        url_slug: input.url_slug,
        tagline: input.tagline,
        is_branch: parent_id.is_some(),
        parent_restaurant_id: parent_id,
        created_at: now,
        updated_at: now,
    }
}

/// Create a restaurant and make the user its owner (one transaction)
pub async fn create_restaurant(
    state: &AppState,
    user: &RestaurantUser,
    input: RestaurantCreate,
) -> ServiceResult<Restaurant> {
    if user.owns_restaurant() {
        return Err(AppError::new(ErrorCode::RestaurantAlreadyAssigned).into());
    }
    let input = cleaned(input)?;
    ensure_unique(
        state,
        Some(&input.business_number),
        Some(&input.restaurant_name),
        Some(&input.url_slug),
        None,
    )
    .await?;

    let (restaurant, _owner) = state
        .store
        .create_restaurant_for_owner(new_restaurant(input, None, now_millis()), user.id)
        .await?;

    tracing::info!(
        restaurant_id = restaurant.id,
        user_id = user.id,
        "Restaurant created"
    );
    Ok(restaurant)
}

/// Create a branch of the user's restaurant together with its owner account
pub async fn create_branch(
    state: &AppState,
    user: &RestaurantUser,
    input: BranchRestaurantCreate,
) -> ServiceResult<BranchCreated> {
    let parent = owned_parent(state, user).await?;
    let fields = cleaned(input.restaurant_fields())?;
    ensure_unique(
        state,
        Some(&fields.business_number),
        Some(&fields.restaurant_name),
        Some(&fields.url_slug),
        None,
    )
    .await?;

    let email = match input.user_email.as_deref().map(str::trim) {
        Some(email) if !email.is_empty() => checked_email(email)?,
        _ => return Err(AppError::new(ErrorCode::BranchUserEmailRequired).into()),
    };
    if state.store.find_user_by_email(&email).await?.is_some() {
        return Err(AppError::new(ErrorCode::EmailExists).into());
    }

    let (password, generated_password) = match &state.config.branch_user_password {
        Some(configured) => (configured.clone(), None),
        None => {
            let generated = generate_password();
            (generated.clone(), Some(generated))
        }
    };

    let now = now_millis();
    let owner = RestaurantUser {
        id: 0,
        restaurant_id: None,
        email,
        image: None,
        password: hash_password(&password)?,
        first_name: None,
        last_name: None,
        level: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    let (restaurant, owner) = state
        .store
        .create_branch(new_restaurant(fields, Some(parent.id), now), owner)
        .await?;

    tracing::info!(
        restaurant_id = restaurant.id,
        parent_id = parent.id,
        owner_id = owner.id,
        "Branch restaurant created"
    );
    Ok(BranchCreated {
        restaurant,
        user: owner,
        generated_password,
    })
}

pub async fn update_restaurant(
    state: &AppState,
    user: &RestaurantUser,
    mut patch: RestaurantUpdate,
) -> ServiceResult<Restaurant> {
    let mut restaurant = owned_restaurant(state, user).await?;

    patch.business_number = patch
        .business_number
        .map(|v| required(&v, "business_number"))
        .transpose()?;
    patch.restaurant_name = patch
        .restaurant_name
        .map(|v| required(&v, "restaurant_name"))
        .transpose()?;
    patch.url_slug = patch
        .url_slug
        .map(|v| required(&v, "url_slug"))
        .transpose()?;

    ensure_unique(
        state,
        patch.business_number.as_deref(),
        patch.restaurant_name.as_deref(),
        patch.url_slug.as_deref(),
        Some(restaurant.id),
    )
    .await?;

    patch.apply(&mut restaurant);
    restaurant.updated_at = now_millis();
    Ok(state.store.update_restaurant(&restaurant).await?)
}

/// Delete the user's restaurant, or one of its branches, with everything under it
pub async fn delete_restaurant(
    state: &AppState,
    user: &RestaurantUser,
    restaurant_id: i64,
) -> ServiceResult<()> {
    let Some(restaurant) = state.store.find_restaurant(restaurant_id).await? else {
        return Err(AppError::new(ErrorCode::RestaurantNotFound).into());
    };

    let owned = user.restaurant_id;
    let allowed = owned == Some(restaurant.id)
        || (owned.is_some() && restaurant.parent_restaurant_id == owned);
    if !allowed {
        return Err(AppError::permission_denied("You do not own this restaurant").into());
    }

    if !state.store.delete_restaurant(restaurant.id).await? {
        return Err(AppError::new(ErrorCode::RestaurantNotFound).into());
    }
    tracing::info!(restaurant_id, user_id = user.id, "Restaurant deleted");
    Ok(())
}

// ── Satellite records ──

pub async fn update_contact_info(
    state: &AppState,
    user: &RestaurantUser,
    patch: RestaurantContactInfoUpdate,
) -> ServiceResult<RestaurantContactInfo> {
    let restaurant = owned_restaurant(state, user).await?;
    let now = now_millis();
    let mut record = match state.store.find_contact_info(restaurant.id).await? {
        Some(existing) => existing,
        None => RestaurantContactInfo::empty(0, restaurant.id, now),
    };
    patch.apply(&mut record);
    record.updated_at = now;
    Ok(state.store.save_contact_info(record).await?)
}

pub async fn update_address(
    state: &AppState,
    user: &RestaurantUser,
    patch: RestaurantAddressUpdate,
) -> ServiceResult<RestaurantAddress> {
    let restaurant = owned_restaurant(state, user).await?;
    let now = now_millis();
    let mut record = match state.store.find_address(restaurant.id).await? {
        Some(existing) => existing,
        None => RestaurantAddress::empty(0, restaurant.id, now),
    };
    patch.apply(&mut record);
    record.updated_at = now;
    Ok(state.store.save_address(record).await?)
}

pub async fn update_socials(
    state: &AppState,
    user: &RestaurantUser,
    patch: RestaurantSocialsUpdate,
) -> ServiceResult<RestaurantSocials> {
    let restaurant = owned_restaurant(state, user).await?;
    let now = now_millis();
    let mut record = match state.store.find_socials(restaurant.id).await? {
        Some(existing) => existing,
        None => RestaurantSocials::empty(0, restaurant.id, now),
    };
    patch.apply(&mut record);
    record.updated_at = now;
    Ok(state.store.save_socials(record).await?)
}

/// Store logo and/or cover photo and record their paths
pub async fn upload_images(
    state: &AppState,
    user: &RestaurantUser,
    logo: Option<ImageUpload>,
    cover_photo: Option<ImageUpload>,
) -> ServiceResult<RestaurantImages> {
    if logo.is_none() && cover_photo.is_none() {
        return Err(AppError::validation("No image provided").into());
    }
    let restaurant = owned_restaurant(state, user).await?;

    let mut patch = RestaurantImagesUpdate::default();
    if let Some(logo) = logo {
        patch.logo = Some(upload::save_image(&state.config, &logo).await?);
    }
    if let Some(cover_photo) = cover_photo {
        patch.cover_photo = Some(upload::save_image(&state.config, &cover_photo).await?);
    }

    let now = now_millis();
    let mut record = match state.store.find_images(restaurant.id).await? {
        Some(existing) => existing,
        None => RestaurantImages::empty(0, restaurant.id, now),
    };
    patch.apply(&mut record);
    record.updated_at = now;
    Ok(state.store.save_images(record).await?)
}

/// Upsert opening hours for one day
pub async fn update_operations_time(
    state: &AppState,
    user: &RestaurantUser,
    mut patch: RestaurantOperationsTimeUpdate,
) -> ServiceResult<RestaurantOperationsTime> {
    let restaurant = owned_restaurant(state, user).await?;
    patch.day = required(&patch.day, "day")?;
    let now = now_millis();

    let record = match state
        .store
        .find_operations_time_by_day(restaurant.id, &patch.day)
        .await?
    {
        Some(mut existing) => {
            patch.apply(&mut existing);
            existing.updated_at = now;
            existing
        }
        None => patch.into_new(0, restaurant.id, now).map_err(|field| {
            AppError::with_message(ErrorCode::RequiredField, format!("{field} is required"))
                .with_detail("field", field)
        })?,
    };
    Ok(state.store.save_operations_time(record).await?)
}

pub async fn delete_operations_time(
    state: &AppState,
    user: &RestaurantUser,
    id: i64,
) -> ServiceResult<()> {
    let restaurant = owned_restaurant(state, user).await?;
    match state.store.find_operations_time(id).await? {
        Some(record) if record.restaurant_id == restaurant.id => {
            state.store.delete_operations_time(id).await?;
            Ok(())
        }
        _ => Err(AppError::new(ErrorCode::OperationsTimeNotFound).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::memory::MemoryStore;
    use crate::error::ServiceError;
    use shared::models::UserCreate;

    fn state_with(pairs: &'static [(&'static str, &'static str)]) -> AppState {
        let config = Config::from_lookup(|name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        })
        .unwrap();
        AppState::with_store(config, MemoryStore::new_shared())
    }

    fn state() -> AppState {
        state_with(&[])
    }

    fn code(err: ServiceError) -> ErrorCode {
        AppError::from(err).code
    }

    async fn user(state: &AppState, email: &str) -> RestaurantUser {
        super::super::auth::register(
            state,
            UserCreate {
                email: email.to_string(),
                password: "password123".to_string(),
                first_name: None,
                last_name: None,
            },
        )
        .await
        .unwrap()
    }

    /// Reload so `restaurant_id` reflects the store
    async fn reload(state: &AppState, user: &RestaurantUser) -> RestaurantUser {
        state.store.find_user_by_id(user.id).await.unwrap().unwrap()
    }

    fn input(name: &str, bn: &str, slug: &str) -> RestaurantCreate {
        RestaurantCreate {
            business_number: bn.to_string(),
            restaurant_name: name.to_string(),
            url_slug: slug.to_string(),
            tagline: "Best pizza".to_string(),
        }
    }

    fn branch_input(name: &str, bn: &str, slug: &str, email: Option<&str>) -> BranchRestaurantCreate {
        BranchRestaurantCreate {
            business_number: bn.to_string(),
            restaurant_name: name.to_string(),
            url_slug: slug.to_string(),
            tagline: "Branch".to_string(),
            user_email: email.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_owner() {
        let state = state();
        let owner = user(&state, "a@x.com").await;
        let restaurant = create_restaurant(&state, &owner, input("Pizza Co", "B1", "pizza-co"))
            .await
            .unwrap();

        let owner = reload(&state, &owner).await;
        assert_eq!(owner.restaurant_id, Some(restaurant.id));
        assert!(!restaurant.is_branch);

        let err = create_restaurant(&state, &owner, input("Other", "B2", "other"))
            .await
            .unwrap_err();
        assert_eq!(code(err), ErrorCode::RestaurantAlreadyAssigned);
    }

    #[tokio::test]
    async fn test_create_rechecks_owner_in_store() {
        let state = state();
        let stale = user(&state, "a@x.com").await;
        let first = create_restaurant(&state, &stale, input("Pizza Co", "B1", "pizza-co"))
            .await
            .unwrap();

        // Same pre-creation snapshot, as a concurrent request would hold
        let err = create_restaurant(&state, &stale, input("Other", "B2", "other"))
            .await
            .unwrap_err();
        assert_eq!(code(err), ErrorCode::RestaurantAlreadyAssigned);

        let owner = reload(&state, &stale).await;
        assert_eq!(owner.restaurant_id, Some(first.id));
        assert!(state.store.find_restaurant_by_slug("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_name_and_business_number() {
        let state = state();
        let a = user(&state, "a@x.com").await;
        let b = user(&state, "b@x.com").await;
        create_restaurant(&state, &a, input("Pizza Co", "B1", "pizza-co"))
            .await
            .unwrap();

        let err = create_restaurant(&state, &b, input("Pizza Co", "B2", "pizza-2"))
            .await
            .unwrap_err();
        assert_eq!(code(err), ErrorCode::RestaurantNameExists);

        let err = create_restaurant(&state, &b, input("Burger Co", "B1", "burger-co"))
            .await
            .unwrap_err();
        assert_eq!(code(err), ErrorCode::BusinessNumberExists);

        let err = create_restaurant(&state, &b, input("Burger Co", "B2", "pizza-co"))
            .await
            .unwrap_err();
        assert_eq!(code(err), ErrorCode::UrlSlugExists);

        // Nothing half-created for b
        assert!(reload(&state, &b).await.restaurant_id.is_none());
    }

    #[tokio::test]
    async fn test_branch_provisions_owner() {
        let state = state();
        let owner = user(&state, "a@x.com").await;
        let parent = create_restaurant(&state, &owner, input("Pizza Co", "B1", "pizza-co"))
            .await
            .unwrap();
        let owner = reload(&state, &owner).await;

        let created = create_branch(
            &state,
            &owner,
            branch_input("Pizza Co Downtown", "B1-1", "pizza-co-downtown", Some("Branch@x.com")),
        )
        .await
        .unwrap();

        assert!(created.restaurant.is_branch);
        assert_eq!(created.restaurant.parent_restaurant_id, Some(parent.id));
        assert_eq!(created.user.email, "branch@x.com");
        assert_eq!(created.user.restaurant_id, Some(created.restaurant.id));

        // Generated password logs the branch owner in
        let password = created.generated_password.unwrap();
        super::super::auth::login(&state, "branch@x.com", &password)
            .await
            .unwrap();

        let branches = fetch_branches(&state, &owner).await.unwrap();
        assert_eq!(branches.len(), 1);
        assert_eq!(
            branches[0].parent_restaurant.as_ref().map(|p| p.id),
            Some(parent.id)
        );
        assert_eq!(
            branches[0].user.as_ref().map(|u| u.id),
            Some(created.user.id)
        );
    }

    #[tokio::test]
    async fn test_branch_uses_configured_password() {
        let state = state_with(&[("BRANCH_USER_PASSWORD", "configured-secret")]);
        let owner = user(&state, "a@x.com").await;
        create_restaurant(&state, &owner, input("Pizza Co", "B1", "pizza-co"))
            .await
            .unwrap();
        let owner = reload(&state, &owner).await;

        let created = create_branch(
            &state,
            &owner,
            branch_input("Branch", "B1-1", "branch", Some("branch@x.com")),
        )
        .await
        .unwrap();
        assert!(created.generated_password.is_none());
        super::super::auth::login(&state, "branch@x.com", "configured-secret")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_branch_preconditions() {
        let state = state();
        let owner = user(&state, "a@x.com").await;

        let err = create_branch(&state, &owner, branch_input("X", "X1", "x", Some("x@x.com")))
            .await
            .unwrap_err();
        assert_eq!(code(err), ErrorCode::NoRestaurantAssigned);

        create_restaurant(&state, &owner, input("Pizza Co", "B1", "pizza-co"))
            .await
            .unwrap();
        let owner = reload(&state, &owner).await;

        let err = create_branch(&state, &owner, branch_input("Branch", "B1-1", "branch", None))
            .await
            .unwrap_err();
        assert_eq!(code(err), ErrorCode::BranchUserEmailRequired);

        let err = create_branch(
            &state,
            &owner,
            branch_input("Branch", "B1-1", "branch", Some("a@x.com")),
        )
        .await
        .unwrap_err();
        assert_eq!(code(err), ErrorCode::EmailExists);

        let created = create_branch(
            &state,
            &owner,
            branch_input("Branch", "B1-1", "branch", Some("branch@x.com")),
        )
        .await
        .unwrap();

        // A branch owner cannot create a branch of a branch
        let err = create_branch(
            &state,
            &created.user,
            branch_input("Sub", "B1-1-1", "sub", Some("sub@x.com")),
        )
        .await
        .unwrap_err();
        let err = AppError::from(err);
        assert_eq!(err.code, ErrorCode::NotParentRestaurant);
        assert_eq!(err.http_status(), http::StatusCode::PRECONDITION_FAILED);
    }

    #[tokio::test]
    async fn test_update_checks_other_restaurants_only() {
        let state = state();
        let a = user(&state, "a@x.com").await;
        let b = user(&state, "b@x.com").await;
        create_restaurant(&state, &a, input("Pizza Co", "B1", "pizza-co"))
            .await
            .unwrap();
        create_restaurant(&state, &b, input("Burger Co", "B2", "burger-co"))
            .await
            .unwrap();
        let a = reload(&state, &a).await;

        // Re-submitting own values is fine
        let updated = update_restaurant(
            &state,
            &a,
            RestaurantUpdate {
                restaurant_name: Some("Pizza Co".to_string()),
                tagline: Some("Even better".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.tagline, "Even better");
        assert_eq!(updated.url_slug, "pizza-co");

        let err = update_restaurant(
            &state,
            &a,
            RestaurantUpdate {
                url_slug: Some("burger-co".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(code(err), ErrorCode::UrlSlugExists);
    }

    #[tokio::test]
    async fn test_delete_cascades_and_checks_ownership() {
        let state = state();
        let a = user(&state, "a@x.com").await;
        let b = user(&state, "b@x.com").await;
        let restaurant = create_restaurant(&state, &a, input("Pizza Co", "B1", "pizza-co"))
            .await
            .unwrap();
        let a = reload(&state, &a).await;
        update_address(
            &state,
            &a,
            RestaurantAddressUpdate {
                city: Some("Kuwait City".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        update_contact_info(
            &state,
            &a,
            RestaurantContactInfoUpdate {
                mobile: Some("+96550000000".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let mut images = RestaurantImages::empty(0, restaurant.id, now_millis());
        images.logo = Some("/static/images/logo.png".to_string());
        state.store.save_images(images).await.unwrap();
        let hours = update_operations_time(
            &state,
            &a,
            RestaurantOperationsTimeUpdate {
                day: "Monday".to_string(),
                open_time: Some("09:00".to_string()),
                close_time: Some("22:00".to_string()),
                priority: None,
            },
        )
        .await
        .unwrap();
        let addon = super::super::catalog::create_addon(
            &state,
            &a,
            shared::models::AddonCreate {
                name: "Cheese".to_string(),
                price: rust_decimal::Decimal::new(50, 2),
            },
        )
        .await
        .unwrap();
        let branch = create_branch(
            &state,
            &a,
            branch_input("Branch", "B1-1", "branch", Some("branch@x.com")),
        )
        .await
        .unwrap();

        let err = delete_restaurant(&state, &b, restaurant.id)
            .await
            .unwrap_err();
        assert_eq!(code(err), ErrorCode::PermissionDenied);

        delete_restaurant(&state, &a, restaurant.id).await.unwrap();
        assert!(state.store.find_restaurant(restaurant.id).await.unwrap().is_none());
        assert!(state.store.find_address(restaurant.id).await.unwrap().is_none());
        assert!(state.store.find_contact_info(restaurant.id).await.unwrap().is_none());
        assert!(state.store.find_images(restaurant.id).await.unwrap().is_none());
        assert!(state.store.list_operations_time(restaurant.id).await.unwrap().is_empty());
        assert!(state.store.find_operations_time(hours.id).await.unwrap().is_none());
        assert!(state.store.find_addon(addon.id).await.unwrap().is_none());
        assert!(
            state
                .store
                .find_restaurant(branch.restaurant.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(state.store.find_user_by_id(a.id).await.unwrap().is_none());
        assert!(
            state
                .store
                .find_user_by_id(branch.user.id)
                .await
                .unwrap()
                .is_none()
        );

        let err = delete_restaurant(&state, &b, restaurant.id)
            .await
            .unwrap_err();
        assert_eq!(code(err), ErrorCode::RestaurantNotFound);
    }

    #[tokio::test]
    async fn test_satellite_upserts_keep_absent_fields() {
        let state = state();
        let owner = user(&state, "a@x.com").await;
        create_restaurant(&state, &owner, input("Pizza Co", "B1", "pizza-co"))
            .await
            .unwrap();
        let owner = reload(&state, &owner).await;

        let socials = update_socials(
            &state,
            &owner,
            RestaurantSocialsUpdate {
                instagram: Some("@pizza".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(socials.instagram.as_deref(), Some("@pizza"));

        let socials = update_socials(
            &state,
            &owner,
            RestaurantSocialsUpdate {
                tiktok: Some("@pizza.tt".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(socials.instagram.as_deref(), Some("@pizza"));
        assert_eq!(socials.tiktok.as_deref(), Some("@pizza.tt"));

        let contact = update_contact_info(
            &state,
            &owner,
            RestaurantContactInfoUpdate {
                mobile: Some("+965 5555".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(contact.mobile.as_deref(), Some("+965 5555"));
        assert!(contact.whatsapp.is_none());

        let detail = get_user_restaurant(&state, &owner).await.unwrap();
        assert_eq!(
            detail.socials.and_then(|s| s.tiktok).as_deref(),
            Some("@pizza.tt")
        );
        assert_eq!(detail.user.map(|u| u.id), Some(owner.id));
    }

    #[tokio::test]
    async fn test_operations_time_upsert_and_delete() {
        let state = state();
        let owner = user(&state, "a@x.com").await;
        create_restaurant(&state, &owner, input("Pizza Co", "B1", "pizza-co"))
            .await
            .unwrap();
        let owner = reload(&state, &owner).await;

        let err = update_operations_time(
            &state,
            &owner,
            RestaurantOperationsTimeUpdate {
                day: "Monday".to_string(),
                open_time: Some("09:00".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(code(err), ErrorCode::RequiredField);

        let created = update_operations_time(
            &state,
            &owner,
            RestaurantOperationsTimeUpdate {
                day: "Monday".to_string(),
                open_time: Some("09:00".to_string()),
                close_time: Some("22:00".to_string()),
                priority: Some(1),
            },
        )
        .await
        .unwrap();

        let updated = update_operations_time(
            &state,
            &owner,
            RestaurantOperationsTimeUpdate {
                day: "Monday".to_string(),
                close_time: Some("23:30".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.open_time, "09:00");
        assert_eq!(updated.close_time, "23:30");

        let other = user(&state, "b@x.com").await;
        create_restaurant(&state, &other, input("Burger Co", "B2", "burger-co"))
            .await
            .unwrap();
        let other = reload(&state, &other).await;
        let err = delete_operations_time(&state, &other, created.id)
            .await
            .unwrap_err();
        assert_eq!(code(err), ErrorCode::OperationsTimeNotFound);

        delete_operations_time(&state, &owner, created.id)
            .await
            .unwrap();
        let detail = get_user_restaurant(&state, &owner).await.unwrap();
        assert!(detail.operations_time.is_empty());
    }

    #[tokio::test]
    async fn test_list_restaurants_includes_parent_summary() {
        let state = state();
        let owner = user(&state, "a@x.com").await;
        let parent = create_restaurant(&state, &owner, input("Pizza Co", "B1", "pizza-co"))
            .await
            .unwrap();
        let owner = reload(&state, &owner).await;
        create_branch(
            &state,
            &owner,
            branch_input("Branch", "B1-1", "branch", Some("branch@x.com")),
        )
        .await
        .unwrap();

        let items = list_restaurants(&state, 0, 10).await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(items[0].parent_restaurant.is_none());
        assert_eq!(items[1].parent_restaurant, Some(parent.summary()));

        let items = list_restaurants(&state, 1, 10).await.unwrap();
        assert_eq!(items.len(), 1);
    }
}
