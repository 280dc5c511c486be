//! Catalog flow: categories, add-ons and dishes of the user's restaurant

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Addon, AddonCreate, AddonUpdate, Category, CategoryCreate, CategoryUpdate, Dish, DishCreate,
    DishDetail, DishUpdate, Restaurant, RestaurantUser, is_valid_price,
};
use shared::util::now_millis;

use super::restaurant::owned_restaurant;
use super::upload::{self, ImageUpload};
use crate::error::ServiceResult;
use crate::state::AppState;

fn required_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(
            AppError::with_message(ErrorCode::RequiredField, "name is required")
                .with_detail("field", "name"),
        );
    }
    Ok(name.to_string())
}

fn checked_price(price: Decimal, field: &'static str) -> Result<Decimal, AppError> {
    if !is_valid_price(&price) {
        return Err(AppError::with_message(
            ErrorCode::InvalidPrice,
            format!("{field} must be greater than 0 with at most 2 decimal places"),
        )
        .with_detail("field", field));
    }
    Ok(price)
}

fn checked_discount(discount: Option<Decimal>) -> Result<Option<Decimal>, AppError> {
    match discount {
        Some(d) if d.is_sign_negative() || d.normalize().scale() > 2 => {
            Err(AppError::with_message(
                ErrorCode::InvalidPrice,
                "discount must be non-negative with at most 2 decimal places",
            )
            .with_detail("field", "discount"))
        }
        other => Ok(other),
    }
}

// ── Categories ──

async fn owned_category(
    state: &AppState,
    restaurant: &Restaurant,
    id: i64,
) -> ServiceResult<Category> {
    match state.store.find_category(id).await? {
        Some(category) if category.restaurant_id == restaurant.id => Ok(category),
        _ => Err(AppError::new(ErrorCode::CategoryNotFound).into()),
    }
}

pub async fn create_category(
    state: &AppState,
    user: &RestaurantUser,
    mut input: CategoryCreate,
) -> ServiceResult<Category> {
    let restaurant = owned_restaurant(state, user).await?;
    input.name = required_name(&input.name)?;
    let category = input.into_category(0, restaurant.id, now_millis());
    Ok(state.store.insert_category(category).await?)
}

pub async fn list_categories(
    state: &AppState,
    user: &RestaurantUser,
) -> ServiceResult<Vec<Category>> {
    let restaurant = owned_restaurant(state, user).await?;
    Ok(state.store.list_categories(restaurant.id).await?)
}

pub async fn update_category(
    state: &AppState,
    user: &RestaurantUser,
    id: i64,
    mut patch: CategoryUpdate,
) -> ServiceResult<Category> {
    let restaurant = owned_restaurant(state, user).await?;
    let mut category = owned_category(state, &restaurant, id).await?;
    patch.name = patch.name.map(|n| required_name(&n)).transpose()?;
    patch.apply(&mut category);
    category.updated_at = now_millis();
    Ok(state.store.update_category(&category).await?)
}

/// Refused with an integrity error while dishes still use the category
pub async fn delete_category(
    state: &AppState,
    user: &RestaurantUser,
    id: i64,
) -> ServiceResult<()> {
    let restaurant = owned_restaurant(state, user).await?;
    owned_category(state, &restaurant, id).await?;
    state.store.delete_category(id).await?;
    Ok(())
}

// ── Add-ons ──

async fn owned_addon(state: &AppState, restaurant: &Restaurant, id: i64) -> ServiceResult<Addon> {
    match state.store.find_addon(id).await? {
        Some(addon) if addon.restaurant_id == restaurant.id => Ok(addon),
        _ => Err(AppError::new(ErrorCode::AddonNotFound).into()),
    }
}

pub async fn create_addon(
    state: &AppState,
    user: &RestaurantUser,
    input: AddonCreate,
) -> ServiceResult<Addon> {
    let restaurant = owned_restaurant(state, user).await?;
    let now = now_millis();
    let addon = Addon {
        id: 0,
        restaurant_id: restaurant.id,
        name: required_name(&input.name)?,
        price: checked_price(input.price, "price")?,
        created_at: now,
        updated_at: now,
    };
    Ok(state.store.insert_addon(addon).await?)
}

pub async fn list_addons(state: &AppState, user: &RestaurantUser) -> ServiceResult<Vec<Addon>> {
    let restaurant = owned_restaurant(state, user).await?;
    Ok(state.store.list_addons(restaurant.id).await?)
}

pub async fn update_addon(
    state: &AppState,
    user: &RestaurantUser,
    id: i64,
    mut patch: AddonUpdate,
) -> ServiceResult<Addon> {
    let restaurant = owned_restaurant(state, user).await?;
    let mut addon = owned_addon(state, &restaurant, id).await?;
    patch.name = patch.name.map(|n| required_name(&n)).transpose()?;
    patch.price = patch
        .price
        .map(|p| checked_price(p, "price"))
        .transpose()?;
    patch.apply(&mut addon);
    addon.updated_at = now_millis();
    Ok(state.store.update_addon(&addon).await?)
}

pub async fn delete_addon(state: &AppState, user: &RestaurantUser, id: i64) -> ServiceResult<()> {
    let restaurant = owned_restaurant(state, user).await?;
    owned_addon(state, &restaurant, id).await?;
    state.store.delete_addon(id).await?;
    Ok(())
}

// ── Dishes ──

async fn owned_dish(state: &AppState, restaurant: &Restaurant, id: i64) -> ServiceResult<Dish> {
    match state.store.find_dish(id).await? {
        Some(dish) if dish.restaurant_id == restaurant.id => Ok(dish),
        _ => Err(AppError::new(ErrorCode::DishNotFound).into()),
    }
}

/// Deduplicated add-on ids, all belonging to the restaurant
async fn checked_addon_ids(
    state: &AppState,
    restaurant: &Restaurant,
    ids: &[i64],
) -> ServiceResult<Vec<i64>> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();

    let found = state.store.find_addons(restaurant.id, &ids).await?;
    if found.len() != ids.len() {
        let missing: Vec<i64> = ids
            .iter()
            .copied()
            .filter(|id| !found.iter().any(|a| a.id == *id))
            .collect();
        return Err(AppError::new(ErrorCode::AddonNotFound)
            .with_detail("addon_ids", missing)
            .into());
    }
    Ok(ids)
}

/// Dish names are unique within a restaurant
async fn ensure_dish_name_free(
    state: &AppState,
    restaurant: &Restaurant,
    name: &str,
    own_id: Option<i64>,
) -> ServiceResult<()> {
    let existing = state.store.find_dish_by_name(restaurant.id, name).await?;
    if existing.is_some_and(|d| Some(d.id) != own_id) {
        return Err(AppError::new(ErrorCode::DishNameExists).into());
    }
    Ok(())
}

pub async fn create_dish(
    state: &AppState,
    user: &RestaurantUser,
    mut input: DishCreate,
    image: Option<ImageUpload>,
) -> ServiceResult<Dish> {
    let restaurant = owned_restaurant(state, user).await?;
    input.name = required_name(&input.name)?;
    input.price = checked_price(input.price, "price")?;
    input.discount = checked_discount(input.discount)?;
    owned_category(state, &restaurant, input.category_id).await?;
    let addon_ids = checked_addon_ids(state, &restaurant, &input.addon_ids).await?;
    ensure_dish_name_free(state, &restaurant, &input.name, None).await?;

    if let Some(image) = image {
        input.image = Some(upload::save_image(&state.config, &image).await?);
    }

    let dish = input.into_dish(0, restaurant.id, now_millis());
    let dish = state.store.insert_dish(dish, &addon_ids).await?;
    tracing::info!(dish_id = dish.id, restaurant_id = restaurant.id, "Dish created");
    Ok(dish)
}

pub async fn update_dish(
    state: &AppState,
    user: &RestaurantUser,
    id: i64,
    mut patch: DishUpdate,
    image: Option<ImageUpload>,
) -> ServiceResult<Dish> {
    let restaurant = owned_restaurant(state, user).await?;
    let mut dish = owned_dish(state, &restaurant, id).await?;

    if let Some(name) = patch.name.take() {
        let name = required_name(&name)?;
        ensure_dish_name_free(state, &restaurant, &name, Some(dish.id)).await?;
        patch.name = Some(name);
    }
    patch.price = patch
        .price
        .map(|p| checked_price(p, "price"))
        .transpose()?;
    patch.discount = checked_discount(patch.discount)?;
    if let Some(category_id) = patch.category_id {
        owned_category(state, &restaurant, category_id).await?;
    }
    let addon_ids = match patch.addon_ids.take() {
        Some(ids) => Some(checked_addon_ids(state, &restaurant, &ids).await?),
        None => None,
    };
    if let Some(image) = image {
        patch.image = Some(upload::save_image(&state.config, &image).await?);
    }

    patch.apply(&mut dish);
    dish.updated_at = now_millis();
    Ok(state
        .store
        .update_dish(&dish, addon_ids.as_deref())
        .await?)
}

pub async fn delete_dish(state: &AppState, user: &RestaurantUser, id: i64) -> ServiceResult<()> {
    let restaurant = owned_restaurant(state, user).await?;
    owned_dish(state, &restaurant, id).await?;
    state.store.delete_dish(id).await?;
    Ok(())
}

/// Public dish lookup with its category
pub async fn get_dish(state: &AppState, id: i64) -> ServiceResult<DishDetail> {
    let Some(dish) = state.store.find_dish(id).await? else {
        return Err(AppError::new(ErrorCode::DishNotFound).into());
    };
    let category = state.store.find_category(dish.category_id).await?;
    Ok(DishDetail { dish, category })
}

/// Public menu of a restaurant addressed by its url slug
pub async fn list_dishes_by_slug(
    state: &AppState,
    url_slug: &str,
    skip: i64,
    limit: i64,
) -> ServiceResult<Vec<Dish>> {
    let Some(restaurant) = state.store.find_restaurant_by_slug(url_slug).await? else {
        return Err(AppError::new(ErrorCode::RestaurantNotFound).into());
    };
    let dishes = state.store.list_dishes(restaurant.id, skip, limit).await?;
    if dishes.is_empty() {
        return Err(AppError::with_message(ErrorCode::DishNotFound, "No dishes found").into());
    }
    Ok(dishes)
}
