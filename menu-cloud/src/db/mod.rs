//! Entity store
//!
//! [`Store`] is the only way services touch persisted state. Two backends:
//! - [`postgres::PostgresStore`]: production, one module per table group
//! - [`memory::MemoryStore`]: development without `DATABASE_URL`, and tests
//!
//! Multi-step mutations (restaurant + owner assignment, branch + branch owner,
//! refresh token replacement, cascade delete, dish + add-on links) are single
//! store calls so each backend can run them atomically.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use shared::models::{
    Addon, Category, Dish, RefreshTokenRecord, Restaurant, RestaurantAddress,
    RestaurantContactInfo, RestaurantImages, RestaurantOperationsTime, RestaurantSocials,
    RestaurantUser, UserProfileUpdate,
};
use thiserror::Error;

/// Which unique constraint a write collided with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    UserEmail,
    RestaurantName,
    BusinessNumber,
    UrlSlug,
    DishName,
    /// The user already points at a restaurant
    RestaurantOwner,
    Other,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0:?}")]
    Conflict(UniqueField),

    #[error("integrity constraint violated: {0}")]
    Integrity(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    /// Classifies constraint violations by constraint name, never by message text.
    fn from(e: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind;

        if let sqlx::Error::Database(db) = &e {
            match db.kind() {
                ErrorKind::UniqueViolation => {
                    return StoreError::Conflict(postgres::unique_field(db.constraint()));
                }
                ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => {
                    return StoreError::Integrity(db.message().to_string());
                }
                _ => {}
            }
        }
        StoreError::Database(e)
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync + 'static {
    // ── Users ──

    /// Inserts a user; `user.id` is ignored and assigned by the store.
    async fn insert_user(&self, user: RestaurantUser) -> StoreResult<RestaurantUser>;
    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<RestaurantUser>>;
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<RestaurantUser>>;
    /// Writes only the profile columns present in `patch`; ownership, status
    /// and password are left as stored.
    async fn update_user_profile(
        &self,
        user_id: i64,
        patch: &UserProfileUpdate,
        now: i64,
    ) -> StoreResult<RestaurantUser>;

    // ── Refresh tokens ──

    async fn find_refresh_token(&self, user_id: i64) -> StoreResult<Option<RefreshTokenRecord>>;
    /// Deletes any record of the user and inserts the new one atomically.
    async fn replace_refresh_token(&self, record: &RefreshTokenRecord) -> StoreResult<()>;

    // ── Restaurants ──

    async fn find_restaurant(&self, id: i64) -> StoreResult<Option<Restaurant>>;
    async fn find_restaurant_by_name(&self, name: &str) -> StoreResult<Option<Restaurant>>;
    async fn find_restaurant_by_business_number(
        &self,
        business_number: &str,
    ) -> StoreResult<Option<Restaurant>>;
    async fn find_restaurant_by_slug(&self, url_slug: &str) -> StoreResult<Option<Restaurant>>;
    async fn list_restaurants(&self, skip: i64, limit: i64) -> StoreResult<Vec<Restaurant>>;
    async fn list_branches(&self, parent_id: i64) -> StoreResult<Vec<Restaurant>>;
    /// The user whose `restaurant_id` points at the restaurant.
    async fn find_restaurant_owner(&self, restaurant_id: i64)
    -> StoreResult<Option<RestaurantUser>>;

    /// Inserts the restaurant and points the owner at it in one transaction.
    /// Fails with `Conflict(RestaurantOwner)` if the owner already has one.
    async fn create_restaurant_for_owner(
        &self,
        restaurant: Restaurant,
        owner_id: i64,
    ) -> StoreResult<(Restaurant, RestaurantUser)>;
    /// Inserts the branch and its newly provisioned owner in one transaction.
    async fn create_branch(
        &self,
        branch: Restaurant,
        owner: RestaurantUser,
    ) -> StoreResult<(Restaurant, RestaurantUser)>;
    async fn update_restaurant(&self, restaurant: &Restaurant) -> StoreResult<Restaurant>;
    /// Removes the restaurant and everything hanging off it (branches included).
    /// Returns `false` if it did not exist.
    async fn delete_restaurant(&self, id: i64) -> StoreResult<bool>;

    // ── Satellites (one per restaurant, saved by upsert on restaurant_id) ──

    async fn find_contact_info(&self, restaurant_id: i64)
    -> StoreResult<Option<RestaurantContactInfo>>;
    async fn save_contact_info(
        &self,
        record: RestaurantContactInfo,
    ) -> StoreResult<RestaurantContactInfo>;
    async fn find_images(&self, restaurant_id: i64) -> StoreResult<Option<RestaurantImages>>;
    async fn save_images(&self, record: RestaurantImages) -> StoreResult<RestaurantImages>;
    async fn find_address(&self, restaurant_id: i64) -> StoreResult<Option<RestaurantAddress>>;
    async fn save_address(&self, record: RestaurantAddress) -> StoreResult<RestaurantAddress>;
    async fn find_socials(&self, restaurant_id: i64) -> StoreResult<Option<RestaurantSocials>>;
    async fn save_socials(&self, record: RestaurantSocials) -> StoreResult<RestaurantSocials>;

    // ── Operations time (one per restaurant and day) ──

    async fn list_operations_time(
        &self,
        restaurant_id: i64,
    ) -> StoreResult<Vec<RestaurantOperationsTime>>;
    async fn find_operations_time(&self, id: i64) -> StoreResult<Option<RestaurantOperationsTime>>;
    async fn find_operations_time_by_day(
        &self,
        restaurant_id: i64,
        day: &str,
    ) -> StoreResult<Option<RestaurantOperationsTime>>;
    /// Upsert on (restaurant_id, day).
    async fn save_operations_time(
        &self,
        record: RestaurantOperationsTime,
    ) -> StoreResult<RestaurantOperationsTime>;
    async fn delete_operations_time(&self, id: i64) -> StoreResult<bool>;

    // ── Categories ──

    async fn insert_category(&self, category: Category) -> StoreResult<Category>;
    async fn find_category(&self, id: i64) -> StoreResult<Option<Category>>;
    async fn list_categories(&self, restaurant_id: i64) -> StoreResult<Vec<Category>>;
    async fn update_category(&self, category: &Category) -> StoreResult<Category>;
    /// Fails with [`StoreError::Integrity`] while dishes still reference it.
    async fn delete_category(&self, id: i64) -> StoreResult<bool>;

    // ── Add-ons ──

    async fn insert_addon(&self, addon: Addon) -> StoreResult<Addon>;
    async fn find_addon(&self, id: i64) -> StoreResult<Option<Addon>>;
    /// Add-ons of the restaurant among `ids`; unknown or foreign ids are skipped.
    async fn find_addons(&self, restaurant_id: i64, ids: &[i64]) -> StoreResult<Vec<Addon>>;
    async fn list_addons(&self, restaurant_id: i64) -> StoreResult<Vec<Addon>>;
    async fn update_addon(&self, addon: &Addon) -> StoreResult<Addon>;
    async fn delete_addon(&self, id: i64) -> StoreResult<bool>;

    // ── Dishes (returned with their add-ons populated) ──

    async fn insert_dish(&self, dish: Dish, addon_ids: &[i64]) -> StoreResult<Dish>;
    async fn find_dish(&self, id: i64) -> StoreResult<Option<Dish>>;
    async fn find_dish_by_name(&self, restaurant_id: i64, name: &str)
    -> StoreResult<Option<Dish>>;
    async fn list_dishes(&self, restaurant_id: i64, skip: i64, limit: i64)
    -> StoreResult<Vec<Dish>>;
    /// Writes scalar columns; `Some(ids)` replaces the add-on links.
    async fn update_dish(&self, dish: &Dish, addon_ids: Option<&[i64]>) -> StoreResult<Dish>;
    async fn delete_dish(&self, id: i64) -> StoreResult<bool>;
}
