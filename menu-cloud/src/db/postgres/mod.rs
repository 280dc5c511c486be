//! PostgreSQL backend
//!
//! One module of free functions per table group, each taking
//! `impl PgExecutor<'_>` so they run on the pool or inside a transaction.

pub mod catalog;
pub mod refresh_tokens;
pub mod restaurants;
pub mod satellites;
pub mod users;

use async_trait::async_trait;
use shared::models::{
    Addon, Category, Dish, RefreshTokenRecord, Restaurant, RestaurantAddress,
    RestaurantContactInfo, RestaurantImages, RestaurantOperationsTime, RestaurantSocials,
    RestaurantUser, UserProfileUpdate,
};
use sqlx::PgPool;

use super::{Store, StoreError, StoreResult, UniqueField};
use crate::BoxError;

/// Map a unique constraint name from the migrations to the field it guards
pub fn unique_field(constraint: Option<&str>) -> UniqueField {
    match constraint {
        Some("uq_user_email") => UniqueField::UserEmail,
        Some("uq_restaurant_name") => UniqueField::RestaurantName,
        Some("uq_restaurant_business_number") => UniqueField::BusinessNumber,
        Some("uq_restaurant_url_slug") => UniqueField::UrlSlug,
        Some("uq_dish_restaurant_name") => UniqueField::DishName,
        _ => UniqueField::Other,
    }
}

#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Connect and run pending migrations
    pub async fn connect(database_url: &str) -> Result<Self, BoxError> {
        let pool = PgPool::connect(database_url).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
        Ok(Self { pool })
    }
}

fn found<T>(row: Option<T>, what: &'static str) -> StoreResult<T> {
    row.ok_or(StoreError::NotFound(what))
}

#[async_trait]
impl Store for PostgresStore {
    async fn insert_user(&self, user: RestaurantUser) -> StoreResult<RestaurantUser> {
        Ok(users::insert(&self.pool, &user).await?)
    }

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<RestaurantUser>> {
        Ok(users::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<RestaurantUser>> {
        Ok(users::find_by_email(&self.pool, email).await?)
    }

    async fn update_user_profile(
        &self,
        user_id: i64,
        patch: &UserProfileUpdate,
        now: i64,
    ) -> StoreResult<RestaurantUser> {
        found(
            users::update_profile(&self.pool, user_id, patch, now).await?,
            "user",
        )
    }

    async fn find_refresh_token(&self, user_id: i64) -> StoreResult<Option<RefreshTokenRecord>> {
        Ok(refresh_tokens::find(&self.pool, user_id).await?)
    }

    async fn replace_refresh_token(&self, record: &RefreshTokenRecord) -> StoreResult<()> {
        Ok(refresh_tokens::replace(&self.pool, record).await?)
    }

    async fn find_restaurant(&self, id: i64) -> StoreResult<Option<Restaurant>> {
        Ok(restaurants::find_by_id(&self.pool, id).await?)
    }

    async fn find_restaurant_by_name(&self, name: &str) -> StoreResult<Option<Restaurant>> {
        Ok(restaurants::find_by_name(&self.pool, name).await?)
    }

    async fn find_restaurant_by_business_number(
        &self,
        business_number: &str,
    ) -> StoreResult<Option<Restaurant>> {
        Ok(restaurants::find_by_business_number(&self.pool, business_number).await?)
    }

    async fn find_restaurant_by_slug(&self, url_slug: &str) -> StoreResult<Option<Restaurant>> {
        Ok(restaurants::find_by_slug(&self.pool, url_slug).await?)
    }

    async fn list_restaurants(&self, skip: i64, limit: i64) -> StoreResult<Vec<Restaurant>> {
        Ok(restaurants::list(&self.pool, skip, limit).await?)
    }

    async fn list_branches(&self, parent_id: i64) -> StoreResult<Vec<Restaurant>> {
        Ok(restaurants::list_branches(&self.pool, parent_id).await?)
    }

    async fn find_restaurant_owner(
        &self,
        restaurant_id: i64,
    ) -> StoreResult<Option<RestaurantUser>> {
        Ok(users::find_by_restaurant(&self.pool, restaurant_id).await?)
    }

    async fn create_restaurant_for_owner(
        &self,
        restaurant: Restaurant,
        owner_id: i64,
    ) -> StoreResult<(Restaurant, RestaurantUser)> {
        restaurants::create_for_owner(&self.pool, &restaurant, owner_id).await
    }

    async fn create_branch(
        &self,
        branch: Restaurant,
        owner: RestaurantUser,
    ) -> StoreResult<(Restaurant, RestaurantUser)> {
        restaurants::create_branch(&self.pool, &branch, &owner).await
    }

    async fn update_restaurant(&self, restaurant: &Restaurant) -> StoreResult<Restaurant> {
        found(restaurants::update(&self.pool, restaurant).await?, "restaurant")
    }

    async fn delete_restaurant(&self, id: i64) -> StoreResult<bool> {
        Ok(restaurants::delete(&self.pool, id).await?)
    }

    async fn find_contact_info(
        &self,
        restaurant_id: i64,
    ) -> StoreResult<Option<RestaurantContactInfo>> {
        Ok(satellites::find_contact_info(&self.pool, restaurant_id).await?)
    }

    async fn save_contact_info(
        &self,
        record: RestaurantContactInfo,
    ) -> StoreResult<RestaurantContactInfo> {
        Ok(satellites::save_contact_info(&self.pool, &record).await?)
    }

    async fn find_images(&self, restaurant_id: i64) -> StoreResult<Option<RestaurantImages>> {
        Ok(satellites::find_images(&self.pool, restaurant_id).await?)
    }

    async fn save_images(&self, record: RestaurantImages) -> StoreResult<RestaurantImages> {
        Ok(satellites::save_images(&self.pool, &record).await?)
    }

    async fn find_address(&self, restaurant_id: i64) -> StoreResult<Option<RestaurantAddress>> {
        Ok(satellites::find_address(&self.pool, restaurant_id).await?)
    }

    async fn save_address(&self, record: RestaurantAddress) -> StoreResult<RestaurantAddress> {
        Ok(satellites::save_address(&self.pool, &record).await?)
    }

    async fn find_socials(&self, restaurant_id: i64) -> StoreResult<Option<RestaurantSocials>> {
        Ok(satellites::find_socials(&self.pool, restaurant_id).await?)
    }

    async fn save_socials(&self, record: RestaurantSocials) -> StoreResult<RestaurantSocials> {
        Ok(satellites::save_socials(&self.pool, &record).await?)
    }

    async fn list_operations_time(
        &self,
        restaurant_id: i64,
    ) -> StoreResult<Vec<RestaurantOperationsTime>> {
        Ok(satellites::list_operations_time(&self.pool, restaurant_id).await?)
    }

    async fn find_operations_time(&self, id: i64) -> StoreResult<Option<RestaurantOperationsTime>> {
        Ok(satellites::find_operations_time(&self.pool, id).await?)
    }

    async fn find_operations_time_by_day(
        &self,
        restaurant_id: i64,
        day: &str,
    ) -> StoreResult<Option<RestaurantOperationsTime>> {
        Ok(satellites::find_operations_time_by_day(&self.pool, restaurant_id, day).await?)
    }

    async fn save_operations_time(
        &self,
        record: RestaurantOperationsTime,
    ) -> StoreResult<RestaurantOperationsTime> {
        Ok(satellites::save_operations_time(&self.pool, &record).await?)
    }

    async fn delete_operations_time(&self, id: i64) -> StoreResult<bool> {
        Ok(satellites::delete_operations_time(&self.pool, id).await?)
    }

    async fn insert_category(&self, category: Category) -> StoreResult<Category> {
        Ok(catalog::insert_category(&self.pool, &category).await?)
    }

    async fn find_category(&self, id: i64) -> StoreResult<Option<Category>> {
        Ok(catalog::find_category(&self.pool, id).await?)
    }

    async fn list_categories(&self, restaurant_id: i64) -> StoreResult<Vec<Category>> {
        Ok(catalog::list_categories(&self.pool, restaurant_id).await?)
    }

    async fn update_category(&self, category: &Category) -> StoreResult<Category> {
        found(catalog::update_category(&self.pool, category).await?, "category")
    }

    async fn delete_category(&self, id: i64) -> StoreResult<bool> {
        Ok(catalog::delete_category(&self.pool, id).await?)
    }

    async fn insert_addon(&self, addon: Addon) -> StoreResult<Addon> {
        Ok(catalog::insert_addon(&self.pool, &addon).await?)
    }

    async fn find_addon(&self, id: i64) -> StoreResult<Option<Addon>> {
        Ok(catalog::find_addon(&self.pool, id).await?)
    }

    async fn find_addons(&self, restaurant_id: i64, ids: &[i64]) -> StoreResult<Vec<Addon>> {
        Ok(catalog::find_addons(&self.pool, restaurant_id, ids).await?)
    }

    async fn list_addons(&self, restaurant_id: i64) -> StoreResult<Vec<Addon>> {
        Ok(catalog::list_addons(&self.pool, restaurant_id).await?)
    }

    async fn update_addon(&self, addon: &Addon) -> StoreResult<Addon> {
        found(catalog::update_addon(&self.pool, addon).await?, "add-on")
    }

    async fn delete_addon(&self, id: i64) -> StoreResult<bool> {
        Ok(catalog::delete_addon(&self.pool, id).await?)
    }

    async fn insert_dish(&self, dish: Dish, addon_ids: &[i64]) -> StoreResult<Dish> {
        Ok(catalog::insert_dish(&self.pool, &dish, addon_ids).await?)
    }

    async fn find_dish(&self, id: i64) -> StoreResult<Option<Dish>> {
        Ok(catalog::find_dish(&self.pool, id).await?)
    }

    async fn find_dish_by_name(
        &self,
        restaurant_id: i64,
        name: &str,
    ) -> StoreResult<Option<Dish>> {
        Ok(catalog::find_dish_by_name(&self.pool, restaurant_id, name).await?)
    }

    async fn list_dishes(
        &self,
        restaurant_id: i64,
        skip: i64,
        limit: i64,
    ) -> StoreResult<Vec<Dish>> {
        Ok(catalog::list_dishes(&self.pool, restaurant_id, skip, limit).await?)
    }

    async fn update_dish(&self, dish: &Dish, addon_ids: Option<&[i64]>) -> StoreResult<Dish> {
        found(catalog::update_dish(&self.pool, dish, addon_ids).await?, "dish")
    }

    async fn delete_dish(&self, id: i64) -> StoreResult<bool> {
        Ok(catalog::delete_dish(&self.pool, id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_field_by_constraint_name() {
        assert_eq!(unique_field(Some("uq_user_email")), UniqueField::UserEmail);
        assert_eq!(
            unique_field(Some("uq_restaurant_business_number")),
            UniqueField::BusinessNumber
        );
        assert_eq!(
            unique_field(Some("uq_dish_restaurant_name")),
            UniqueField::DishName
        );
        assert_eq!(unique_field(Some("dish_addons_pkey")), UniqueField::Other);
        assert_eq!(unique_field(None), UniqueField::Other);
    }
}
