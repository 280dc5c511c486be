//! In-memory store for development and tests.
//!
//! All tables live behind one `RwLock`, so every trait call (including the
//! multi-step ones) is atomic. Unique and foreign-key constraints of the
//! PostgreSQL schema are enforced here too, so services see the same typed
//! errors from both backends.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use shared::models::{
    Addon, Category, Dish, RefreshTokenRecord, Restaurant, RestaurantAddress,
    RestaurantContactInfo, RestaurantImages, RestaurantOperationsTime, RestaurantSocials,
    RestaurantUser, UserProfileUpdate,
};
use tokio::sync::RwLock;

use super::{Store, StoreError, StoreResult, UniqueField};

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<i64, RestaurantUser>,
    /// Keyed by user id
    refresh_tokens: HashMap<i64, RefreshTokenRecord>,
    restaurants: BTreeMap<i64, Restaurant>,
    /// Satellites keyed by restaurant id
    contact_info: HashMap<i64, RestaurantContactInfo>,
    images: HashMap<i64, RestaurantImages>,
    addresses: HashMap<i64, RestaurantAddress>,
    socials: HashMap<i64, RestaurantSocials>,
    operations_time: BTreeMap<i64, RestaurantOperationsTime>,
    categories: BTreeMap<i64, Category>,
    addons: BTreeMap<i64, Addon>,
    /// Stored without their add-on list; see `dish_addons`
    dishes: BTreeMap<i64, Dish>,
    /// (dish_id, addon_id)
    dish_addons: BTreeSet<(i64, i64)>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn require_restaurant(&self, id: i64) -> StoreResult<()> {
        if self.restaurants.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::Integrity(format!("restaurant {id} does not exist")))
        }
    }

    fn check_user_unique(&self, user: &RestaurantUser) -> StoreResult<()> {
        if self
            .users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(StoreError::Conflict(UniqueField::UserEmail));
        }
        if let Some(rid) = user.restaurant_id {
            self.require_restaurant(rid)?;
        }
        Ok(())
    }

    fn check_restaurant_unique(&self, restaurant: &Restaurant) -> StoreResult<()> {
        for other in self.restaurants.values().filter(|r| r.id != restaurant.id) {
            if other.restaurant_name == restaurant.restaurant_name {
                return Err(StoreError::Conflict(UniqueField::RestaurantName));
            }
            if other.business_number == restaurant.business_number {
                return Err(StoreError::Conflict(UniqueField::BusinessNumber));
            }
            if other.url_slug == restaurant.url_slug {
                return Err(StoreError::Conflict(UniqueField::UrlSlug));
            }
        }
        if let Some(parent) = restaurant.parent_restaurant_id {
            self.require_restaurant(parent)?;
        }
        Ok(())
    }

    fn check_dish(&self, dish: &Dish) -> StoreResult<()> {
        if self
            .dishes
            .values()
            .any(|d| d.id != dish.id && d.restaurant_id == dish.restaurant_id && d.name == dish.name)
        {
            return Err(StoreError::Conflict(UniqueField::DishName));
        }
        self.require_restaurant(dish.restaurant_id)?;
        if !self.categories.contains_key(&dish.category_id) {
            return Err(StoreError::Integrity(format!(
                "category {} does not exist",
                dish.category_id
            )));
        }
        Ok(())
    }

    fn link_addons(&mut self, dish_id: i64, addon_ids: &[i64]) -> StoreResult<()> {
        if let Some(missing) = addon_ids.iter().find(|id| !self.addons.contains_key(id)) {
            return Err(StoreError::Integrity(format!("add-on {missing} does not exist")));
        }
        self.dish_addons.retain(|(d, _)| *d != dish_id);
        for addon_id in addon_ids {
            self.dish_addons.insert((dish_id, *addon_id));
        }
        Ok(())
    }

    fn with_addons(&self, dish: &Dish) -> Dish {
        let mut dish = dish.clone();
        dish.addons = self
            .dish_addons
            .range((dish.id, i64::MIN)..=(dish.id, i64::MAX))
            .filter_map(|(_, addon_id)| self.addons.get(addon_id).cloned())
            .collect();
        dish
    }

    fn remove_restaurant_tree(&mut self, id: i64) {
        let branches: Vec<i64> = self
            .restaurants
            .values()
            .filter(|r| r.parent_restaurant_id == Some(id))
            .map(|r| r.id)
            .collect();
        for branch in branches {
            self.remove_restaurant_tree(branch);
        }

        self.contact_info.remove(&id);
        self.images.remove(&id);
        self.addresses.remove(&id);
        self.socials.remove(&id);
        self.operations_time.retain(|_, o| o.restaurant_id != id);

        let users: Vec<i64> = self
            .users
            .values()
            .filter(|u| u.restaurant_id == Some(id))
            .map(|u| u.id)
            .collect();
        for user_id in users {
            self.users.remove(&user_id);
            self.refresh_tokens.remove(&user_id);
        }

        let dishes: BTreeSet<i64> = self
            .dishes
            .values()
            .filter(|d| d.restaurant_id == id)
            .map(|d| d.id)
            .collect();
        let addons: BTreeSet<i64> = self
            .addons
            .values()
            .filter(|a| a.restaurant_id == id)
            .map(|a| a.id)
            .collect();
        self.dish_addons
            .retain(|(d, a)| !dishes.contains(d) && !addons.contains(a));
        self.dishes.retain(|_, d| d.restaurant_id != id);
        self.addons.retain(|_, a| a.restaurant_id != id);
        self.categories.retain(|_, c| c.restaurant_id != id);

        self.restaurants.remove(&id);
    }
}

fn page<T: Clone>(items: impl Iterator<Item = T>, skip: i64, limit: i64) -> Vec<T> {
    items
        .skip(skip.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

/// In-memory implementation of [`Store`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl Store for MemoryStore {
    // ── Users ──

    async fn insert_user(&self, mut user: RestaurantUser) -> StoreResult<RestaurantUser> {
        let mut t = self.tables.write().await;
        user.id = 0;
        t.check_user_unique(&user)?;
        user.id = t.next_id();
        t.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<RestaurantUser>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<RestaurantUser>> {
        let t = self.tables.read().await;
        Ok(t.users.values().find(|u| u.email == email).cloned())
    }

    async fn update_user_profile(
        &self,
        user_id: i64,
        patch: &UserProfileUpdate,
        now: i64,
    ) -> StoreResult<RestaurantUser> {
        let mut t = self.tables.write().await;
        let Some(mut user) = t.users.get(&user_id).cloned() else {
            return Err(StoreError::NotFound("user"));
        };
        patch.clone().apply(&mut user);
        user.updated_at = now;
        t.check_user_unique(&user)?;
        t.users.insert(user.id, user.clone());
        Ok(user)
    }

    // ── Refresh tokens ──

    async fn find_refresh_token(&self, user_id: i64) -> StoreResult<Option<RefreshTokenRecord>> {
        Ok(self.tables.read().await.refresh_tokens.get(&user_id).cloned())
    }

    async fn replace_refresh_token(&self, record: &RefreshTokenRecord) -> StoreResult<()> {
        let mut t = self.tables.write().await;
        if !t.users.contains_key(&record.user_id) {
            return Err(StoreError::Integrity(format!(
                "user {} does not exist",
                record.user_id
            )));
        }
        t.refresh_tokens.insert(record.user_id, record.clone());
        Ok(())
    }

    // ── Restaurants ──

    async fn find_restaurant(&self, id: i64) -> StoreResult<Option<Restaurant>> {
        Ok(self.tables.read().await.restaurants.get(&id).cloned())
    }

    async fn find_restaurant_by_name(&self, name: &str) -> StoreResult<Option<Restaurant>> {
        let t = self.tables.read().await;
        Ok(t.restaurants
            .values()
            .find(|r| r.restaurant_name == name)
            .cloned())
    }

    async fn find_restaurant_by_business_number(
        &self,
        business_number: &str,
    ) -> StoreResult<Option<Restaurant>> {
        let t = self.tables.read().await;
        Ok(t.restaurants
            .values()
            .find(|r| r.business_number == business_number)
            .cloned())
    }

    async fn find_restaurant_by_slug(&self, url_slug: &str) -> StoreResult<Option<Restaurant>> {
        let t = self.tables.read().await;
        Ok(t.restaurants.values().find(|r| r.url_slug == url_slug).cloned())
    }

    async fn list_restaurants(&self, skip: i64, limit: i64) -> StoreResult<Vec<Restaurant>> {
        let t = self.tables.read().await;
        Ok(page(t.restaurants.values().cloned(), skip, limit))
    }

    async fn list_branches(&self, parent_id: i64) -> StoreResult<Vec<Restaurant>> {
        let t = self.tables.read().await;
        Ok(t.restaurants
            .values()
            .filter(|r| r.parent_restaurant_id == Some(parent_id))
            .cloned()
            .collect())
    }

    async fn find_restaurant_owner(
        &self,
        restaurant_id: i64,
    ) -> StoreResult<Option<RestaurantUser>> {
        let t = self.tables.read().await;
        Ok(t.users
            .values()
            .find(|u| u.restaurant_id == Some(restaurant_id))
            .cloned())
    }

    async fn create_restaurant_for_owner(
        &self,
        mut restaurant: Restaurant,
        owner_id: i64,
    ) -> StoreResult<(Restaurant, RestaurantUser)> {
        let mut t = self.tables.write().await;
        restaurant.id = 0;
        t.check_restaurant_unique(&restaurant)?;
        let Some(mut owner) = t.users.get(&owner_id).cloned() else {
            return Err(StoreError::NotFound("user"));
        };
        if owner.restaurant_id.is_some() {
            return Err(StoreError::Conflict(UniqueField::RestaurantOwner));
        }

        restaurant.id = t.next_id();
        owner.restaurant_id = Some(restaurant.id);
        owner.updated_at = restaurant.updated_at;
        t.restaurants.insert(restaurant.id, restaurant.clone());
        t.users.insert(owner.id, owner.clone());
        Ok((restaurant, owner))
    }

    async fn create_branch(
        &self,
        mut branch: Restaurant,
        mut owner: RestaurantUser,
    ) -> StoreResult<(Restaurant, RestaurantUser)> {
        let mut t = self.tables.write().await;
        branch.id = 0;
        owner.id = 0;
        owner.restaurant_id = None;
        t.check_restaurant_unique(&branch)?;
        t.check_user_unique(&owner)?;

        branch.id = t.next_id();
        owner.id = t.next_id();
        owner.restaurant_id = Some(branch.id);
        t.restaurants.insert(branch.id, branch.clone());
        t.users.insert(owner.id, owner.clone());
        Ok((branch, owner))
    }

    async fn update_restaurant(&self, restaurant: &Restaurant) -> StoreResult<Restaurant> {
        let mut t = self.tables.write().await;
        if !t.restaurants.contains_key(&restaurant.id) {
            return Err(StoreError::NotFound("restaurant"));
        }
        t.check_restaurant_unique(restaurant)?;
        t.restaurants.insert(restaurant.id, restaurant.clone());
        Ok(restaurant.clone())
    }

    async fn delete_restaurant(&self, id: i64) -> StoreResult<bool> {
        let mut t = self.tables.write().await;
        if !t.restaurants.contains_key(&id) {
            return Ok(false);
        }
        t.remove_restaurant_tree(id);
        Ok(true)
    }

    // ── Satellites ──

    async fn find_contact_info(
        &self,
        restaurant_id: i64,
    ) -> StoreResult<Option<RestaurantContactInfo>> {
        Ok(self.tables.read().await.contact_info.get(&restaurant_id).cloned())
    }

    async fn save_contact_info(
        &self,
        mut record: RestaurantContactInfo,
    ) -> StoreResult<RestaurantContactInfo> {
        let mut t = self.tables.write().await;
        t.require_restaurant(record.restaurant_id)?;
        record.id = match t.contact_info.get(&record.restaurant_id) {
            Some(existing) => existing.id,
            None => t.next_id(),
        };
        t.contact_info.insert(record.restaurant_id, record.clone());
        Ok(record)
    }

    async fn find_images(&self, restaurant_id: i64) -> StoreResult<Option<RestaurantImages>> {
        Ok(self.tables.read().await.images.get(&restaurant_id).cloned())
    }

    async fn save_images(&self, mut record: RestaurantImages) -> StoreResult<RestaurantImages> {
        let mut t = self.tables.write().await;
        t.require_restaurant(record.restaurant_id)?;
        record.id = match t.images.get(&record.restaurant_id) {
            Some(existing) => existing.id,
            None => t.next_id(),
        };
        t.images.insert(record.restaurant_id, record.clone());
        Ok(record)
    }

    async fn find_address(&self, restaurant_id: i64) -> StoreResult<Option<RestaurantAddress>> {
        Ok(self.tables.read().await.addresses.get(&restaurant_id).cloned())
    }

    async fn save_address(&self, mut record: RestaurantAddress) -> StoreResult<RestaurantAddress> {
        let mut t = self.tables.write().await;
        t.require_restaurant(record.restaurant_id)?;
        record.id = match t.addresses.get(&record.restaurant_id) {
            Some(existing) => existing.id,
            None => t.next_id(),
        };
        t.addresses.insert(record.restaurant_id, record.clone());
        Ok(record)
    }

    async fn find_socials(&self, restaurant_id: i64) -> StoreResult<Option<RestaurantSocials>> {
        Ok(self.tables.read().await.socials.get(&restaurant_id).cloned())
    }

    async fn save_socials(&self, mut record: RestaurantSocials) -> StoreResult<RestaurantSocials> {
        let mut t = self.tables.write().await;
        t.require_restaurant(record.restaurant_id)?;
        record.id = match t.socials.get(&record.restaurant_id) {
            Some(existing) => existing.id,
            None => t.next_id(),
        };
        t.socials.insert(record.restaurant_id, record.clone());
        Ok(record)
    }

    // ── Operations time ──

    async fn list_operations_time(
        &self,
        restaurant_id: i64,
    ) -> StoreResult<Vec<RestaurantOperationsTime>> {
        let t = self.tables.read().await;
        let mut rows: Vec<_> = t
            .operations_time
            .values()
            .filter(|o| o.restaurant_id == restaurant_id)
            .cloned()
            .collect();
        rows.sort_by_key(|o| (o.priority, o.id));
        Ok(rows)
    }

    async fn find_operations_time(&self, id: i64) -> StoreResult<Option<RestaurantOperationsTime>> {
        Ok(self.tables.read().await.operations_time.get(&id).cloned())
    }

    async fn find_operations_time_by_day(
        &self,
        restaurant_id: i64,
        day: &str,
    ) -> StoreResult<Option<RestaurantOperationsTime>> {
        let t = self.tables.read().await;
        Ok(t.operations_time
            .values()
            .find(|o| o.restaurant_id == restaurant_id && o.day == day)
            .cloned())
    }

    async fn save_operations_time(
        &self,
        mut record: RestaurantOperationsTime,
    ) -> StoreResult<RestaurantOperationsTime> {
        let mut t = self.tables.write().await;
        t.require_restaurant(record.restaurant_id)?;
        let existing = t
            .operations_time
            .values()
            .find(|o| o.restaurant_id == record.restaurant_id && o.day == record.day)
            .map(|o| (o.id, o.created_at));
        match existing {
            Some((id, created_at)) => {
                record.id = id;
                record.created_at = created_at;
            }
            None => record.id = t.next_id(),
        }
        t.operations_time.insert(record.id, record.clone());
        Ok(record)
    }

    async fn delete_operations_time(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.write().await.operations_time.remove(&id).is_some())
    }

    // ── Categories ──

    async fn insert_category(&self, mut category: Category) -> StoreResult<Category> {
        let mut t = self.tables.write().await;
        t.require_restaurant(category.restaurant_id)?;
        category.id = t.next_id();
        t.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn find_category(&self, id: i64) -> StoreResult<Option<Category>> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn list_categories(&self, restaurant_id: i64) -> StoreResult<Vec<Category>> {
        let t = self.tables.read().await;
        Ok(t.categories
            .values()
            .filter(|c| c.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    async fn update_category(&self, category: &Category) -> StoreResult<Category> {
        let mut t = self.tables.write().await;
        if !t.categories.contains_key(&category.id) {
            return Err(StoreError::NotFound("category"));
        }
        t.categories.insert(category.id, category.clone());
        Ok(category.clone())
    }

    async fn delete_category(&self, id: i64) -> StoreResult<bool> {
        let mut t = self.tables.write().await;
        if t.dishes.values().any(|d| d.category_id == id) {
            return Err(StoreError::Integrity(format!(
                "category {id} is still referenced by dishes"
            )));
        }
        Ok(t.categories.remove(&id).is_some())
    }

    // ── Add-ons ──

    async fn insert_addon(&self, mut addon: Addon) -> StoreResult<Addon> {
        let mut t = self.tables.write().await;
        t.require_restaurant(addon.restaurant_id)?;
        addon.id = t.next_id();
        t.addons.insert(addon.id, addon.clone());
        Ok(addon)
    }

    async fn find_addon(&self, id: i64) -> StoreResult<Option<Addon>> {
        Ok(self.tables.read().await.addons.get(&id).cloned())
    }

    async fn find_addons(&self, restaurant_id: i64, ids: &[i64]) -> StoreResult<Vec<Addon>> {
        let t = self.tables.read().await;
        Ok(t.addons
            .values()
            .filter(|a| a.restaurant_id == restaurant_id && ids.contains(&a.id))
            .cloned()
            .collect())
    }

    async fn list_addons(&self, restaurant_id: i64) -> StoreResult<Vec<Addon>> {
        let t = self.tables.read().await;
        Ok(t.addons
            .values()
            .filter(|a| a.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    async fn update_addon(&self, addon: &Addon) -> StoreResult<Addon> {
        let mut t = self.tables.write().await;
        if !t.addons.contains_key(&addon.id) {
            return Err(StoreError::NotFound("add-on"));
        }
        t.addons.insert(addon.id, addon.clone());
        Ok(addon.clone())
    }

    async fn delete_addon(&self, id: i64) -> StoreResult<bool> {
        let mut t = self.tables.write().await;
        t.dish_addons.retain(|(_, a)| *a != id);
        Ok(t.addons.remove(&id).is_some())
    }

    // ── Dishes ──

    async fn insert_dish(&self, mut dish: Dish, addon_ids: &[i64]) -> StoreResult<Dish> {
        let mut t = self.tables.write().await;
        dish.id = 0;
        t.check_dish(&dish)?;
        if let Some(missing) = addon_ids.iter().find(|id| !t.addons.contains_key(id)) {
            return Err(StoreError::Integrity(format!("add-on {missing} does not exist")));
        }

        dish.id = t.next_id();
        dish.addons.clear();
        t.dishes.insert(dish.id, dish.clone());
        t.link_addons(dish.id, addon_ids)?;
        Ok(t.with_addons(&dish))
    }

    async fn find_dish(&self, id: i64) -> StoreResult<Option<Dish>> {
        let t = self.tables.read().await;
        Ok(t.dishes.get(&id).map(|d| t.with_addons(d)))
    }

    async fn find_dish_by_name(
        &self,
        restaurant_id: i64,
        name: &str,
    ) -> StoreResult<Option<Dish>> {
        let t = self.tables.read().await;
        Ok(t.dishes
            .values()
            .find(|d| d.restaurant_id == restaurant_id && d.name == name)
            .map(|d| t.with_addons(d)))
    }

    async fn list_dishes(
        &self,
        restaurant_id: i64,
        skip: i64,
        limit: i64,
    ) -> StoreResult<Vec<Dish>> {
        let t = self.tables.read().await;
        let dishes = t
            .dishes
            .values()
            .filter(|d| d.restaurant_id == restaurant_id);
        Ok(page(dishes, skip, limit)
            .into_iter()
            .map(|d| t.with_addons(d))
            .collect())
    }

    async fn update_dish(&self, dish: &Dish, addon_ids: Option<&[i64]>) -> StoreResult<Dish> {
        let mut t = self.tables.write().await;
        if !t.dishes.contains_key(&dish.id) {
            return Err(StoreError::NotFound("dish"));
        }
        t.check_dish(dish)?;
        if let Some(ids) = addon_ids {
            t.link_addons(dish.id, ids)?;
        }
        let mut row = dish.clone();
        row.addons.clear();
        t.dishes.insert(row.id, row.clone());
        Ok(t.with_addons(&row))
    }

    async fn delete_dish(&self, id: i64) -> StoreResult<bool> {
        let mut t = self.tables.write().await;
        t.dish_addons.retain(|(d, _)| *d != id);
        Ok(t.dishes.remove(&id).is_some())
    }
}
