//! Catalog Models (categories, add-ons, dishes)
//!
//! Every catalog row belongs to exactly one restaurant.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Prices are strictly positive with at most two decimal places.
pub fn is_valid_price(price: &Decimal) -> bool {
    price.is_sign_positive() && !price.is_zero() && price.normalize().scale() <= 2
}

fn default_status() -> String {
    "active".to_string()
}

// ============================================================================
// Category
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub priority: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    pub banner_image: Option<String>,
    pub description: Option<String>,
    pub sub_categories: Option<Vec<String>>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub banner_image: Option<String>,
    pub description: Option<String>,
    pub sub_categories: Option<Vec<String>>,
}

impl CategoryCreate {
    pub fn into_category(self, id: i64, restaurant_id: i64, now: i64) -> Category {
        Category {
            id,
            restaurant_id,
            name: self.name,
            priority: self.priority,
            status: self.status.unwrap_or_else(default_status),
            banner_image: self.banner_image,
            description: self.description,
            sub_categories: self.sub_categories,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Update category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub banner_image: Option<String>,
    pub description: Option<String>,
    pub sub_categories: Option<Vec<String>>,
}

impl CategoryUpdate {
    pub fn apply(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name;
        }
        if let Some(priority) = self.priority {
            category.priority = Some(priority);
        }
        if let Some(status) = self.status {
            category.status = status;
        }
        if let Some(banner_image) = self.banner_image {
            category.banner_image = Some(banner_image);
        }
        if let Some(description) = self.description {
            category.description = Some(description);
        }
        if let Some(sub_categories) = self.sub_categories {
            category.sub_categories = Some(sub_categories);
        }
    }
}

// ============================================================================
// Add-on
// ============================================================================

/// Optional extra that can be attached to dishes of the same restaurant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Addon {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub price: Decimal,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddonCreate {
    pub name: String,
    pub price: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddonUpdate {
    pub name: Option<String>,
    pub price: Option<Decimal>,
}

impl AddonUpdate {
    pub fn apply(self, addon: &mut Addon) {
        if let Some(name) = self.name {
            addon.name = name;
        }
        if let Some(price) = self.price {
            addon.price = price;
        }
    }
}

// ============================================================================
// Dish
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Dish {
    pub id: i64,
    pub restaurant_id: i64,
    pub category_id: i64,
    pub name: String,
    pub price: Decimal,
    pub discount: Option<Decimal>,
    pub availability: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub spice_level: String,
    pub hot_seller: Option<String>,
    pub sub_category: Option<String>,
    pub variant: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,

    // -- Relations (populated by the store, skipped by FromRow) --
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub addons: Vec<Addon>,
}

/// Dish together with its category, as returned by the public lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DishDetail {
    #[serde(flatten)]
    pub dish: Dish,
    pub category: Option<Category>,
}

/// Create dish payload (the image is uploaded separately and set as a path)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DishCreate {
    pub category_id: i64,
    pub name: String,
    pub price: Decimal,
    pub discount: Option<Decimal>,
    pub availability: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub spice_level: String,
    pub hot_seller: Option<String>,
    pub sub_category: Option<String>,
    pub variant: Option<String>,
    #[serde(default)]
    pub addon_ids: Vec<i64>,
}

impl DishCreate {
    pub fn into_dish(self, id: i64, restaurant_id: i64, now: i64) -> Dish {
        Dish {
            id,
            restaurant_id,
            category_id: self.category_id,
            name: self.name,
            price: self.price,
            discount: self.discount,
            availability: self.availability,
            image: self.image,
            description: self.description,
            spice_level: self.spice_level,
            hot_seller: self.hot_seller,
            sub_category: self.sub_category,
            variant: self.variant,
            created_at: now,
            updated_at: now,
            addons: Vec::new(),
        }
    }
}

/// Update dish payload; `addon_ids: Some(..)` replaces the add-on set
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DishUpdate {
    pub category_id: Option<i64>,
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub discount: Option<Decimal>,
    pub availability: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub spice_level: Option<String>,
    pub hot_seller: Option<String>,
    pub sub_category: Option<String>,
    pub variant: Option<String>,
    pub addon_ids: Option<Vec<i64>>,
}

impl DishUpdate {
    /// Applies scalar fields; the add-on set is left to the store.
    pub fn apply(self, dish: &mut Dish) {
        if let Some(category_id) = self.category_id {
            dish.category_id = category_id;
        }
        if let Some(name) = self.name {
            dish.name = name;
        }
        if let Some(price) = self.price {
            dish.price = price;
        }
        if let Some(discount) = self.discount {
            dish.discount = Some(discount);
        }
        if let Some(availability) = self.availability {
            dish.availability = Some(availability);
        }
        if let Some(image) = self.image {
            dish.image = Some(image);
        }
        if let Some(description) = self.description {
            dish.description = Some(description);
        }
        if let Some(spice_level) = self.spice_level {
            dish.spice_level = spice_level;
        }
        if let Some(hot_seller) = self.hot_seller {
            dish.hot_seller = Some(hot_seller);
        }
        if let Some(sub_category) = self.sub_category {
            dish.sub_category = Some(sub_category);
        }
        if let Some(variant) = self.variant {
            dish.variant = Some(variant);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_price_validation() {
        assert!(is_valid_price(&Decimal::from_str("9.99").unwrap()));
        assert!(is_valid_price(&Decimal::from_str("10").unwrap()));
        assert!(is_valid_price(&Decimal::from_str("1.500").unwrap()));
        assert!(!is_valid_price(&Decimal::from_str("0").unwrap()));
        assert!(!is_valid_price(&Decimal::from_str("-1.00").unwrap()));
        assert!(!is_valid_price(&Decimal::from_str("1.999").unwrap()));
    }

    #[test]
    fn test_category_defaults_to_active() {
        let category = CategoryCreate {
            name: "Pizza".to_string(),
            priority: None,
            status: None,
            banner_image: None,
            description: None,
            sub_categories: None,
        }
        .into_category(1, 2, 0);
        assert_eq!(category.status, "active");
        assert_eq!(category.restaurant_id, 2);
    }

    #[test]
    fn test_dish_update_apply() {
        let mut dish = DishCreate {
            category_id: 3,
            name: "Margherita".to_string(),
            price: Decimal::from_str("8.50").unwrap(),
            spice_level: "mild".to_string(),
            ..Default::default()
        }
        .into_dish(1, 2, 0);

        DishUpdate {
            price: Some(Decimal::from_str("9.00").unwrap()),
            hot_seller: Some("yes".to_string()),
            ..Default::default()
        }
        .apply(&mut dish);

        assert_eq!(dish.name, "Margherita");
        assert_eq!(dish.price, Decimal::from_str("9.00").unwrap());
        assert_eq!(dish.hot_seller.as_deref(), Some("yes"));
    }
}
