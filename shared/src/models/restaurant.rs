//! Restaurant Model

use serde::{Deserialize, Serialize};

use super::satellite::{
    RestaurantAddress, RestaurantContactInfo, RestaurantImages, RestaurantOperationsTime,
    RestaurantSocials,
};
use super::user::RestaurantUser;

/// Restaurant entity. A branch has `parent_restaurant_id` set (one level deep).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Restaurant {
    pub id: i64,
    pub business_number: String,
    pub restaurant_name: String,
    pub url_slug: String,
    pub tagline: String,
    pub is_branch: bool,
    pub parent_restaurant_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Restaurant {
    pub fn summary(&self) -> RestaurantSummary {
        RestaurantSummary {
            id: self.id,
            business_number: self.business_number.clone(),
            restaurant_name: self.restaurant_name.clone(),
        }
    }
}

/// Parent reference embedded in listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantSummary {
    pub id: i64,
    pub business_number: String,
    pub restaurant_name: String,
}

/// Public listing entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantListItem {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    pub parent_restaurant: Option<RestaurantSummary>,
}

/// Restaurant with every satellite record joined
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantDetail {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    pub contact_info: Option<RestaurantContactInfo>,
    pub images: Option<RestaurantImages>,
    pub address: Option<RestaurantAddress>,
    pub socials: Option<RestaurantSocials>,
    #[serde(default)]
    pub operations_time: Vec<RestaurantOperationsTime>,
    pub user: Option<RestaurantUser>,
    pub parent_restaurant: Option<RestaurantSummary>,
}

/// Create restaurant payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantCreate {
    pub business_number: String,
    pub restaurant_name: String,
    pub url_slug: String,
    pub tagline: String,
}

/// Create branch payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchRestaurantCreate {
    pub business_number: String,
    pub restaurant_name: String,
    pub url_slug: String,
    pub tagline: String,
    /// Email of the account provisioned to own the branch
    pub user_email: Option<String>,
}

impl BranchRestaurantCreate {
    pub fn restaurant_fields(&self) -> RestaurantCreate {
        RestaurantCreate {
            business_number: self.business_number.clone(),
            restaurant_name: self.restaurant_name.clone(),
            url_slug: self.url_slug.clone(),
            tagline: self.tagline.clone(),
        }
    }
}

/// Result of branch creation; `generated_password` is only present when the
/// service minted a one-off password for the branch owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchCreated {
    pub restaurant: Restaurant,
    pub user: RestaurantUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_password: Option<String>,
}

/// Update restaurant payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantUpdate {
    pub business_number: Option<String>,
    pub restaurant_name: Option<String>,
    pub url_slug: Option<String>,
    pub tagline: Option<String>,
}

impl RestaurantUpdate {
    pub fn apply(self, restaurant: &mut Restaurant) {
        if let Some(business_number) = self.business_number {
            restaurant.business_number = business_number;
        }
        if let Some(restaurant_name) = self.restaurant_name {
            restaurant.restaurant_name = restaurant_name;
        }
        if let Some(url_slug) = self.url_slug {
            restaurant.url_slug = url_slug;
        }
        if let Some(tagline) = self.tagline {
            restaurant.tagline = tagline;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restaurant() -> Restaurant {
        Restaurant {
            id: 7,
            business_number: "B1".to_string(),
            restaurant_name: "Pizza Co".to_string(),
            url_slug: "pizza-co".to_string(),
            tagline: "Best pizza".to_string(),
            is_branch: false,
            parent_restaurant_id: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_update_apply_keeps_absent_fields() {
        let mut r = restaurant();
        RestaurantUpdate {
            tagline: Some("Even better pizza".to_string()),
            ..Default::default()
        }
        .apply(&mut r);

        assert_eq!(r.tagline, "Even better pizza");
        assert_eq!(r.restaurant_name, "Pizza Co");
        assert_eq!(r.url_slug, "pizza-co");
    }

    #[test]
    fn test_list_item_flattens_restaurant() {
        let item = RestaurantListItem {
            restaurant: restaurant(),
            parent_restaurant: None,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["restaurant_name"], "Pizza Co");
        assert!(json["parent_restaurant"].is_null());
    }
}
