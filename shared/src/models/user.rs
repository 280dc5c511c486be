//! Restaurant User Model

use serde::{Deserialize, Serialize};

/// A login account; owns at most one restaurant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RestaurantUser {
    pub id: i64,
    pub restaurant_id: Option<i64>,
    /// Normalized (trimmed, lowercase), globally unique
    pub email: String,
    pub image: Option<String>,
    /// Argon2 PHC string
    #[serde(skip_serializing, default)]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub level: Option<i32>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl RestaurantUser {
    pub fn owns_restaurant(&self) -> bool {
        self.restaurant_id.is_some()
    }
}

/// Registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Profile patch; `None` leaves the field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfileUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Stored path of an already uploaded image
    pub image: Option<String>,
}

impl UserProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.image.is_none()
    }

    pub fn apply(self, user: &mut RestaurantUser) {
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(first_name) = self.first_name {
            user.first_name = Some(first_name);
        }
        if let Some(last_name) = self.last_name {
            user.last_name = Some(last_name);
        }
        if let Some(image) = self.image {
            user.image = Some(image);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> RestaurantUser {
        RestaurantUser {
            id: 1,
            restaurant_id: None,
            email: "a@x.com".to_string(),
            image: None,
            password: "$argon2id$secret".to_string(),
            first_name: Some("Ann".to_string()),
            last_name: None,
            level: Some(1),
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_password_never_serialized() {
        let json = serde_json::to_value(user()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "a@x.com");
    }

    #[test]
    fn test_profile_apply_only_present_fields() {
        let mut u = user();
        UserProfileUpdate {
            last_name: Some("Lee".to_string()),
            ..Default::default()
        }
        .apply(&mut u);

        assert_eq!(u.first_name.as_deref(), Some("Ann"));
        assert_eq!(u.last_name.as_deref(), Some("Lee"));
        assert_eq!(u.email, "a@x.com");
    }
}
