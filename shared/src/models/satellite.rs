//! Per-restaurant satellite records
//!
//! Contact info, images, address and socials exist at most once per
//! restaurant and are upserted: looked up by restaurant id, created with
//! empty fields when absent, then patched. Operations time is keyed by
//! (restaurant, day).

use serde::{Deserialize, Serialize};

/// Implements `empty` + `apply` for a one-per-restaurant record whose
/// payload fields are all `Option<String>`.
macro_rules! satellite_record {
    ($record:ident, $update:ident { $($field:ident),+ $(,)? }) => {
        impl $record {
            pub fn empty(id: i64, restaurant_id: i64, now: i64) -> Self {
                Self {
                    id,
                    restaurant_id,
                    $($field: None,)+
                    created_at: now,
                    updated_at: now,
                }
            }
        }

        impl $update {
            pub fn apply(self, record: &mut $record) {
                $(
                    if let Some(value) = self.$field {
                        record.$field = Some(value);
                    }
                )+
            }
        }
    };
}

/// Phone numbers of a restaurant
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RestaurantContactInfo {
    pub id: i64,
    pub restaurant_id: i64,
    pub whatsapp: Option<String>,
    pub landline: Option<String>,
    pub mobile: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantContactInfoUpdate {
    pub whatsapp: Option<String>,
    pub landline: Option<String>,
    pub mobile: Option<String>,
}

satellite_record!(RestaurantContactInfo, RestaurantContactInfoUpdate {
    whatsapp,
    landline,
    mobile,
});

/// Stored upload paths for logo and cover photo
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RestaurantImages {
    pub id: i64,
    pub restaurant_id: i64,
    pub logo: Option<String>,
    pub cover_photo: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantImagesUpdate {
    pub logo: Option<String>,
    pub cover_photo: Option<String>,
}

satellite_record!(RestaurantImages, RestaurantImagesUpdate { logo, cover_photo });

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RestaurantAddress {
    pub id: i64,
    pub restaurant_id: i64,
    pub address: Option<String>,
    pub house_number: Option<String>,
    pub block: Option<String>,
    pub area: Option<String>,
    pub city: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantAddressUpdate {
    pub address: Option<String>,
    pub house_number: Option<String>,
    pub block: Option<String>,
    pub area: Option<String>,
    pub city: Option<String>,
}

satellite_record!(RestaurantAddress, RestaurantAddressUpdate {
    address,
    house_number,
    block,
    area,
    city,
});

/// Social media handles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RestaurantSocials {
    pub id: i64,
    pub restaurant_id: i64,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub tiktok: Option<String>,
    pub snapchat: Option<String>,
    pub youtube: Option<String>,
    pub x: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantSocialsUpdate {
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub tiktok: Option<String>,
    pub snapchat: Option<String>,
    pub youtube: Option<String>,
    pub x: Option<String>,
}

satellite_record!(RestaurantSocials, RestaurantSocialsUpdate {
    instagram,
    facebook,
    tiktok,
    snapchat,
    youtube,
    x,
});

/// Opening hours for one day of the week
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RestaurantOperationsTime {
    pub id: i64,
    pub restaurant_id: i64,
    pub day: String,
    pub open_time: String,
    pub close_time: String,
    pub priority: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Upsert payload keyed by `day`. Creating a new day requires every field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantOperationsTimeUpdate {
    pub day: String,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
    pub priority: Option<i32>,
}

impl RestaurantOperationsTimeUpdate {
    /// Builds a fresh record, or returns the name of the first missing field.
    pub fn into_new(
        self,
        id: i64,
        restaurant_id: i64,
        now: i64,
    ) -> Result<RestaurantOperationsTime, &'static str> {
        Ok(RestaurantOperationsTime {
            id,
            restaurant_id,
            day: self.day,
            open_time: self.open_time.ok_or("open_time")?,
            close_time: self.close_time.ok_or("close_time")?,
            priority: self.priority.ok_or("priority")?,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn apply(self, record: &mut RestaurantOperationsTime) {
        if let Some(open_time) = self.open_time {
            record.open_time = open_time;
        }
        if let Some(close_time) = self.close_time {
            record.close_time = close_time;
        }
        if let Some(priority) = self.priority {
            record.priority = priority;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socials_upsert_from_empty() {
        let mut socials = RestaurantSocials::empty(1, 10, 100);
        RestaurantSocialsUpdate {
            instagram: Some("@pizza".to_string()),
            ..Default::default()
        }
        .apply(&mut socials);

        assert_eq!(socials.restaurant_id, 10);
        assert_eq!(socials.instagram.as_deref(), Some("@pizza"));
        assert!(socials.facebook.is_none());
    }

    #[test]
    fn test_address_patch_preserves_existing() {
        let mut address = RestaurantAddress::empty(1, 10, 100);
        address.city = Some("Kuwait City".to_string());
        RestaurantAddressUpdate {
            block: Some("4".to_string()),
            ..Default::default()
        }
        .apply(&mut address);

        assert_eq!(address.city.as_deref(), Some("Kuwait City"));
        assert_eq!(address.block.as_deref(), Some("4"));
    }

    #[test]
    fn test_operations_time_new_requires_all_fields() {
        let update = RestaurantOperationsTimeUpdate {
            day: "Monday".to_string(),
            open_time: Some("09:00".to_string()),
            close_time: None,
            priority: Some(1),
        };
        assert_eq!(update.into_new(1, 10, 0).unwrap_err(), "close_time");

        let update = RestaurantOperationsTimeUpdate {
            day: "Monday".to_string(),
            open_time: Some("09:00".to_string()),
            close_time: Some("18:00".to_string()),
            priority: Some(1),
        };
        let record = update.into_new(1, 10, 0).unwrap();
        assert_eq!(record.day, "Monday");
        assert_eq!(record.close_time, "18:00");
    }

    #[test]
    fn test_operations_time_apply() {
        let mut record = RestaurantOperationsTime {
            id: 1,
            restaurant_id: 10,
            day: "Friday".to_string(),
            open_time: "12:00".to_string(),
            close_time: "23:00".to_string(),
            priority: 5,
            created_at: 0,
            updated_at: 0,
        };
        RestaurantOperationsTimeUpdate {
            day: "Friday".to_string(),
            close_time: Some("01:00".to_string()),
            ..Default::default()
        }
        .apply(&mut record);

        assert_eq!(record.open_time, "12:00");
        assert_eq!(record.close_time, "01:00");
    }
}
