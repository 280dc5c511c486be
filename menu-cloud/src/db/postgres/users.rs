//! restaurant_user table

use shared::models::{RestaurantUser, UserProfileUpdate};
use sqlx::PgExecutor;

pub async fn insert(
    conn: impl PgExecutor<'_>,
    user: &RestaurantUser,
) -> Result<RestaurantUser, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO restaurant_user (
            restaurant_id, email, image, password, first_name, last_name,
            level, is_active, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(user.restaurant_id)
    .bind(&user.email)
    .bind(&user.image)
    .bind(&user.password)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(user.level)
    .bind(user.is_active)
    .bind(user.created_at)
    .bind(user.updated_at)
    .fetch_one(conn)
    .await
}

pub async fn find_by_id(
    conn: impl PgExecutor<'_>,
    id: i64,
) -> Result<Option<RestaurantUser>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM restaurant_user WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn find_by_email(
    conn: impl PgExecutor<'_>,
    email: &str,
) -> Result<Option<RestaurantUser>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM restaurant_user WHERE email = $1")
        .bind(email)
        .fetch_optional(conn)
        .await
}

pub async fn find_by_restaurant(
    conn: impl PgExecutor<'_>,
    restaurant_id: i64,
) -> Result<Option<RestaurantUser>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM restaurant_user WHERE restaurant_id = $1 ORDER BY id LIMIT 1")
        .bind(restaurant_id)
        .fetch_optional(conn)
        .await
}

/// Profile columns only; absent fields keep their stored value
pub async fn update_profile(
    conn: impl PgExecutor<'_>,
    user_id: i64,
    patch: &UserProfileUpdate,
    now: i64,
) -> Result<Option<RestaurantUser>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE restaurant_user SET
            email = COALESCE($1, email),
            image = COALESCE($2, image),
            first_name = COALESCE($3, first_name),
            last_name = COALESCE($4, last_name),
            updated_at = $5
        WHERE id = $6
        RETURNING *
        "#,
    )
    .bind(&patch.email)
    .bind(&patch.image)
    .bind(&patch.first_name)
    .bind(&patch.last_name)
    .bind(now)
    .bind(user_id)
    .fetch_optional(conn)
    .await
}

/// Points a user without a restaurant at `restaurant_id`; `None` if the user
/// is missing or already owns one
pub async fn assign_restaurant(
    conn: impl PgExecutor<'_>,
    user_id: i64,
    restaurant_id: i64,
    now: i64,
) -> Result<Option<RestaurantUser>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE restaurant_user SET restaurant_id = $1, updated_at = $2
        WHERE id = $3 AND restaurant_id IS NULL
        RETURNING *
        "#,
    )
    .bind(restaurant_id)
    .bind(now)
    .bind(user_id)
    .fetch_optional(conn)
    .await
}
