//! One-per-restaurant records and operations time

use shared::models::{
    RestaurantAddress, RestaurantContactInfo, RestaurantImages, RestaurantOperationsTime,
    RestaurantSocials,
};
use sqlx::PgExecutor;

pub async fn find_contact_info(
    conn: impl PgExecutor<'_>,
    restaurant_id: i64,
) -> Result<Option<RestaurantContactInfo>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM restaurant_contact_info WHERE restaurant_id = $1")
        .bind(restaurant_id)
        .fetch_optional(conn)
        .await
}

pub async fn save_contact_info(
    conn: impl PgExecutor<'_>,
    record: &RestaurantContactInfo,
) -> Result<RestaurantContactInfo, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO restaurant_contact_info (
            restaurant_id, whatsapp, landline, mobile, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (restaurant_id) DO UPDATE SET
            whatsapp = EXCLUDED.whatsapp,
            landline = EXCLUDED.landline,
            mobile = EXCLUDED.mobile,
            updated_at = EXCLUDED.updated_at
        RETURNING *
        "#,
    )
    .bind(record.restaurant_id)
    .bind(&record.whatsapp)
    .bind(&record.landline)
    .bind(&record.mobile)
    .bind(record.created_at)
    .bind(record.updated_at)
    .fetch_one(conn)
    .await
}

pub async fn find_images(
    conn: impl PgExecutor<'_>,
    restaurant_id: i64,
) -> Result<Option<RestaurantImages>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM restaurant_images WHERE restaurant_id = $1")
        .bind(restaurant_id)
        .fetch_optional(conn)
        .await
}

pub async fn save_images(
    conn: impl PgExecutor<'_>,
    record: &RestaurantImages,
) -> Result<RestaurantImages, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO restaurant_images (restaurant_id, logo, cover_photo, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (restaurant_id) DO UPDATE SET
            logo = EXCLUDED.logo,
            cover_photo = EXCLUDED.cover_photo,
            updated_at = EXCLUDED.updated_at
        RETURNING *
        "#,
    )
    .bind(record.restaurant_id)
    .bind(&record.logo)
    .bind(&record.cover_photo)
    .bind(record.created_at)
    .bind(record.updated_at)
    .fetch_one(conn)
    .await
}

pub async fn find_address(
    conn: impl PgExecutor<'_>,
    restaurant_id: i64,
) -> Result<Option<RestaurantAddress>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM restaurant_address WHERE restaurant_id = $1")
        .bind(restaurant_id)
        .fetch_optional(conn)
        .await
}

pub async fn save_address(
    conn: impl PgExecutor<'_>,
    record: &RestaurantAddress,
) -> Result<RestaurantAddress, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO restaurant_address (
            restaurant_id, address, house_number, block, area, city, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (restaurant_id) DO UPDATE SET
            address = EXCLUDED.address,
            house_number = EXCLUDED.house_number,
            block = EXCLUDED.block,
            area = EXCLUDED.area,
            city = EXCLUDED.city,
            updated_at = EXCLUDED.updated_at
        RETURNING *
        "#,
    )
    .bind(record.restaurant_id)
    .bind(&record.address)
    .bind(&record.house_number)
    .bind(&record.block)
    .bind(&record.area)
    .bind(&record.city)
    .bind(record.created_at)
    .bind(record.updated_at)
    .fetch_one(conn)
    .await
}

pub async fn find_socials(
    conn: impl PgExecutor<'_>,
    restaurant_id: i64,
) -> Result<Option<RestaurantSocials>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM restaurant_socials WHERE restaurant_id = $1")
        .bind(restaurant_id)
        .fetch_optional(conn)
        .await
}

pub async fn save_socials(
    conn: impl PgExecutor<'_>,
    record: &RestaurantSocials,
) -> Result<RestaurantSocials, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO restaurant_socials (
            restaurant_id, instagram, facebook, tiktok, snapchat, youtube, x,
            created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (restaurant_id) DO UPDATE SET
            instagram = EXCLUDED.instagram,
            facebook = EXCLUDED.facebook,
            tiktok = EXCLUDED.tiktok,
            snapchat = EXCLUDED.snapchat,
            youtube = EXCLUDED.youtube,
            x = EXCLUDED.x,
            updated_at = EXCLUDED.updated_at
        RETURNING *
        "#,
    )
    .bind(record.restaurant_id)
    .bind(&record.instagram)
    .bind(&record.facebook)
    .bind(&record.tiktok)
    .bind(&record.snapchat)
    .bind(&record.youtube)
    .bind(&record.x)
    .bind(record.created_at)
    .bind(record.updated_at)
    .fetch_one(conn)
    .await
}

// ── Operations time ──

pub async fn list_operations_time(
    conn: impl PgExecutor<'_>,
    restaurant_id: i64,
) -> Result<Vec<RestaurantOperationsTime>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM restaurant_operations_time WHERE restaurant_id = $1 ORDER BY priority, id",
    )
    .bind(restaurant_id)
    .fetch_all(conn)
    .await
}

pub async fn find_operations_time(
    conn: impl PgExecutor<'_>,
    id: i64,
) -> Result<Option<RestaurantOperationsTime>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM restaurant_operations_time WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn find_operations_time_by_day(
    conn: impl PgExecutor<'_>,
    restaurant_id: i64,
    day: &str,
) -> Result<Option<RestaurantOperationsTime>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM restaurant_operations_time WHERE restaurant_id = $1 AND day = $2")
        .bind(restaurant_id)
        .bind(day)
        .fetch_optional(conn)
        .await
}

pub async fn save_operations_time(
    conn: impl PgExecutor<'_>,
    record: &RestaurantOperationsTime,
) -> Result<RestaurantOperationsTime, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO restaurant_operations_time (
            restaurant_id, day, open_time, close_time, priority, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT ON CONSTRAINT uq_operations_time_day DO UPDATE SET
            open_time = EXCLUDED.open_time,
            close_time = EXCLUDED.close_time,
            priority = EXCLUDED.priority,
            updated_at = EXCLUDED.updated_at
        RETURNING *
        "#,
    )
    .bind(record.restaurant_id)
    .bind(&record.day)
    .bind(&record.open_time)
    .bind(&record.close_time)
    .bind(record.priority)
    .bind(record.created_at)
    .bind(record.updated_at)
    .fetch_one(conn)
    .await
}

pub async fn delete_operations_time(
    conn: impl PgExecutor<'_>,
    id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM restaurant_operations_time WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
