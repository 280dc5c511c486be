//! Categories, add-ons and dishes

use std::collections::HashMap;

use shared::models::{Addon, Category, Dish};
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};

// ── Categories ──

pub async fn insert_category(
    conn: impl PgExecutor<'_>,
    category: &Category,
) -> Result<Category, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO category (
            restaurant_id, name, priority, status, banner_image, description,
            sub_categories, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING *
        "#,
    )
    .bind(category.restaurant_id)
    .bind(&category.name)
    .bind(&category.priority)
    .bind(&category.status)
    .bind(&category.banner_image)
    .bind(&category.description)
    .bind(&category.sub_categories)
    .bind(category.created_at)
    .bind(category.updated_at)
    .fetch_one(conn)
    .await
}

pub async fn find_category(
    conn: impl PgExecutor<'_>,
    id: i64,
) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM category WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn list_categories(
    conn: impl PgExecutor<'_>,
    restaurant_id: i64,
) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM category WHERE restaurant_id = $1 ORDER BY id")
        .bind(restaurant_id)
        .fetch_all(conn)
        .await
}

pub async fn update_category(
    conn: impl PgExecutor<'_>,
    category: &Category,
) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE category SET
            name = $1, priority = $2, status = $3, banner_image = $4,
            description = $5, sub_categories = $6, updated_at = $7
        WHERE id = $8
        RETURNING *
        "#,
    )
    .bind(&category.name)
    .bind(&category.priority)
    .bind(&category.status)
    .bind(&category.banner_image)
    .bind(&category.description)
    .bind(&category.sub_categories)
    .bind(category.updated_at)
    .bind(category.id)
    .fetch_optional(conn)
    .await
}

/// Fails with a foreign key violation while dishes reference the category
pub async fn delete_category(conn: impl PgExecutor<'_>, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM category WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ── Add-ons ──

pub async fn insert_addon(
    conn: impl PgExecutor<'_>,
    addon: &Addon,
) -> Result<Addon, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO addons (restaurant_id, name, price, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(addon.restaurant_id)
    .bind(&addon.name)
    .bind(addon.price)
    .bind(addon.created_at)
    .bind(addon.updated_at)
    .fetch_one(conn)
    .await
}

pub async fn find_addon(conn: impl PgExecutor<'_>, id: i64) -> Result<Option<Addon>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM addons WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn find_addons(
    conn: impl PgExecutor<'_>,
    restaurant_id: i64,
    ids: &[i64],
) -> Result<Vec<Addon>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM addons WHERE restaurant_id = $1 AND id = ANY($2) ORDER BY id")
        .bind(restaurant_id)
        .bind(ids)
        .fetch_all(conn)
        .await
}

pub async fn list_addons(
    conn: impl PgExecutor<'_>,
    restaurant_id: i64,
) -> Result<Vec<Addon>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM addons WHERE restaurant_id = $1 ORDER BY id")
        .bind(restaurant_id)
        .fetch_all(conn)
        .await
}

pub async fn update_addon(
    conn: impl PgExecutor<'_>,
    addon: &Addon,
) -> Result<Option<Addon>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE addons SET name = $1, price = $2, updated_at = $3 WHERE id = $4 RETURNING *",
    )
    .bind(&addon.name)
    .bind(addon.price)
    .bind(addon.updated_at)
    .bind(addon.id)
    .fetch_optional(conn)
    .await
}

pub async fn delete_addon(conn: impl PgExecutor<'_>, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM addons WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ── Dishes ──

#[derive(sqlx::FromRow)]
struct DishAddonRow {
    dish_id: i64,
    #[sqlx(flatten)]
    addon: Addon,
}

/// Populate `addons` of every dish with a single join
async fn attach_addons(
    conn: impl PgExecutor<'_>,
    dishes: &mut [Dish],
) -> Result<(), sqlx::Error> {
    if dishes.is_empty() {
        return Ok(());
    }
    let ids: Vec<i64> = dishes.iter().map(|d| d.id).collect();
    let rows: Vec<DishAddonRow> = sqlx::query_as(
        r#"
        SELECT da.dish_id, a.*
        FROM dish_addons da
        JOIN addons a ON a.id = da.addon_id
        WHERE da.dish_id = ANY($1)
        ORDER BY a.id
        "#,
    )
    .bind(&ids)
    .fetch_all(conn)
    .await?;

    let mut by_dish: HashMap<i64, Vec<Addon>> = HashMap::new();
    for row in rows {
        by_dish.entry(row.dish_id).or_default().push(row.addon);
    }
    for dish in dishes.iter_mut() {
        dish.addons = by_dish.remove(&dish.id).unwrap_or_default();
    }
    Ok(())
}

async fn link_addons(
    tx: &mut Transaction<'_, Postgres>,
    dish_id: i64,
    addon_ids: &[i64],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM dish_addons WHERE dish_id = $1")
        .bind(dish_id)
        .execute(&mut **tx)
        .await?;
    for addon_id in addon_ids {
        sqlx::query(
            "INSERT INTO dish_addons (dish_id, addon_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(dish_id)
        .bind(addon_id)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn with_addons(pool: &PgPool, dish: Option<Dish>) -> Result<Option<Dish>, sqlx::Error> {
    let Some(dish) = dish else {
        return Ok(None);
    };
    let mut dishes = [dish];
    attach_addons(pool, &mut dishes).await?;
    let [dish] = dishes;
    Ok(Some(dish))
}

pub async fn insert_dish(
    pool: &PgPool,
    dish: &Dish,
    addon_ids: &[i64],
) -> Result<Dish, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let mut created: Dish = sqlx::query_as(
        r#"
        INSERT INTO dish (
            restaurant_id, category_id, name, price, discount, availability, image,
            description, spice_level, hot_seller, sub_category, variant,
            created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING *
        "#,
    )
    .bind(dish.restaurant_id)
    .bind(dish.category_id)
    .bind(&dish.name)
    .bind(dish.price)
    .bind(dish.discount)
    .bind(&dish.availability)
    .bind(&dish.image)
    .bind(&dish.description)
    .bind(&dish.spice_level)
    .bind(&dish.hot_seller)
    .bind(&dish.sub_category)
    .bind(&dish.variant)
    .bind(dish.created_at)
    .bind(dish.updated_at)
    .fetch_one(&mut *tx)
    .await?;

    link_addons(&mut tx, created.id, addon_ids).await?;
    created.addons = find_addons(&mut *tx, created.restaurant_id, addon_ids).await?;

    tx.commit().await?;
    Ok(created)
}

pub async fn find_dish(pool: &PgPool, id: i64) -> Result<Option<Dish>, sqlx::Error> {
    let dish = sqlx::query_as("SELECT * FROM dish WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    with_addons(pool, dish).await
}

pub async fn find_dish_by_name(
    pool: &PgPool,
    restaurant_id: i64,
    name: &str,
) -> Result<Option<Dish>, sqlx::Error> {
    let dish = sqlx::query_as("SELECT * FROM dish WHERE restaurant_id = $1 AND name = $2")
        .bind(restaurant_id)
        .bind(name)
        .fetch_optional(pool)
        .await?;
    with_addons(pool, dish).await
}

pub async fn list_dishes(
    pool: &PgPool,
    restaurant_id: i64,
    skip: i64,
    limit: i64,
) -> Result<Vec<Dish>, sqlx::Error> {
    let mut dishes: Vec<Dish> =
        sqlx::query_as("SELECT * FROM dish WHERE restaurant_id = $1 ORDER BY id OFFSET $2 LIMIT $3")
            .bind(restaurant_id)
            .bind(skip.max(0))
            .bind(limit.max(0))
            .fetch_all(pool)
            .await?;
    attach_addons(pool, &mut dishes).await?;
    Ok(dishes)
}

pub async fn update_dish(
    pool: &PgPool,
    dish: &Dish,
    addon_ids: Option<&[i64]>,
) -> Result<Option<Dish>, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let updated: Option<Dish> = sqlx::query_as(
        r#"
        UPDATE dish SET
            category_id = $1, name = $2, price = $3, discount = $4, availability = $5,
            image = $6, description = $7, spice_level = $8, hot_seller = $9,
            sub_category = $10, variant = $11, updated_at = $12
        WHERE id = $13
        RETURNING *
        "#,
    )
    .bind(dish.category_id)
    .bind(&dish.name)
    .bind(dish.price)
    .bind(dish.discount)
    .bind(&dish.availability)
    .bind(&dish.image)
    .bind(&dish.description)
    .bind(&dish.spice_level)
    .bind(&dish.hot_seller)
    .bind(&dish.sub_category)
    .bind(&dish.variant)
    .bind(dish.updated_at)
    .bind(dish.id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(updated) = updated else {
        return Ok(None);
    };
    if let Some(addon_ids) = addon_ids {
        link_addons(&mut tx, updated.id, addon_ids).await?;
    }
    let mut dishes = [updated];
    attach_addons(&mut *tx, &mut dishes).await?;

    tx.commit().await?;
    let [updated] = dishes;
    Ok(Some(updated))
}

pub async fn delete_dish(conn: impl PgExecutor<'_>, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM dish WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}
