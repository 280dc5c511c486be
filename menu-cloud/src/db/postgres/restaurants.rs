//! restaurant table and its transactional writes

use shared::models::{Restaurant, RestaurantUser};
use sqlx::{PgExecutor, PgPool};

use super::users;
use crate::db::{StoreError, StoreResult, UniqueField};

async fn insert(
    conn: impl PgExecutor<'_>,
    restaurant: &Restaurant,
) -> Result<Restaurant, sqlx::Error> {
    sqlx::query_as(
        r#"
        INSERT INTO restaurant (
            business_number, restaurant_name, url_slug, tagline,
            is_branch, parent_restaurant_id, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(&restaurant.business_number)
    .bind(&restaurant.restaurant_name)
    .bind(&restaurant.url_slug)
    .bind(&restaurant.tagline)
    .bind(restaurant.is_branch)
    .bind(restaurant.parent_restaurant_id)
    .bind(restaurant.created_at)
    .bind(restaurant.updated_at)
    .fetch_one(conn)
    .await
}

pub async fn find_by_id(
    conn: impl PgExecutor<'_>,
    id: i64,
) -> Result<Option<Restaurant>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM restaurant WHERE id = $1")
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn find_by_name(
    conn: impl PgExecutor<'_>,
    name: &str,
) -> Result<Option<Restaurant>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM restaurant WHERE restaurant_name = $1")
        .bind(name)
        .fetch_optional(conn)
        .await
}

pub async fn find_by_business_number(
    conn: impl PgExecutor<'_>,
    business_number: &str,
) -> Result<Option<Restaurant>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM restaurant WHERE business_number = $1")
        .bind(business_number)
        .fetch_optional(conn)
        .await
}

pub async fn find_by_slug(
    conn: impl PgExecutor<'_>,
    url_slug: &str,
) -> Result<Option<Restaurant>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM restaurant WHERE url_slug = $1")
        .bind(url_slug)
        .fetch_optional(conn)
        .await
}

pub async fn list(
    conn: impl PgExecutor<'_>,
    skip: i64,
    limit: i64,
) -> Result<Vec<Restaurant>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM restaurant ORDER BY id OFFSET $1 LIMIT $2")
        .bind(skip.max(0))
        .bind(limit.max(0))
        .fetch_all(conn)
        .await
}

pub async fn list_branches(
    conn: impl PgExecutor<'_>,
    parent_id: i64,
) -> Result<Vec<Restaurant>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM restaurant WHERE parent_restaurant_id = $1 ORDER BY id")
        .bind(parent_id)
        .fetch_all(conn)
        .await
}

pub async fn update(
    conn: impl PgExecutor<'_>,
    restaurant: &Restaurant,
) -> Result<Option<Restaurant>, sqlx::Error> {
    sqlx::query_as(
        r#"
        UPDATE restaurant SET
            business_number = $1, restaurant_name = $2, url_slug = $3,
            tagline = $4, updated_at = $5
        WHERE id = $6
        RETURNING *
        "#,
    )
    .bind(&restaurant.business_number)
    .bind(&restaurant.restaurant_name)
    .bind(&restaurant.url_slug)
    .bind(&restaurant.tagline)
    .bind(restaurant.updated_at)
    .bind(restaurant.id)
    .fetch_optional(conn)
    .await
}

/// Foreign keys cascade to branches, owners, tokens, satellites and catalog
pub async fn delete(conn: impl PgExecutor<'_>, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM restaurant WHERE id = $1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Insert a restaurant and assign it to its owner in one transaction
pub async fn create_for_owner(
    pool: &PgPool,
    restaurant: &Restaurant,
    owner_id: i64,
) -> StoreResult<(Restaurant, RestaurantUser)> {
    let mut tx = pool.begin().await?;

    let restaurant = insert(&mut *tx, restaurant).await?;
    let assigned =
        users::assign_restaurant(&mut *tx, owner_id, restaurant.id, restaurant.updated_at).await?;
    // Dropping `tx` on the error paths rolls the insert back
    let Some(owner) = assigned else {
        return Err(match users::find_by_id(&mut *tx, owner_id).await? {
            Some(_) => StoreError::Conflict(UniqueField::RestaurantOwner),
            None => StoreError::NotFound("user"),
        });
    };

    tx.commit().await?;
    Ok((restaurant, owner))
}

/// Insert a branch and provision its owner in one transaction
pub async fn create_branch(
    pool: &PgPool,
    branch: &Restaurant,
    owner: &RestaurantUser,
) -> StoreResult<(Restaurant, RestaurantUser)> {
    let mut tx = pool.begin().await?;

    let branch = insert(&mut *tx, branch).await?;
    let mut owner = owner.clone();
    owner.restaurant_id = Some(branch.id);
    let owner = users::insert(&mut *tx, &owner).await?;

    tx.commit().await?;
    Ok((branch, owner))
}
