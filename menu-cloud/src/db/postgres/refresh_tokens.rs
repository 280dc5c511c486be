//! Refresh token storage (one live row per user)

use shared::models::RefreshTokenRecord;
use sqlx::{PgExecutor, PgPool};

pub async fn find(
    conn: impl PgExecutor<'_>,
    user_id: i64,
) -> Result<Option<RefreshTokenRecord>, sqlx::Error> {
    sqlx::query_as("SELECT user_id, refresh_token, expires_at FROM user_token WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(conn)
        .await
}

/// Delete the stale record (if any) and insert the new one in one transaction
pub async fn replace(pool: &PgPool, record: &RefreshTokenRecord) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM user_token WHERE user_id = $1")
        .bind(record.user_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("INSERT INTO user_token (user_id, refresh_token, expires_at) VALUES ($1, $2, $3)")
        .bind(record.user_id)
        .bind(&record.refresh_token)
        .bind(record.expires_at)
        .execute(&mut *tx)
        .await?;

    tx.commit().await
}
