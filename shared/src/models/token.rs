//! Token Models

use serde::{Deserialize, Serialize};

/// The single live refresh token of a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct RefreshTokenRecord {
    pub user_id: i64,
    pub refresh_token: String,
    /// Unix seconds; the refresh token's own expiry at issue time
    pub expires_at: i64,
}

/// Issued credentials returned by login and refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Always "bearer"
    pub token_type: String,
    /// Unix seconds at which the access token expires
    pub expires_in: i64,
}
