//! Token issuer
//!
//! Access and refresh tokens are HMAC JWTs signed with separate keys. Each
//! user has at most one stored refresh record; login replaces it, refresh
//! only mints a new access token against it.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{RefreshTokenRecord, TokenPair};
use shared::util::now_secs;
use thiserror::Error;

use crate::config::Config;
use crate::db::Store;
use crate::error::ServiceResult;

const ACCESS: &str = "access";
const REFRESH: &str = "refresh";

/// Claims carried by both token kinds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    /// Expiration (unix seconds)
    pub exp: i64,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Unique per minted token
    pub jti: String,
    /// "access" | "refresh"
    pub token_type: String,
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    ExpiredToken,

    #[error("invalid signature")]
    InvalidSignature,

    #[error("token generation failed: {0}")]
    GenerationFailed(String),
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
            ErrorKind::InvalidSignature => JwtError::InvalidSignature,
            _ => JwtError::InvalidToken(e.to_string()),
        }
    }
}

impl From<JwtError> for AppError {
    fn from(e: JwtError) -> Self {
        match e {
            JwtError::ExpiredToken => AppError::token_expired(),
            JwtError::GenerationFailed(msg) => {
                tracing::error!(error = %msg, "Token generation failed");
                AppError::new(ErrorCode::InternalError)
            }
            _ => AppError::not_authenticated(),
        }
    }
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

pub struct TokenIssuer {
    algorithm: Algorithm,
    access: KeyPair,
    refresh: KeyPair,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenIssuer {
    pub fn new(config: &Config) -> Self {
        Self {
            algorithm: config.algorithm,
            access: KeyPair::from_secret(&config.access_token_secret),
            refresh: KeyPair::from_secret(&config.refresh_token_secret),
            access_ttl_secs: config.access_token_expire_minutes * 60,
            refresh_ttl_secs: config.refresh_token_expire_minutes * 60,
        }
    }

    /// Extract the token from an `Authorization` header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }

    fn mint(&self, user_id: i64, token_type: &str) -> Result<(String, i64), JwtError> {
        let (keys, ttl) = match token_type {
            REFRESH => (&self.refresh, self.refresh_ttl_secs),
            _ => (&self.access, self.access_ttl_secs),
        };
        let now = now_secs();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: now + ttl,
            iat: now,
            jti: uuid::Uuid::new_v4().simple().to_string(),
            token_type: token_type.to_string(),
        };
        let token = encode(&Header::new(self.algorithm), &claims, &keys.encoding)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))?;
        Ok((token, claims.exp))
    }

    fn decode(&self, token: &str, token_type: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_required_spec_claims(&["sub", "exp"]);
        let keys = match token_type {
            REFRESH => {
                // Refresh expiry is decided by the stored record
                validation.validate_exp = false;
                &self.refresh
            }
            _ => &self.access,
        };

        let claims = decode::<Claims>(token, &keys.decoding, &validation)?.claims;
        if claims.token_type != token_type {
            return Err(JwtError::InvalidToken(format!(
                "expected {token_type} token, got {}",
                claims.token_type
            )));
        }
        Ok(claims)
    }

    /// Verify an access token; any failure yields `None`
    pub fn decode_access(&self, token: &str) -> Option<Claims> {
        match self.decode(token, ACCESS) {
            Ok(claims) => Some(claims),
            Err(e) => {
                tracing::debug!(error = %e, "Access token rejected");
                None
            }
        }
    }

    /// Issue a token pair.
    ///
    /// Without `refresh_token` this is a fresh session: a new refresh token
    /// replaces whatever record the user had. With one, it must equal the
    /// stored record and is passed through; only the access token is new.
    pub async fn issue(
        &self,
        store: &dyn Store,
        user_id: i64,
        refresh_token: Option<&str>,
    ) -> ServiceResult<TokenPair> {
        let refresh_token = match refresh_token {
            Some(token) => {
                let stored = store.find_refresh_token(user_id).await?;
                match stored {
                    Some(record) if record.refresh_token == token => token.to_string(),
                    _ => {
                        tracing::warn!(user_id, "Refresh token does not match stored record");
                        return Err(AppError::new(ErrorCode::RefreshTokenInvalid).into());
                    }
                }
            }
            None => {
                let (token, expires_at) = self.mint(user_id, REFRESH).map_err(AppError::from)?;
                store
                    .replace_refresh_token(&RefreshTokenRecord {
                        user_id,
                        refresh_token: token.clone(),
                        expires_at,
                    })
                    .await?;
                token
            }
        };

        let (access_token, expires_in) = self.mint(user_id, ACCESS).map_err(AppError::from)?;
        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "bearer".to_string(),
            expires_in,
        })
    }

    /// Exchange a refresh token for a new access token
    pub async fn validate_refresh(&self, store: &dyn Store, token: &str) -> ServiceResult<TokenPair> {
        if token.is_empty() {
            return Err(AppError::not_authenticated().into());
        }
        let user_id = self
            .decode(token, REFRESH)
            .ok()
            .and_then(|claims| claims.user_id())
            .ok_or_else(AppError::not_authenticated)?;

        let record = store
            .find_refresh_token(user_id)
            .await?
            .ok_or_else(AppError::not_authenticated)?;
        if record.expires_at <= now_secs() {
            tracing::info!(user_id, "Refresh token expired");
            return Err(AppError::token_expired().into());
        }

        self.issue(store, user_id, Some(token)).await
    }
}
