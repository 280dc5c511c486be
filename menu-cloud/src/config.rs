//! Service configuration

use std::path::PathBuf;
use std::str::FromStr;

use jsonwebtoken::Algorithm;

use crate::BoxError;

const DEFAULT_MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// Service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP port
    pub http_port: u16,
    /// PostgreSQL connection URL; absent in development means in-memory store
    pub database_url: Option<String>,
    /// HMAC key for access tokens
    pub access_token_secret: String,
    /// HMAC key for refresh tokens
    pub refresh_token_secret: String,
    /// Signing algorithm (HMAC family only)
    pub algorithm: Algorithm,
    pub access_token_expire_minutes: i64,
    pub refresh_token_expire_minutes: i64,
    /// Directory uploaded images are written to
    pub upload_dir: PathBuf,
    pub max_image_size_bytes: usize,
    /// Allowed CORS origins
    pub cors_origins: Vec<String>,
    /// Initial password for provisioned branch owners; random when unset
    pub branch_user_password: Option<String>,
}

impl Config {
    /// Require a secret: must be set and non-empty in non-development environments.
    fn require_secret(
        lookup: &impl Fn(&str) -> Option<String>,
        name: &str,
        environment: &str,
    ) -> Result<String, BoxError> {
        let val = match lookup(name) {
            Some(v) => v,
            None => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, BoxError> {
        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".into());

        let database_url = lookup("DATABASE_URL").filter(|s| !s.is_empty());
        if database_url.is_none() && environment != "development" {
            return Err("DATABASE_URL must be set".into());
        }

        let algorithm = match lookup("ALGORITHM") {
            Some(name) => Algorithm::from_str(&name)
                .map_err(|_| format!("ALGORITHM {name} is not supported"))?,
            None => Algorithm::HS256,
        };
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(format!("ALGORITHM must be an HMAC algorithm, got {algorithm:?}").into());
        }

        Ok(Self {
            http_port: lookup("HTTP_PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            database_url,
            access_token_secret: Self::require_secret(
                &lookup,
                "ACCESS_TOKEN_SECRET_KEY",
                &environment,
            )?,
            refresh_token_secret: Self::require_secret(
                &lookup,
                "REFRESH_TOKEN_SECRET_KEY",
                &environment,
            )?,
            algorithm,
            access_token_expire_minutes: lookup("ACCESS_TOKEN_EXPIRE_MINUTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            refresh_token_expire_minutes: lookup("REFRESH_TOKEN_EXPIRE_MINUTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(60 * 24 * 7),
            upload_dir: lookup("UPLOAD_DIR")
                .unwrap_or_else(|| "static/uploads".into())
                .into(),
            max_image_size_bytes: lookup("MAX_IMAGE_SIZE_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_IMAGE_SIZE),
            cors_origins: lookup("CORS_ORIGINS")
                .unwrap_or_else(|| "http://localhost:3000".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            branch_user_password: lookup("BRANCH_USER_PASSWORD").filter(|s| !s.is_empty()),
            environment,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
