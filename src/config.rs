use std::str::FromStr;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// S3 / MinIO bucket holding gram pictures.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GramConfig {
    /// When set, a gram cannot be created without a picture.
    pub require_picture: bool,
    pub picture_url_ttl_secs: u64,
    pub max_upload_bytes: usize,
}

impl Default for GramConfig {
    fn default() -> Self {
        Self {
            require_picture: false,
            picture_url_ttl_secs: 30 * 60,
            max_upload_bytes: 10 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub grams: GramConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "grammable".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "grammable-users".into()),
            ttl_minutes: env_or("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: env_or("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };
        let storage = StorageConfig {
            endpoint: std::env::var("MINIO_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:9000".into()),
            bucket: std::env::var("MINIO_BUCKET").unwrap_or_else(|_| "grams".into()),
            access_key: std::env::var("MINIO_ACCESS_KEY").context("MINIO_ACCESS_KEY is not set")?,
            secret_key: std::env::var("MINIO_SECRET_KEY").context("MINIO_SECRET_KEY is not set")?,
            region: std::env::var("MINIO_REGION").unwrap_or_else(|_| "us-east-1".into()),
        };
        let defaults = GramConfig::default();
        let grams = GramConfig {
            require_picture: env_or("GRAM_REQUIRE_PICTURE", defaults.require_picture),
            picture_url_ttl_secs: env_or("GRAM_PICTURE_URL_TTL_SECS", defaults.picture_url_ttl_secs),
            max_upload_bytes: env_or("GRAM_MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
        };
        Ok(Self {
            database_url,
            jwt,
            storage,
            grams,
        })
    }
}

/// Reads and parses an optional variable, falling back on absence or parse failure.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back_on_missing_or_garbage() {
        std::env::remove_var("GRAMMABLE_TEST_MISSING");
        assert_eq!(env_or("GRAMMABLE_TEST_MISSING", 42u64), 42);

        std::env::set_var("GRAMMABLE_TEST_GARBAGE", "not-a-number");
        assert_eq!(env_or("GRAMMABLE_TEST_GARBAGE", 7i64), 7);

        std::env::set_var("GRAMMABLE_TEST_BOOL", " true ");
        assert!(env_or("GRAMMABLE_TEST_BOOL", false));
    }
}
