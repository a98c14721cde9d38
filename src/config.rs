//! Runtime configuration resolved once at startup.
//!
//! Everything comes from environment variables (a `.env` file is loaded by
//! the entry points before this runs). The resulting [`AppConfig`] is built
//! once and passed by reference into the pipeline; nothing reads the
//! environment after startup.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// One bike-share system's GBFS root endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    pub name: String,
    pub url: String,
}

/// Connection parameters for the stats database.
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub providers: Vec<ProviderConfig>,
    pub s3_bucket: String,
    /// Language key used to look up the feed list in a root manifest.
    pub lang_key: String,
    /// Feed kinds to fetch and record stats for, in order.
    pub relevant_feeds: Vec<String>,
    pub http_timeout: Duration,
    pub db: DbConfig,
}

impl AppConfig {
    /// Resolves the full configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `PROVIDERS` is missing, malformed, or
    /// empty, or if any required database variable is absent.
    pub fn from_env() -> Result<Self, ConfigError> {
        let providers_raw =
            env::var("PROVIDERS").map_err(|_| ConfigError::MissingVar("PROVIDERS"))?;
        let providers = parse_providers(&providers_raw)?;

        let relevant_feeds_raw =
            env::var("RELEVANT_FEEDS").unwrap_or_else(|_| "station_status".to_string());

        Ok(Self {
            providers,
            s3_bucket: env::var("S3_BUCKET").unwrap_or_else(|_| "gbfs-data-storage".to_string()),
            lang_key: env::var("GBFS_LANG").unwrap_or_else(|_| "en".to_string()),
            relevant_feeds: parse_feed_list(&relevant_feeds_raw),
            http_timeout: Duration::from_secs(parse_var("HTTP_TIMEOUT_SECS", 30)?),
            db: DbConfig {
                host: env::var("RDS_HOST").map_err(|_| ConfigError::MissingVar("RDS_HOST"))?,
                port: parse_var("RDS_PORT", 3306)?,
                user: env::var("RDS_USER").map_err(|_| ConfigError::MissingVar("RDS_USER"))?,
                password: env::var("RDS_PASSWORD")
                    .map_err(|_| ConfigError::MissingVar("RDS_PASSWORD"))?,
                database: env::var("RDS_DATABASE")
                    .map_err(|_| ConfigError::MissingVar("RDS_DATABASE"))?,
            },
        })
    }
}

fn parse_providers(raw: &str) -> Result<Vec<ProviderConfig>, ConfigError> {
    let providers: Vec<ProviderConfig> =
        serde_json::from_str(raw).map_err(ConfigError::InvalidProviders)?;
    if providers.is_empty() {
        return Err(ConfigError::NoProviders);
    }
    Ok(providers)
}

fn parse_feed_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_var<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value: raw }),
        Err(_) => Ok(default),
    }
}
