//! Error taxonomy for fetch and configuration failures.
//!
//! Per-provider failures are recoverable and only skip that provider's
//! remaining work; [`ConfigError`] is fatal and aborts before any pipeline
//! work begins.

use thiserror::Error;

/// Failure modes for a single feed fetch.
///
/// A non-200 status and an unparseable body are distinct variants so the
/// log stream can tell them apart, even though both cause the same amount
/// of downstream work to be skipped.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid feed URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("GET {url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("GET {url} returned a body that is not valid JSON: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Startup-time configuration errors. All of these are fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {0} is required but not set")]
    MissingVar(&'static str),

    #[error("PROVIDERS is not a valid JSON array of {{name, url}} pairs: {0}")]
    InvalidProviders(#[source] serde_json::Error),

    #[error("no providers configured; set the PROVIDERS environment variable")]
    NoProviders,

    #[error("invalid value '{value}' for environment variable {var}")]
    InvalidValue { var: &'static str, value: String },
}
