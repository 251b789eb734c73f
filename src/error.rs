//! Error types for geomarks

use crate::validate::Violations;
use thiserror::Error;

/// Main error type for geomarks operations
#[derive(Error, Debug)]
pub enum Error {
    /// Bad or missing client input; carries per-field violations
    #[error("invalid request: {0}")]
    Validation(Violations),

    /// Client exceeded the request budget for the current window
    #[error("rate limit exceeded, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Requested entity does not exist upstream
    #[error("not found: {0}")]
    NotFound(String),

    /// Upstream API unavailable or returned a failure
    #[error("upstream error: {message}")]
    Upstream { status: Option<u16>, message: String },

    /// Client-side fetch failure (transport or 5xx from the proxy)
    #[error("network error: {0}")]
    Network(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("server error: {0}")]
    Server(String),

    #[error("geolocation error: {0}")]
    Geo(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for geomarks operations
pub type Result<T> = std::result::Result<T, Error>;
