//! Default configuration values
//!
//! Named constants for all tunable parameters

use crate::constants::{api, limits, viewport};

/// Default search radius in meters
pub const DEFAULT_RADIUS: f64 = limits::DEFAULT_RADIUS;

/// Default output format
pub const DEFAULT_FORMAT: &str = "text";

/// Default zoom level for locate and CLI searches
pub const DEFAULT_ZOOM: f64 = viewport::DEFAULT_ZOOM;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7878;

/// Default upstream API endpoint
pub const DEFAULT_API_URL: &str = api::WIKIPEDIA_API_URL;

/// Default User-Agent sent to the upstream
pub const DEFAULT_USER_AGENT: &str = concat!("geomarks/", env!("CARGO_PKG_VERSION"));

/// Default upstream request timeout in seconds
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// Default requests admitted per client per window
pub const DEFAULT_RATE_LIMIT_MAX: u32 = limits::RATE_LIMIT_MAX;

/// Default rate limit window in seconds
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = limits::RATE_LIMIT_WINDOW_SECS;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "geomarks";
