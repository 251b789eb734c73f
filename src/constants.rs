//! Centralized constants for the geomarks crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// External API endpoints
pub mod api {
    /// MediaWiki action API used for geosearch and page details
    pub const WIKIPEDIA_API_URL: &str = "https://en.wikipedia.org/w/api.php";

    /// IP geolocation API (free, no key required)
    pub const IP_API_URL: &str = "http://ip-api.com/json";
}

/// Search request limits
pub mod limits {
    /// Smallest accepted search radius in meters
    pub const RADIUS_MIN: f64 = 10.0;

    /// Largest radius the upstream geosearch accepts, in meters
    pub const RADIUS_MAX: f64 = 10_000.0;

    /// Radius used when the client supplies none
    pub const DEFAULT_RADIUS: f64 = 5_000.0;

    /// Maximum number of landmarks requested per search
    pub const SEARCH_LIMIT: u32 = 50;

    /// Requests admitted per client per window
    pub const RATE_LIMIT_MAX: u32 = 60;

    /// Rate limit window length in seconds
    pub const RATE_LIMIT_WINDOW_SECS: u64 = 60;
}

/// Viewport controller tuning
pub mod viewport {
    /// Quiet window after the last map-settled event before a search fires
    pub const DEBOUNCE_MS: u64 = 500;

    /// Search radius at the base zoom level, in meters
    pub const RADIUS_AT_BASE_ZOOM: f64 = 50_000.0;

    /// Zoom level at which the radius curve is anchored
    pub const BASE_ZOOM: f64 = 10.0;

    /// Radius floor so zoomed-in views are never starved of results
    pub const RADIUS_FLOOR: f64 = 1_000.0;

    /// Radius ceiling, matching the upstream maximum
    pub const RADIUS_CEILING: f64 = 10_000.0;

    /// Zoom used when recentering after a locate action
    pub const DEFAULT_ZOOM: f64 = 14.0;
}

/// Cache settings
pub mod cache {
    /// How long a fetched landmark detail stays valid client-side, in seconds
    pub const DETAIL_TTL_SECS: u64 = 300;

    /// IP location cache duration in seconds (1 hour)
    pub const IP_LOCATION_TTL_SECS: u64 = 3600;

    /// IP location cache file name
    pub const IP_LOCATION_CACHE_FILE: &str = "ip_location_cache.json";
}

/// Client fetch behavior
pub mod client {
    /// Automatic retries after a failed fetch before the error surfaces
    pub const FETCH_RETRIES: u32 = 2;
}
