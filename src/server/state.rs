//! Server shared state
//!
//! Holds configuration, the landmark source, and the rate limiter for the
//! HTTP proxy. Generic over the source so tests can inject stubs.

use crate::config::Config;
use crate::limiter::FixedWindowLimiter;
use crate::upstream::LandmarkSource;
use std::time::{Duration, Instant};

/// Shared state for the HTTP server
pub struct AppState<S> {
    /// Configuration
    pub config: Config,

    /// Landmark data source
    pub source: S,

    /// Per-client request limiter
    pub limiter: FixedWindowLimiter,

    started_at: Instant,
}

impl<S: LandmarkSource> AppState<S> {
    /// Create new application state
    pub fn new(config: Config, source: S) -> Self {
        let limiter = FixedWindowLimiter::new(
            config.rate_limit.max_per_window,
            Duration::from_secs(config.rate_limit.window_secs),
        );

        Self {
            config,
            source,
            limiter,
            started_at: Instant::now(),
        }
    }

    /// Seconds since this state was created
    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
