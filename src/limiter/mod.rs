//! Per-client fixed-window rate limiting
//!
//! Each client key gets a counter that resets when its window expires.
//! Expired entries are swept out rather than kept forever: opportunistically
//! when the map grows past a threshold, and by a background task in the
//! server, so the map stays bounded by the set of recently-active clients.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::constants::limits::{RATE_LIMIT_MAX, RATE_LIMIT_WINDOW_SECS};

/// Entry count above which a check also sweeps expired entries
const SWEEP_THRESHOLD: usize = 1024;

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Request admitted; `remaining` is the budget left in this window
    Admitted { remaining: u32 },
    /// Request rejected; caller should back off `retry_after_secs` seconds
    Rejected { retry_after_secs: u64 },
}

impl Decision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Decision::Admitted { .. })
    }
}

/// Per-client request counter within the current window
#[derive(Debug)]
struct RateLimitEntry {
    count: u32,
    window_reset_at: Instant,
}

/// Fixed-window rate limiter keyed by client identifier
///
/// Interior mutability so it can sit behind a shared `Arc` in server state;
/// the single mutex is fine at this request volume.
#[derive(Debug)]
pub struct FixedWindowLimiter {
    max_per_window: u32,
    window: Duration,
    entries: Mutex<HashMap<String, RateLimitEntry>>,
}

impl FixedWindowLimiter {
    /// Create a limiter with explicit bounds
    pub fn new(max_per_window: u32, window: Duration) -> Self {
        Self {
            max_per_window,
            window,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Decide whether to admit a request from `key` at time `now`
    ///
    /// A missing or expired entry is (re)created with count 1 and admitted.
    /// Within a live window the count increments until `max_per_window` is
    /// reached; past that the request is rejected with the ceiling of the
    /// remaining window time in whole seconds (always at least 1).
    pub fn check(&self, key: &str, now: Instant) -> Decision {
        let mut entries = self.entries.lock().unwrap();

        if entries.len() >= SWEEP_THRESHOLD {
            entries.retain(|_, entry| entry.window_reset_at > now);
        }

        match entries.get_mut(key) {
            Some(entry) if entry.window_reset_at > now => {
                if entry.count < self.max_per_window {
                    entry.count += 1;
                    Decision::Admitted {
                        remaining: self.max_per_window - entry.count,
                    }
                } else {
                    let wait = entry.window_reset_at - now;
                    Decision::Rejected {
                        retry_after_secs: (wait.as_millis().div_ceil(1000) as u64).max(1),
                    }
                }
            }
            _ => {
                entries.insert(
                    key.to_string(),
                    RateLimitEntry {
                        count: 1,
                        window_reset_at: now + self.window,
                    },
                );
                Decision::Admitted {
                    remaining: self.max_per_window - 1,
                }
            }
        }
    }

    /// Drop every entry whose window has already passed
    ///
    /// Returns how many entries were removed.
    pub fn sweep_expired(&self, now: Instant) -> usize {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|_, entry| entry.window_reset_at > now);
        before - entries.len()
    }

    /// Number of tracked client keys
    pub fn tracked_clients(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// The configured window length
    pub fn window(&self) -> Duration {
        self.window
    }
}

impl Default for FixedWindowLimiter {
    fn default() -> Self {
        Self::new(RATE_LIMIT_MAX, Duration::from_secs(RATE_LIMIT_WINDOW_SECS))
    }
}
