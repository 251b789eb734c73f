//! Geographic coordinate type
//!
//! Shared by the search pipeline, the upstream client, and the viewport
//! controller. Validation is range-only; geodesy is the upstream's problem.

use serde::{Deserialize, Serialize};

/// A geographic coordinate (latitude, longitude)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Create new coordinates
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Validate that coordinates are within valid ranges
    ///
    /// Latitude: -90 to 90
    /// Longitude: -180 to 180
    pub fn validate(&self) -> crate::error::Result<()> {
        let violations: Vec<_> = [
            crate::validate::check_lat(self.lat),
            crate::validate::check_lon(self.lon),
        ]
        .into_iter()
        .flatten()
        .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(crate::error::Error::Validation(
                crate::validate::Violations(violations),
            ))
        }
    }
}
