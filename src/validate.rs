//! Search request schema validation
//!
//! Turns untyped query input into a [`SearchRequest`], collecting every
//! per-field violation instead of stopping at the first one. Violations are
//! machine-readable and surface at the HTTP boundary as a 400 with a
//! `details` array.

use crate::constants::limits::{DEFAULT_RADIUS, RADIUS_MAX, RADIUS_MIN};
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A single failed check on one input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Name of the offending field
    pub field: String,
    /// What was wrong with it
    pub message: String,
}

impl FieldViolation {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// The full set of violations found in one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violations(pub Vec<FieldViolation>);

impl std::fmt::Display for Violations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for v in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", v.field, v.message)?;
            first = false;
        }
        Ok(())
    }
}

/// Raw, untrusted search query as it arrives on the wire
///
/// Fields stay strings so a non-numeric value can be told apart from a
/// missing one (they get different messages, and a non-numeric radius falls
/// back to the default instead of erroring).
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawSearchQuery {
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub radius: Option<String>,
}

/// A validated search request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub center: Coordinates,
    pub radius: f64,
}

impl SearchRequest {
    /// Build a request from known-good values, clamping the radius
    pub fn new(center: Coordinates, radius: f64) -> Self {
        Self {
            center,
            radius: radius.clamp(RADIUS_MIN, RADIUS_MAX),
        }
    }

    /// Validate raw query input into a request
    ///
    /// `lat` and `lon` are required floats in range; `radius` is optional and
    /// defaults to 5000 when absent or non-numeric, but a numeric value
    /// outside [10, 10000] is a violation.
    pub fn from_raw(raw: &RawSearchQuery) -> Result<Self> {
        let mut violations = Vec::new();

        let lat = parse_required(&raw.lat, "lat", &mut violations);
        let lon = parse_required(&raw.lon, "lon", &mut violations);

        if let Some(lat) = lat {
            if let Some(v) = check_lat(lat) {
                violations.push(v);
            }
        }
        if let Some(lon) = lon {
            if let Some(v) = check_lon(lon) {
                violations.push(v);
            }
        }

        let radius = match raw.radius.as_deref().map(str::parse::<f64>) {
            Some(Ok(r)) if !r.is_finite() || r < RADIUS_MIN || r > RADIUS_MAX => {
                violations.push(FieldViolation::new(
                    "radius",
                    format!("must be between {} and {} meters", RADIUS_MIN, RADIUS_MAX),
                ));
                r
            }
            Some(Ok(r)) => r,
            // Absent or non-numeric: fall back rather than reject
            Some(Err(_)) | None => DEFAULT_RADIUS,
        };

        if !violations.is_empty() {
            return Err(Error::Validation(Violations(violations)));
        }

        // lat/lon are Some here or a violation would have been recorded
        let center = Coordinates::new(lat.unwrap_or_default(), lon.unwrap_or_default());
        Ok(Self { center, radius })
    }
}

fn parse_required(value: &Option<String>, field: &str, out: &mut Vec<FieldViolation>) -> Option<f64> {
    match value.as_deref() {
        None => {
            out.push(FieldViolation::new(field, "is required"));
            None
        }
        Some(s) => match s.parse::<f64>() {
            Ok(f) => Some(f),
            Err(_) => {
                out.push(FieldViolation::new(field, "must be a number"));
                None
            }
        },
    }
}

/// Range check for a latitude value
pub(crate) fn check_lat(lat: f64) -> Option<FieldViolation> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        Some(FieldViolation::new("lat", "must be between -90 and 90"))
    } else {
        None
    }
}

/// Range check for a longitude value
pub(crate) fn check_lon(lon: f64) -> Option<FieldViolation> {
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        Some(FieldViolation::new("lon", "must be between -180 and 180"))
    } else {
        None
    }
}
