//! Device position lookup
//!
//! The viewport's "locate" action needs a one-shot position fix. The actual
//! capability is opaque to the rest of the crate: anything implementing
//! [`PositionProvider`] will do. The bundled implementation geolocates the
//! machine's public IP address.

pub mod ip_location;

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A one-shot position fix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    /// Latitude
    pub lat: f64,
    /// Longitude
    pub lon: f64,
    /// Human-readable place description
    pub display_name: String,
}

/// Trait for one-shot position sources
pub trait PositionProvider: Send + Sync {
    /// Query the current position once
    fn position(&self) -> impl std::future::Future<Output = Result<Position>> + Send;
}

/// Get the default position provider
pub fn get_position_provider() -> ip_location::IpLocator {
    ip_location::IpLocator::new()
}
