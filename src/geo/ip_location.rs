//! IP-based position provider
//!
//! Uses ip-api.com for a coarse position fix, cached on disk so repeated
//! locate actions within an hour don't re-query the service.

use crate::constants::api::IP_API_URL;
use crate::constants::cache::{IP_LOCATION_CACHE_FILE, IP_LOCATION_TTL_SECS};
use crate::error::{Error, Result};
use crate::geo::{Position, PositionProvider};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

/// IP geolocation provider with file-backed caching
#[derive(Debug)]
pub struct IpLocator {
    client: reqwest::Client,
    cache_path: Option<PathBuf>,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    #[serde(rename = "regionName")]
    region_name: Option<String>,
    country: Option<String>,
}

/// On-disk cache record
#[derive(Debug, Serialize, Deserialize)]
struct CachedPosition {
    position: Position,
    fetched_at_unix: u64,
}

impl IpLocator {
    /// Create a locator caching under the XDG cache dir
    pub fn new() -> Self {
        let cache_path =
            dirs::cache_dir().map(|p| p.join("geomarks").join(IP_LOCATION_CACHE_FILE));

        Self {
            client: reqwest::Client::new(),
            cache_path,
        }
    }

    /// Create a locator with a specific cache path (used in tests)
    pub fn with_cache_path(cache_path: PathBuf) -> Self {
        Self {
            client: reqwest::Client::new(),
            cache_path: Some(cache_path),
        }
    }

    /// Create a locator that never caches
    pub fn without_cache() -> Self {
        Self {
            client: reqwest::Client::new(),
            cache_path: None,
        }
    }

    async fn fetch_position(&self) -> Result<Position> {
        let response = self
            .client
            .get(IP_API_URL)
            .send()
            .await
            .map_err(|e| Error::Geo(format!("IP location request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Geo(format!(
                "IP location API returned status: {}",
                response.status()
            )));
        }

        let data: IpApiResponse = response
            .json()
            .await
            .map_err(|e| Error::Geo(format!("failed to parse IP location response: {}", e)))?;

        if data.status != "success" {
            return Err(Error::Geo("IP location lookup failed".to_string()));
        }

        let lat = data
            .lat
            .ok_or_else(|| Error::Geo("no latitude in response".to_string()))?;
        let lon = data
            .lon
            .ok_or_else(|| Error::Geo("no longitude in response".to_string()))?;

        let display_name = [data.city, data.region_name, data.country]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");

        Ok(Position {
            lat,
            lon,
            display_name: if display_name.is_empty() {
                "Unknown Location".to_string()
            } else {
                display_name
            },
        })
    }

    fn load_cache(&self) -> Option<Position> {
        let cache_path = self.cache_path.as_ref()?;
        let content = fs::read_to_string(cache_path).ok()?;
        let cached: CachedPosition = serde_json::from_str(&content).ok()?;

        let now = unix_now()?;
        if now.saturating_sub(cached.fetched_at_unix) < IP_LOCATION_TTL_SECS {
            Some(cached.position)
        } else {
            None
        }
    }

    fn save_cache(&self, position: &Position) {
        let Some(cache_path) = &self.cache_path else {
            return;
        };

        if let Some(parent) = cache_path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        let cached = CachedPosition {
            position: position.clone(),
            fetched_at_unix: unix_now().unwrap_or(0),
        };

        if let Ok(content) = serde_json::to_string_pretty(&cached) {
            let _ = fs::write(cache_path, content);
        }
    }

    /// Clear the on-disk cache
    pub fn clear_cache(&self) {
        if let Some(cache_path) = &self.cache_path {
            let _ = fs::remove_file(cache_path);
        }
    }
}

fn unix_now() -> Option<u64> {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())
}

impl Default for IpLocator {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionProvider for IpLocator {
    async fn position(&self) -> Result<Position> {
        if let Some(cached) = self.load_cache() {
            return Ok(cached);
        }

        let position = self.fetch_position().await?;
        self.save_cache(&position);
        Ok(position)
    }
}
