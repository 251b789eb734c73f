//! Landmark data model and upstream source trait
//!
//! This module defines the `LandmarkSource` trait and implementations for
//! encyclopedia backends. Each backend is a single file implementing the
//! trait; the server and CLI are generic over it so tests can inject stubs.
//!
//! Optional upstream fields are passed through as options: a field the
//! upstream omitted stays absent in our output, it is never filled with a
//! zero or an empty string.

pub mod wikipedia;

use crate::coord::Coordinates;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A point of interest returned by a geosearch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Upstream page identifier
    pub pageid: u64,
    /// Page title
    pub title: String,
    pub lat: f64,
    pub lon: f64,
    /// Distance from the search center in meters, when the upstream ranks by it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dist: Option<f64>,
    /// Upstream "primary coordinate" marker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
}

/// A page thumbnail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    /// Image URL
    pub source: String,
    pub width: u32,
    pub height: u32,
}

/// Detail view of a single landmark, fetched lazily on selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkDetail {
    pub pageid: u64,
    pub title: String,
    /// Introductory plain-text extract
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extract: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<Thumbnail>,
    /// Canonical page URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Trait for landmark data sources
///
/// Implementations must be thread-safe (Send + Sync) to work with the async
/// server. Neither operation retries; transient upstream failures surface as
/// `Error::Upstream` and retrying is the caller's decision.
pub trait LandmarkSource: Send + Sync {
    /// Find landmarks near `center` within `radius` meters
    ///
    /// Returns at most 50 entries in upstream order (typically by distance);
    /// no re-sorting is performed on our side.
    fn search(
        &self,
        center: Coordinates,
        radius: f64,
    ) -> impl std::future::Future<Output = Result<Vec<Landmark>>> + Send;

    /// Fetch the detail record for one landmark
    ///
    /// Fails with `Error::NotFound` when the upstream marks the page missing.
    fn detail(
        &self,
        pageid: u64,
    ) -> impl std::future::Future<Output = Result<LandmarkDetail>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_optional_fields_omitted_when_absent() {
        let landmark = Landmark {
            pageid: 9610,
            title: "Statue of Liberty".to_string(),
            lat: 40.689,
            lon: -74.044,
            dist: None,
            primary: None,
        };

        let json = serde_json::to_value(&landmark).unwrap();
        assert!(json.get("dist").is_none());
        assert!(json.get("primary").is_none());
    }

    #[test]
    fn test_landmark_optional_fields_kept_when_present() {
        let landmark = Landmark {
            pageid: 9610,
            title: "Statue of Liberty".to_string(),
            lat: 40.689,
            lon: -74.044,
            dist: Some(321.5),
            primary: Some("".to_string()),
        };

        let json = serde_json::to_value(&landmark).unwrap();
        assert_eq!(json["dist"], 321.5);
        assert!(json.get("primary").is_some());
    }

    #[test]
    fn test_detail_serialization_roundtrip() {
        let detail = LandmarkDetail {
            pageid: 9610,
            title: "Statue of Liberty".to_string(),
            extract: Some("A colossal neoclassical sculpture.".to_string()),
            thumbnail: Some(Thumbnail {
                source: "https://upload.example/thumb.jpg".to_string(),
                width: 400,
                height: 267,
            }),
            url: None,
        };

        let json = serde_json::to_string(&detail).unwrap();
        assert!(!json.contains("\"url\""));
        let parsed: LandmarkDetail = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, detail);
    }
}
