//! Output formatters
//!
//! Trait-based formatting of search results for the CLI.

pub mod gpx;
pub mod json;
pub mod text;

use crate::error::Result;
use crate::upstream::Landmark;
use crate::validate::SearchRequest;
use serde::{Deserialize, Serialize};

/// A search and its results, ready for formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    pub request: SearchRequest,
    pub landmarks: Vec<Landmark>,
}

/// Information about an output format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatInfo {
    /// Format name
    pub name: String,
    /// Format description
    pub description: String,
}

/// Trait for output formatters
pub trait OutputFormatter: Send + Sync {
    /// Get the format name
    fn name(&self) -> &str;

    /// Get the format description
    fn description(&self) -> &str;

    /// Format a search report
    fn format(&self, report: &SearchReport) -> Result<String>;
}

/// Get a formatter by name
pub fn get_formatter(name: &str) -> Option<Box<dyn OutputFormatter>> {
    match name.to_lowercase().as_str() {
        "json" => Some(Box::new(json::JsonFormatter)),
        "text" => Some(Box::new(text::TextFormatter)),
        "gpx" => Some(Box::new(gpx::GpxFormatter)),
        _ => None,
    }
}

/// List all available formatters
pub fn available_formats() -> Vec<FormatInfo> {
    vec![
        FormatInfo {
            name: "json".to_string(),
            description: "Full JSON report".to_string(),
        },
        FormatInfo {
            name: "text".to_string(),
            description: "Human-readable text".to_string(),
        },
        FormatInfo {
            name: "gpx".to_string(),
            description: "GPX waypoint file".to_string(),
        },
    ]
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::coord::Coordinates;

    pub fn sample_report() -> SearchReport {
        SearchReport {
            request: SearchRequest::new(Coordinates::new(40.7128, -74.0060), 5000.0),
            landmarks: vec![
                Landmark {
                    pageid: 9610,
                    title: "Statue of Liberty".to_string(),
                    lat: 40.689,
                    lon: -74.044,
                    dist: Some(321.5),
                    primary: Some("".to_string()),
                },
                Landmark {
                    pageid: 20426,
                    title: "Ellis Island".to_string(),
                    lat: 40.699,
                    lon: -74.039,
                    dist: None,
                    primary: None,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_formatter() {
        assert!(get_formatter("json").is_some());
        assert!(get_formatter("text").is_some());
        assert!(get_formatter("gpx").is_some());
        assert!(get_formatter("unknown").is_none());
    }

    #[test]
    fn test_get_formatter_case_insensitive() {
        assert!(get_formatter("JSON").is_some());
        assert!(get_formatter("Text").is_some());
    }

    #[test]
    fn test_available_formats() {
        let formats = available_formats();
        assert_eq!(formats.len(), 3);
        assert!(formats.iter().any(|f| f.name == "json"));
        assert!(formats.iter().any(|f| f.name == "text"));
        assert!(formats.iter().any(|f| f.name == "gpx"));
    }
}
