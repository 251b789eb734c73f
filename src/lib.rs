//! geomarks: Map-Based Landmark Discovery
//!
//! A library and CLI for finding encyclopedia landmarks around a map
//! viewport. The server side is a thin validating, rate-limited proxy over
//! the upstream geosearch API; the client side is the viewport pipeline a
//! map frontend needs (debounce, zoom-derived radius, stale-response
//! suppression, one-shot locate).
//!
//! ## Features
//!
//! - Wikipedia geosearch and page-detail backends behind one trait
//! - Per-client fixed-window rate limiting with bounded state
//! - Schema validation with machine-readable per-field violations
//! - Debounced viewport controller with latest-request-wins semantics
//! - HTTP API + CLI interface
//!
//! ## Quick Start
//!
//! ```rust
//! use geomarks::coord::Coordinates;
//! use geomarks::validate::SearchRequest;
//! use geomarks::viewport::radius_for_zoom;
//!
//! // Radius scales with zoom, clamped to what the upstream accepts
//! assert_eq!(radius_for_zoom(14.0), 3125.0);
//!
//! // Requests are validated before anything goes upstream
//! let request = SearchRequest::new(Coordinates::new(40.7128, -74.0060), 5000.0);
//! assert_eq!(request.radius, 5000.0);
//! ```

pub mod cli;
pub mod client;
pub mod config;
pub mod constants;
pub mod coord;
pub mod error;
pub mod format;
pub mod geo;
pub mod limiter;
pub mod server;
pub mod upstream;
pub mod validate;
pub mod viewport;

// Re-export commonly used types
pub use config::Config;
pub use coord::Coordinates;
pub use error::{Error, Result};
pub use upstream::{Landmark, LandmarkDetail};
pub use validate::SearchRequest;
pub use viewport::{ViewState, Viewport, ViewportController};
