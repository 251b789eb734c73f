//! HTTP API routes
//!
//! Defines the proxy's REST endpoints. Every landmark endpoint runs the
//! same pipeline: rate limit gate, input validation, upstream call.
//! Validation and rate-limit failures are terminal here and never reach
//! the upstream.

use crate::error::Error;
use crate::server::state::AppState;
use crate::upstream::{Landmark, LandmarkDetail, LandmarkSource};
use crate::validate::{FieldViolation, RawSearchQuery, SearchRequest};

use axum::{
    extract::{ConnectInfo, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::services::ServeDir;

/// Create the API router
pub fn create_router<S>(state: Arc<AppState<S>>) -> Router
where
    S: LandmarkSource + Send + Sync + 'static,
{
    Router::new()
        .route("/api/landmarks/search", get(search_handler::<S>))
        .route("/api/landmarks/:pageid", get(detail_handler::<S>))
        .route("/api/status", get(status_handler::<S>))
        .nest_service(
            "/",
            ServeDir::new(static_dir()).append_index_html_on_directories(true),
        )
        .with_state(state)
}

/// Locate the bundled map frontend: try cwd first, then next to the binary
fn static_dir() -> String {
    if std::path::Path::new("static").exists() {
        return "static".to_string();
    }
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let path = exe_dir.join("static");
            if path.exists() {
                return path.to_string_lossy().to_string();
            }
        }
    }
    "static".to_string()
}

/// Search response body
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub landmarks: Vec<Landmark>,
}

/// Status response body
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub running: bool,
    pub version: String,
    pub uptime_secs: u64,
}

/// API error body
///
/// One shape for every failure: `details` is set for validation errors,
/// `retryAfter` for rate limiting.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldViolation>>,
    #[serde(rename = "retryAfter", skip_serializing_if = "Option::is_none")]
    pub retry_after: Option<u64>,
}

/// An error response with its HTTP status
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, error: &str, message: Option<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: error.to_string(),
                message,
                details: None,
                retry_after: None,
            },
        }
    }

    fn invalid_pageid(raw: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "invalid_pageid",
            Some(format!("pageid must be numeric, got '{}'", raw)),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(violations) => Self {
                status: StatusCode::BAD_REQUEST,
                body: ErrorBody {
                    error: "validation_failed".to_string(),
                    message: Some(violations.to_string()),
                    details: Some(violations.0),
                    retry_after: None,
                },
            },
            Error::RateLimited { retry_after_secs } => Self {
                status: StatusCode::TOO_MANY_REQUESTS,
                body: ErrorBody {
                    error: "rate_limited".to_string(),
                    message: Some("too many requests".to_string()),
                    details: None,
                    retry_after: Some(retry_after_secs),
                },
            },
            Error::NotFound(what) => Self::new(
                StatusCode::NOT_FOUND,
                "not_found",
                Some(format!("{} does not exist", what)),
            ),
            Error::Upstream { status, message } => {
                tracing::error!(?status, "upstream failure: {message}");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "upstream_error",
                    Some(message),
                )
            }
            other => {
                tracing::error!("request failed: {other}");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    Some(other.to_string()),
                )
            }
        }
    }
}

/// Resolve the rate-limit key for a request
///
/// The first X-Forwarded-For hop is used only when the config says the
/// reverse proxy in front of us is trusted; otherwise the peer address.
fn client_key(
    headers: &HeaderMap,
    peer: Option<&ConnectInfo<SocketAddr>>,
    trust_forwarded: bool,
) -> String {
    if trust_forwarded {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());
        if let Some(forwarded) = forwarded {
            return forwarded.to_string();
        }
    }

    peer.map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Rate limit gate shared by the landmark endpoints
fn gate<S>(
    state: &AppState<S>,
    headers: &HeaderMap,
    peer: Option<&ConnectInfo<SocketAddr>>,
) -> Result<(), ApiError>
where
    S: LandmarkSource,
{
    let key = client_key(headers, peer, state.config.rate_limit.trust_forwarded);
    match state.limiter.check(&key, Instant::now()) {
        crate::limiter::Decision::Admitted { .. } => Ok(()),
        crate::limiter::Decision::Rejected { retry_after_secs } => {
            Err(ApiError::from(Error::RateLimited { retry_after_secs }))
        }
    }
}

/// Search landmarks near a coordinate
///
/// GET /api/landmarks/search?lat=..&lon=..&radius=..
async fn search_handler<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    Query(raw): Query<RawSearchQuery>,
) -> Result<Json<SearchResponse>, ApiError>
where
    S: LandmarkSource + Send + Sync + 'static,
{
    gate(&state, &headers, peer.as_ref())?;

    let request = SearchRequest::from_raw(&raw).map_err(ApiError::from)?;

    let landmarks = state
        .source
        .search(request.center, request.radius)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(SearchResponse { landmarks }))
}

/// Fetch the detail record for one landmark
///
/// GET /api/landmarks/:pageid
async fn detail_handler<S>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    Path(pageid): Path<String>,
) -> Result<Json<LandmarkDetail>, ApiError>
where
    S: LandmarkSource + Send + Sync + 'static,
{
    gate(&state, &headers, peer.as_ref())?;

    let pageid: u64 = pageid
        .parse()
        .map_err(|_| ApiError::invalid_pageid(&pageid))?;

    let detail = state.source.detail(pageid).await.map_err(ApiError::from)?;

    Ok(Json(detail))
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler<S>(State(state): State<Arc<AppState<S>>>) -> Json<StatusResponse>
where
    S: LandmarkSource + Send + Sync + 'static,
{
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.uptime_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::coord::Coordinates;
    use crate::error::Result;
    use crate::upstream::Thumbnail;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Source with canned data, honoring the "dist within radius" contract
    #[derive(Default)]
    struct StubSource {
        landmarks: Vec<Landmark>,
        details: HashMap<u64, LandmarkDetail>,
        last_search: Mutex<Option<(Coordinates, f64)>>,
    }

    impl LandmarkSource for StubSource {
        async fn search(&self, center: Coordinates, radius: f64) -> Result<Vec<Landmark>> {
            *self.last_search.lock().unwrap() = Some((center, radius));
            Ok(self
                .landmarks
                .iter()
                .filter(|l| l.dist.map_or(true, |d| d <= radius))
                .cloned()
                .collect())
        }

        async fn detail(&self, pageid: u64) -> Result<LandmarkDetail> {
            self.details
                .get(&pageid)
                .cloned()
                .ok_or_else(|| Error::NotFound(format!("page {}", pageid)))
        }
    }

    /// Source whose upstream is down
    struct FailingSource;

    impl LandmarkSource for FailingSource {
        async fn search(&self, _: Coordinates, _: f64) -> Result<Vec<Landmark>> {
            Err(Error::Upstream {
                status: Some(503),
                message: "upstream returned status 503".to_string(),
            })
        }

        async fn detail(&self, _: u64) -> Result<LandmarkDetail> {
            Err(Error::Upstream {
                status: None,
                message: "request failed: connection reset".to_string(),
            })
        }
    }

    fn landmark(pageid: u64, title: &str, dist: Option<f64>) -> Landmark {
        Landmark {
            pageid,
            title: title.to_string(),
            lat: 40.7,
            lon: -74.0,
            dist,
            primary: None,
        }
    }

    fn stub_source() -> StubSource {
        let mut details = HashMap::new();
        details.insert(
            9610,
            LandmarkDetail {
                pageid: 9610,
                title: "Statue of Liberty".to_string(),
                extract: Some("A colossal statue.".to_string()),
                thumbnail: Some(Thumbnail {
                    source: "https://upload.example/t.jpg".to_string(),
                    width: 400,
                    height: 267,
                }),
                url: Some("https://en.wikipedia.org/wiki/Statue_of_Liberty".to_string()),
            },
        );

        StubSource {
            landmarks: vec![
                landmark(9610, "Statue of Liberty", Some(321.5)),
                landmark(20426, "Ellis Island", Some(4999.0)),
                landmark(31530, "Coney Island", Some(9500.0)),
                landmark(7923, "Castle Clinton", None),
            ],
            details,
            last_search: Mutex::new(None),
        }
    }

    fn router_with(source: StubSource, config: Config) -> (Router, Arc<AppState<StubSource>>) {
        let state = Arc::new(AppState::new(config, source));
        (create_router(Arc::clone(&state)), state)
    }

    async fn get_response(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_search_returns_landmarks_within_radius() {
        let (app, _) = router_with(stub_source(), Config::default());

        let (status, json) =
            get_response(app, "/api/landmarks/search?lat=40.7128&lon=-74.0060&radius=5000").await;

        assert_eq!(status, StatusCode::OK);
        let landmarks = json["landmarks"].as_array().unwrap();
        // Coney Island at 9500m is outside the requested radius
        assert_eq!(landmarks.len(), 3);
        for entry in landmarks {
            if let Some(dist) = entry.get("dist").and_then(|d| d.as_f64()) {
                assert!(dist <= 5000.0);
            }
        }
    }

    #[tokio::test]
    async fn test_search_without_radius_uses_5000() {
        let (app, state) = router_with(stub_source(), Config::default());

        let (status, _) = get_response(app, "/api/landmarks/search?lat=40.7128&lon=-74.0060").await;

        assert_eq!(status, StatusCode::OK);
        let (_, radius) = state.source.last_search.lock().unwrap().unwrap();
        assert_eq!(radius, 5000.0);
    }

    #[tokio::test]
    async fn test_search_non_numeric_radius_uses_5000() {
        let (app, state) = router_with(stub_source(), Config::default());

        let (status, _) =
            get_response(app, "/api/landmarks/search?lat=40.7128&lon=-74.0060&radius=wide").await;

        assert_eq!(status, StatusCode::OK);
        let (_, radius) = state.source.last_search.lock().unwrap().unwrap();
        assert_eq!(radius, 5000.0);
    }

    #[tokio::test]
    async fn test_search_radius_out_of_range_is_400() {
        let (app, state) = router_with(stub_source(), Config::default());

        let (status, json) =
            get_response(app, "/api/landmarks/search?lat=40.7128&lon=-74.0060&radius=10001").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_failed");
        assert_eq!(json["details"][0]["field"], "radius");
        // The validation error never reached the upstream
        assert!(state.source.last_search.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_missing_coordinates_lists_both_fields() {
        let (app, _) = router_with(stub_source(), Config::default());

        let (status, json) = get_response(app, "/api/landmarks/search").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let fields: Vec<_> = json["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["field"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(fields, vec!["lat", "lon"]);
    }

    #[tokio::test]
    async fn test_search_out_of_range_latitude_is_400() {
        let (app, _) = router_with(stub_source(), Config::default());

        let (status, json) =
            get_response(app, "/api/landmarks/search?lat=91&lon=0").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["details"][0]["field"], "lat");
    }

    #[tokio::test]
    async fn test_detail_found() {
        let (app, _) = router_with(stub_source(), Config::default());

        let (status, json) = get_response(app, "/api/landmarks/9610").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["pageid"], 9610);
        assert_eq!(json["title"], "Statue of Liberty");
        assert_eq!(json["thumbnail"]["width"], 400);
    }

    #[tokio::test]
    async fn test_detail_missing_is_404_with_no_partial_data() {
        let (app, _) = router_with(stub_source(), Config::default());

        let (status, json) = get_response(app, "/api/landmarks/123456789").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "not_found");
        assert!(json.get("pageid").is_none());
        assert!(json.get("extract").is_none());
    }

    #[tokio::test]
    async fn test_detail_non_numeric_pageid_is_400() {
        let (app, _) = router_with(stub_source(), Config::default());

        let (status, json) = get_response(app, "/api/landmarks/statue-of-liberty").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "invalid_pageid");
    }

    #[tokio::test]
    async fn test_upstream_failure_is_opaque_500() {
        let state = Arc::new(AppState::new(Config::default(), FailingSource));
        let app = create_router(state);

        let (status, json) = get_response(app, "/api/landmarks/search?lat=0&lon=0").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "upstream_error");
        assert!(json["message"].is_string());
    }

    #[tokio::test]
    async fn test_rate_limit_rejects_over_cap() {
        let mut config = Config::default();
        config.rate_limit.max_per_window = 2;
        let (app, _) = router_with(stub_source(), config);

        for _ in 0..2 {
            let (status, _) =
                get_response(app.clone(), "/api/landmarks/search?lat=0&lon=0").await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, json) = get_response(app, "/api/landmarks/search?lat=0&lon=0").await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(json["error"], "rate_limited");
        assert!(json["retryAfter"].as_u64().unwrap() > 0);
    }

    #[tokio::test]
    async fn test_rate_limit_spans_both_endpoints() {
        let mut config = Config::default();
        config.rate_limit.max_per_window = 2;
        let (app, _) = router_with(stub_source(), config);

        let (status, _) = get_response(app.clone(), "/api/landmarks/search?lat=0&lon=0").await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = get_response(app.clone(), "/api/landmarks/9610").await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = get_response(app, "/api/landmarks/9610").await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_forwarded_clients_get_separate_budgets() {
        let mut config = Config::default();
        config.rate_limit.max_per_window = 1;
        config.rate_limit.trust_forwarded = true;
        let (app, _) = router_with(stub_source(), config);

        for ip in ["10.0.0.1", "10.0.0.2"] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .uri("/api/landmarks/search?lat=0&lon=0")
                        .header("X-Forwarded-For", ip)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "client {ip}");
        }
    }

    #[tokio::test]
    async fn test_forwarded_header_ignored_when_untrusted() {
        let mut config = Config::default();
        config.rate_limit.max_per_window = 1;
        let (app, _) = router_with(stub_source(), config);

        // Without trust_forwarded both requests share the fallback key
        for (ip, expected) in [("10.0.0.1", StatusCode::OK), ("10.0.0.2", StatusCode::TOO_MANY_REQUESTS)] {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .uri("/api/landmarks/search?lat=0&lon=0")
                        .header("X-Forwarded-For", ip)
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), expected, "client {ip}");
        }
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let (app, _) = router_with(stub_source(), Config::default());

        let (status, json) = get_response(app, "/api/status").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["running"], true);
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_client_key_prefers_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.9, 10.0.0.1".parse().unwrap());

        assert_eq!(client_key(&headers, None, true), "203.0.113.9");
        assert_eq!(client_key(&headers, None, false), "unknown");
    }

    #[test]
    fn test_client_key_falls_back_to_peer() {
        let peer = ConnectInfo("203.0.113.7:4242".parse::<SocketAddr>().unwrap());
        assert_eq!(client_key(&HeaderMap::new(), Some(&peer), true), "203.0.113.7");
    }
}
