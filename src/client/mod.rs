//! Proxy-facing data-fetching layer (client side)
//!
//! Wraps the proxy's HTTP surface for the viewport controller and the CLI.
//! Transport failures and 5xx responses are retried twice before the error
//! surfaces for a manual retry; 4xx responses are mapped straight into the
//! error taxonomy. Landmark details are cached in memory for a short TTL
//! since users flip between the same few markers.

use crate::constants::cache::DETAIL_TTL_SECS;
use crate::constants::client::FETCH_RETRIES;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::server::routes::{ErrorBody, SearchResponse};
use crate::upstream::{Landmark, LandmarkDetail};
use crate::viewport::SearchDispatcher;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Client for the landmark proxy API
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    detail_cache: Mutex<HashMap<u64, CachedDetail>>,
    detail_ttl: Duration,
}

#[derive(Debug, Clone)]
struct CachedDetail {
    detail: LandmarkDetail,
    fetched_at: Instant,
}

impl ApiClient {
    /// Create a client for a proxy at `base_url` (e.g. `http://127.0.0.1:7878`)
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            http: reqwest::Client::new(),
            base_url,
            detail_cache: Mutex::new(HashMap::new()),
            detail_ttl: Duration::from_secs(DETAIL_TTL_SECS),
        }
    }

    /// Search for landmarks near `center` within `radius` meters
    pub async fn search(&self, center: Coordinates, radius: f64) -> Result<Vec<Landmark>> {
        let url = format!(
            "{}/api/landmarks/search?lat={}&lon={}&radius={}",
            self.base_url, center.lat, center.lon, radius
        );
        let body: SearchResponse = self.get_json(&url).await?;
        Ok(body.landmarks)
    }

    /// Fetch the detail record for one landmark, consulting the cache first
    pub async fn detail(&self, pageid: u64) -> Result<LandmarkDetail> {
        if let Some(cached) = self.cached_detail(pageid, Instant::now()) {
            return Ok(cached);
        }

        let url = format!("{}/api/landmarks/{}", self.base_url, pageid);
        let detail: LandmarkDetail = self.get_json(&url).await?;
        self.store_detail(detail.clone(), Instant::now());
        Ok(detail)
    }

    /// GET with automatic retries on transient failures
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut attempt = 0;
        loop {
            match self.try_get(url).await {
                Ok(value) => return Ok(value),
                // Only transient failures are worth retrying; a 4xx will
                // not get better by asking again
                Err(err @ Error::Network(_)) if attempt < FETCH_RETRIES => {
                    attempt += 1;
                    tracing::debug!("fetch failed, retry {attempt}/{FETCH_RETRIES}: {err}");
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn try_get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::Network(format!("request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| Error::Network(format!("failed to decode response: {}", e)));
        }

        let body: Option<ErrorBody> = response.json().await.ok();
        Err(map_error_status(status, body))
    }

    /// Valid cache hit for `pageid`, pruning expired entries along the way
    fn cached_detail(&self, pageid: u64, now: Instant) -> Option<LandmarkDetail> {
        let mut cache = self.detail_cache.lock().unwrap();
        let ttl = self.detail_ttl;
        cache.retain(|_, entry| now.duration_since(entry.fetched_at) < ttl);
        cache.get(&pageid).map(|entry| entry.detail.clone())
    }

    fn store_detail(&self, detail: LandmarkDetail, now: Instant) {
        let mut cache = self.detail_cache.lock().unwrap();
        cache.insert(
            detail.pageid,
            CachedDetail {
                detail,
                fetched_at: now,
            },
        );
    }
}

/// Map a non-success proxy status into the error taxonomy
fn map_error_status(status: reqwest::StatusCode, body: Option<ErrorBody>) -> Error {
    let message = body
        .as_ref()
        .and_then(|b| b.message.clone())
        .unwrap_or_else(|| format!("status {}", status));

    match status.as_u16() {
        404 => Error::NotFound(message),
        429 => Error::RateLimited {
            retry_after_secs: body.and_then(|b| b.retry_after).unwrap_or(1),
        },
        400..=499 => Error::Server(format!("request rejected: {}", message)),
        _ => Error::Network(format!("proxy error: {}", message)),
    }
}

impl SearchDispatcher for ApiClient {
    async fn search(&self, center: Coordinates, radius: f64) -> Result<Vec<Landmark>> {
        ApiClient::search(self, center, radius).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(pageid: u64) -> LandmarkDetail {
        LandmarkDetail {
            pageid,
            title: format!("Page {pageid}"),
            extract: None,
            thumbnail: None,
            url: None,
        }
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = ApiClient::new("http://localhost:7878///");
        assert_eq!(client.base_url, "http://localhost:7878");
    }

    #[test]
    fn test_detail_cache_hit_within_ttl() {
        let client = ApiClient::new("http://localhost:7878");
        let now = Instant::now();
        client.store_detail(detail(42), now);

        let hit = client.cached_detail(42, now + Duration::from_secs(10));
        assert_eq!(hit.unwrap().pageid, 42);
    }

    #[test]
    fn test_detail_cache_expires() {
        let client = ApiClient::new("http://localhost:7878");
        let now = Instant::now();
        client.store_detail(detail(42), now);

        let miss = client.cached_detail(42, now + Duration::from_secs(DETAIL_TTL_SECS + 1));
        assert!(miss.is_none());
        // Expired entry was pruned, not just skipped
        assert!(client.detail_cache.lock().unwrap().is_empty());
    }

    #[test]
    fn test_cache_miss_for_unknown_pageid() {
        let client = ApiClient::new("http://localhost:7878");
        assert!(client.cached_detail(7, Instant::now()).is_none());
    }

    #[test]
    fn test_map_error_status() {
        assert!(matches!(
            map_error_status(reqwest::StatusCode::NOT_FOUND, None),
            Error::NotFound(_)
        ));
        assert!(matches!(
            map_error_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, None),
            Error::Network(_)
        ));
        assert!(matches!(
            map_error_status(reqwest::StatusCode::BAD_REQUEST, None),
            Error::Server(_)
        ));
    }

    #[test]
    fn test_map_rate_limited_carries_retry_after() {
        let body = ErrorBody {
            error: "rate_limited".to_string(),
            message: Some("too many requests".to_string()),
            details: None,
            retry_after: Some(17),
        };
        match map_error_status(reqwest::StatusCode::TOO_MANY_REQUESTS, Some(body)) {
            Error::RateLimited { retry_after_secs } => assert_eq!(retry_after_secs, 17),
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }
}
