//! Wikipedia landmark source (MediaWiki action API)
//!
//! Search uses `list=geosearch`; details use `prop=extracts|pageimages|info`
//! with an intro-only plain-text extract, a thumbnail capped at 400px, and
//! the canonical page URL. Please keep a descriptive User-Agent; the API
//! etiquette expects one.

use crate::config::UpstreamConfig;
use crate::constants::limits::SEARCH_LIMIT;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::upstream::{Landmark, LandmarkDetail, LandmarkSource, Thumbnail};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Wikipedia-backed landmark source
#[derive(Debug, Clone)]
pub struct WikipediaSource {
    client: reqwest::Client,
    api_url: String,
}

/// Envelope of a geosearch response
#[derive(Debug, Deserialize)]
struct GeosearchResponse {
    query: Option<GeosearchQuery>,
}

#[derive(Debug, Deserialize)]
struct GeosearchQuery {
    #[serde(default)]
    geosearch: Vec<GeosearchItem>,
}

#[derive(Debug, Deserialize)]
struct GeosearchItem {
    pageid: u64,
    title: String,
    lat: f64,
    lon: f64,
    dist: Option<f64>,
    primary: Option<String>,
}

/// Envelope of a page-detail response; `pages` is keyed by page id
#[derive(Debug, Deserialize)]
struct DetailResponse {
    query: Option<DetailQuery>,
}

#[derive(Debug, Deserialize)]
struct DetailQuery {
    #[serde(default)]
    pages: HashMap<String, DetailPage>,
}

#[derive(Debug, Deserialize)]
struct DetailPage {
    pageid: Option<u64>,
    title: Option<String>,
    extract: Option<String>,
    thumbnail: Option<WireThumbnail>,
    fullurl: Option<String>,
    /// Present (as an empty string) when the page does not exist
    missing: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireThumbnail {
    source: String,
    width: u32,
    height: u32,
}

impl WikipediaSource {
    /// Create a source with the default endpoint and client settings
    pub fn new() -> Self {
        Self::from_config(&UpstreamConfig::default()).expect("default upstream client")
    }

    /// Create a source from upstream configuration
    pub fn from_config(config: &UpstreamConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
        })
    }

    fn search_url(&self, center: Coordinates, radius: f64) -> String {
        format!(
            "{}?action=query&list=geosearch&gscoord={}&gsradius={}&gslimit={}&format=json",
            self.api_url,
            urlencoding::encode(&format!("{}|{}", center.lat, center.lon)),
            radius,
            SEARCH_LIMIT
        )
    }

    fn detail_url(&self, pageid: u64) -> String {
        format!(
            "{}?action=query&pageids={}&prop={}&exintro=1&explaintext=1&piprop=thumbnail&pithumbsize=400&inprop=url&format=json",
            self.api_url,
            pageid,
            urlencoding::encode("extracts|pageimages|info"),
        )
    }

    /// Issue a GET and decode the JSON body, mapping failures to `Upstream`
    async fn fetch<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.client.get(url).send().await.map_err(|e| Error::Upstream {
            status: None,
            message: format!("request failed: {}", e),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream {
                status: Some(status.as_u16()),
                message: format!("upstream returned status {}", status),
            });
        }

        response.json().await.map_err(|e| Error::Upstream {
            status: Some(status.as_u16()),
            message: format!("failed to decode response: {}", e),
        })
    }
}

impl Default for WikipediaSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LandmarkSource for WikipediaSource {
    async fn search(&self, center: Coordinates, radius: f64) -> Result<Vec<Landmark>> {
        let body: GeosearchResponse = self.fetch(&self.search_url(center, radius)).await?;
        Ok(parse_geosearch(body))
    }

    async fn detail(&self, pageid: u64) -> Result<LandmarkDetail> {
        let body: DetailResponse = self.fetch(&self.detail_url(pageid)).await?;
        parse_detail(body, pageid)
    }
}

/// Map geosearch wire items 1:1 into landmarks, preserving upstream order
fn parse_geosearch(body: GeosearchResponse) -> Vec<Landmark> {
    body.query
        .map(|q| q.geosearch)
        .unwrap_or_default()
        .into_iter()
        .map(|item| Landmark {
            pageid: item.pageid,
            title: item.title,
            lat: item.lat,
            lon: item.lon,
            dist: item.dist,
            primary: item.primary,
        })
        .collect()
}

/// Pull the requested page out of the keyed `pages` map
fn parse_detail(body: DetailResponse, pageid: u64) -> Result<LandmarkDetail> {
    let pages = body.query.map(|q| q.pages).unwrap_or_default();
    let page = pages
        .get(&pageid.to_string())
        .or_else(|| pages.values().next())
        .ok_or_else(|| Error::NotFound(format!("page {}", pageid)))?;

    if page.missing.is_some() {
        return Err(Error::NotFound(format!("page {}", pageid)));
    }

    Ok(LandmarkDetail {
        pageid: page.pageid.unwrap_or(pageid),
        title: page.title.clone().unwrap_or_default(),
        extract: page.extract.clone(),
        thumbnail: page.thumbnail.as_ref().map(|t| Thumbnail {
            source: t.source.clone(),
            width: t.width,
            height: t.height,
        }),
        url: page.fullurl.clone(),
    })
}
