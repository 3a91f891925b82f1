//! Gateway HTTP client.

use crate::error::{GatewayError, Result};
use crate::types::{GatewayConfig, HealthResponse, SearchResponse, SongDetails, StreamUrlResponse};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use resona_core::{ResourceLocator, SearchService, StreamResolver, Track, TrackId};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Client for the search/stream gateway.
///
/// All catalogue endpoints live under the configured API base
/// (`http://localhost:8080/api` by default); `/health` lives at the gateway
/// root, one level up from a trailing `/api` segment.
///
/// # Example
///
/// ```ignore
/// use resona_gateway_client::{GatewayClient, GatewayConfig};
///
/// let client = GatewayClient::new(GatewayConfig::new("http://localhost:8080/api"))?;
///
/// let health = client.health().await?;
/// println!("gateway is {}", health.status);
///
/// for track in client.search_tracks("bohemian rhapsody").await? {
///     println!("{} - {}", track.artist_line(), track.title);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: Client,
    api: Url,
    root: Url,
    search_limit: u32,
}

impl GatewayClient {
    /// Create a new client with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let trimmed = config.url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(GatewayError::InvalidUrl("URL cannot be empty".into()));
        }
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(GatewayError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }
        let api = Url::parse(trimmed).map_err(|e| GatewayError::InvalidUrl(e.to_string()))?;
        if api.cannot_be_a_base() {
            return Err(GatewayError::InvalidUrl(format!("{trimmed} cannot be a base URL")));
        }
        if config.search_limit == 0 {
            return Err(GatewayError::InvalidRequest(
                "search limit must be at least 1".into(),
            ));
        }

        let mut root = api.clone();
        if api.path_segments().and_then(|mut s| s.next_back()) == Some("api") {
            if let Ok(mut segments) = root.path_segments_mut() {
                segments.pop();
            }
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Resona/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        debug!(api = %api, root = %root, "Gateway client ready");

        Ok(Self {
            http,
            api,
            root,
            search_limit: config.search_limit,
        })
    }

    /// API base URL without a trailing slash.
    ///
    /// This is the endpoint direct stream locators are rooted at.
    pub fn base_url(&self) -> &str {
        self.api.as_str().trim_end_matches('/')
    }

    /// Check gateway and backend health.
    ///
    /// An unhealthy gateway answers 503 with a body; that still parses into
    /// a [`HealthResponse`] with `is_healthy() == false`.
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = join(&self.root, &["health"]);
        debug!(url = %url, "Checking gateway health");

        let response = self.http.get(url).send().await.map_err(classify)?;
        let status = response.status();

        if status.is_success() || status == StatusCode::SERVICE_UNAVAILABLE {
            let health: HealthResponse = response.json().await.map_err(|e| {
                GatewayError::ParseError(format!("Failed to parse health response: {}", e))
            })?;
            info!(status = %health.status, backend = ?health.backend, "Gateway health");
            Ok(health)
        } else {
            Err(server_error(status, response).await)
        }
    }

    /// Search the catalogue using the configured result limit.
    pub async fn search(&self, query: &str) -> Result<SearchResponse> {
        self.search_with_limit(query, self.search_limit).await
    }

    /// Search the catalogue for at most `limit` results.
    pub async fn search_with_limit(&self, query: &str, limit: u32) -> Result<SearchResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GatewayError::InvalidRequest(
                "search query cannot be empty".into(),
            ));
        }

        let mut url = join(&self.api, &["search"]);
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("limit", &limit.max(1).to_string());

        let response: SearchResponse = self.get_json(url, "search").await?;
        debug!(query, count = response.results.len(), "Search completed");
        Ok(response)
    }

    /// Search and keep only well-formed hits.
    ///
    /// Hits missing an id or title are logged and skipped rather than
    /// failing the whole search.
    pub async fn search_tracks(&self, query: &str) -> Result<Vec<Track>> {
        let response = self.search(query).await?;

        let mut tracks = Vec::with_capacity(response.results.len());
        for hit in response.results {
            match Track::try_from(hit) {
                Ok(track) => tracks.push(track),
                Err(e) => warn!(query, error = %e, "Skipping malformed search result"),
            }
        }
        Ok(tracks)
    }

    /// Fetch details for a single track.
    pub async fn song(&self, id: &TrackId) -> Result<SongDetails> {
        check_id(id)?;
        let url = join(&self.api, &["song", id.as_str()]);
        self.get_json(url, "song").await
    }

    /// Ask the gateway to extract a direct audio URL.
    pub async fn stream_url(&self, id: &TrackId) -> Result<StreamUrlResponse> {
        check_id(id)?;
        let url = join(&self.api, &["stream", id.as_str()]);
        let stream: StreamUrlResponse = self.get_json(url, "stream").await?;
        debug!(
            track_id = %id,
            format = ?stream.format,
            bitrate = ?stream.bitrate,
            "Stream extracted"
        );
        Ok(stream)
    }

    /// Locator that streams through the gateway without a resolve round-trip.
    pub fn direct_locator(&self, id: &TrackId) -> ResourceLocator {
        ResourceLocator::direct(self.base_url(), id)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, what: &str) -> Result<T> {
        debug!(url = %url, "Gateway request");

        let response = self.http.get(url).send().await.map_err(classify)?;
        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| {
                GatewayError::ParseError(format!("Failed to parse {} response: {}", what, e))
            })
        } else {
            Err(server_error(status, response).await)
        }
    }
}

#[async_trait]
impl SearchService for GatewayClient {
    async fn search(&self, query: &str) -> resona_core::Result<Vec<Track>> {
        Ok(self.search_tracks(query).await?)
    }
}

#[async_trait]
impl StreamResolver for GatewayClient {
    async fn resolve(&self, id: &TrackId) -> resona_core::Result<ResourceLocator> {
        let stream = self.stream_url(id).await?;
        match stream.url.filter(|url| !url.trim().is_empty()) {
            Some(url) => Ok(ResourceLocator::new(url)),
            None => Err(GatewayError::NoStream(id.to_string()).into()),
        }
    }
}

fn join(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

fn check_id(id: &TrackId) -> Result<()> {
    if id.is_blank() {
        return Err(GatewayError::InvalidRequest("track id cannot be empty".into()));
    }
    Ok(())
}

fn classify(e: reqwest::Error) -> GatewayError {
    if e.is_connect() || e.is_timeout() {
        GatewayError::Unreachable(e.to_string())
    } else {
        GatewayError::Request(e)
    }
}

async fn server_error(status: StatusCode, response: reqwest::Response) -> GatewayError {
    let message = response.text().await.unwrap_or_default();
    GatewayError::ServerError {
        status: status.as_u16(),
        message: message.trim().to_string(),
    }
}
