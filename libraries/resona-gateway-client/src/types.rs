//! Types for gateway requests and responses.

use resona_core::{TrackDescriptor, TrackDuration};
use serde::Deserialize;
use std::time::Duration;

/// Default gateway API base
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8080/api";

/// Default number of search results requested
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Configuration for connecting to the gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// API base URL (e.g., "http://localhost:8080/api")
    pub url: String,
    /// Whole-request timeout
    pub timeout: Duration,
    /// Results requested per search
    pub search_limit: u32,
}

impl GatewayConfig {
    /// Create a config for `url` with default timeout and search limit.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(30),
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the number of results per search.
    pub fn with_search_limit(mut self, limit: u32) -> Self {
        self.search_limit = limit;
        self
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::new(DEFAULT_GATEWAY_URL)
    }
}

// =============================================================================
// Search
// =============================================================================

/// Response from `GET /search`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    /// Query as echoed by the gateway
    #[serde(default)]
    pub query: String,
    /// Number of results
    #[serde(default)]
    pub count: usize,
    /// Raw hits; validated when converted to tracks
    #[serde(default)]
    pub results: Vec<TrackDescriptor>,
}

// =============================================================================
// Song Details
// =============================================================================

/// Response from `GET /song/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongDetails {
    pub video_id: String,
    pub title: Option<String>,
    /// Channel/author name
    pub artist: Option<String>,
    /// Length in seconds (sent as a string by the backend)
    pub duration: Option<TrackDuration>,
    pub thumbnail: Option<String>,
    pub view_count: Option<String>,
}

// =============================================================================
// Streams
// =============================================================================

/// Response from `GET /stream/{id}`.
///
/// Stream URLs expire after a few hours; resolve right before playing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamUrlResponse {
    pub video_id: String,
    /// Direct audio URL (absent when extraction found nothing usable)
    pub url: Option<String>,
    pub title: Option<String>,
    /// Length in seconds
    pub duration: Option<f64>,
    pub thumbnail: Option<String>,
    /// Container extension, e.g. "m4a"
    pub format: Option<String>,
    /// Average bitrate in kbps
    pub bitrate: Option<f64>,
    pub filesize: Option<u64>,
    pub note: Option<String>,
}

// =============================================================================
// Health
// =============================================================================

/// Response from `GET /health` at the gateway root.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "unhealthy"
    pub status: String,
    /// Gateway process status
    #[serde(default, rename = "go_server")]
    pub gateway: Option<String>,
    /// Backend search service reachability
    #[serde(default, rename = "python_service")]
    pub backend: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl HealthResponse {
    /// Whether the gateway and its backend are both up
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
