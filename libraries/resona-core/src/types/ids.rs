/// ID and locator types for Resona entities
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Track identifier
///
/// Opaque string handed out by the search backend (a video id for the
/// YouTube Music gateway). Two tracks are the same logical track iff their
/// identifiers are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    /// Create a new track ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty or whitespace only
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TrackId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for TrackId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Address the playback controller can load (usually a streaming URL)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceLocator(String);

impl ResourceLocator {
    /// Wrap an existing locator string
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Build the direct streaming locator `<endpoint>/stream/<trackId>`
    ///
    /// The id is percent-encoded as a single path segment. An endpoint that
    /// does not parse as a base URL is joined as plain text.
    pub fn direct(endpoint: &str, id: &TrackId) -> Self {
        if let Ok(mut url) = Url::parse(endpoint) {
            let joined = url
                .path_segments_mut()
                .map(|mut path| {
                    path.pop_if_empty().extend(["stream", id.as_str()]);
                })
                .is_ok();
            if joined {
                return Self(url.into());
            }
        }
        Self(format!("{}/stream/{}", endpoint.trim_end_matches('/'), id))
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
