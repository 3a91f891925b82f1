//! Collaborator ports for Resona
//!
//! The playback engine never talks to the network or disk directly. Search,
//! stream resolution and durability are reached through these traits so the
//! engine can run against HTTP, files, or in-memory fakes.

use crate::error::Result;
use crate::types::{ResourceLocator, Track, TrackId};
use async_trait::async_trait;
use serde_json::Value;

/// Text search over the remote catalogue
#[async_trait]
pub trait SearchService: Send + Sync {
    /// Search for tracks matching `query`
    ///
    /// # Errors
    /// `InvalidInput` for an empty or whitespace-only query (no request is
    /// issued), `TransportFailure` when the backend cannot be reached.
    async fn search(&self, query: &str) -> Result<Vec<Track>>;
}

/// Maps a track id to something the media output can play
#[async_trait]
pub trait StreamResolver: Send + Sync {
    /// Resolve a playable locator for `id`
    ///
    /// # Errors
    /// `TransportFailure` when resolution fails.
    async fn resolve(&self, id: &TrackId) -> Result<ResourceLocator>;
}

/// Durability sink for small JSON values
///
/// Writes are synchronous: when `save` returns, the value is as durable as
/// the implementation can make it.
pub trait KeyValueStore: Send {
    /// Load the value stored under `key`, `None` when absent (first run)
    fn load(&self, key: &str) -> Result<Option<Value>>;

    /// Store `value` under `key`, replacing any previous value
    fn save(&mut self, key: &str, value: Value) -> Result<()>;
}

