//! Resona Gateway Client
//!
//! HTTP client library for the search/stream gateway that fronts the music
//! catalogue.
//!
//! # Features
//!
//! - **Search**: text query to validated tracks, malformed hits skipped
//! - **Song details**: per-track metadata lookup
//! - **Streams**: direct locators or on-demand extracted audio URLs
//! - **Health**: gateway and backend reachability
//!
//! `GatewayClient` implements `SearchService` and `StreamResolver` from
//! `resona-core`, so it plugs straight into the playback engine.
//!
//! # Example
//!
//! ```ignore
//! use resona_gateway_client::{GatewayClient, GatewayConfig};
//! use resona_core::StreamResolver;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GatewayClient::new(GatewayConfig::default())?;
//!
//!     let tracks = client.search_tracks("despacito").await?;
//!     let first = &tracks[0];
//!     println!("{} by {}", first.title, first.artist_line());
//!
//!     let locator = client.resolve(&first.id).await?;
//!     println!("stream: {locator}");
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

// Re-export main types
pub use client::GatewayClient;
pub use error::{GatewayError, Result};
pub use types::{
    GatewayConfig, HealthResponse, SearchResponse, SongDetails, StreamUrlResponse,
    DEFAULT_GATEWAY_URL, DEFAULT_SEARCH_LIMIT,
};
