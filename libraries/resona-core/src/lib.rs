//! Resona Core
//!
//! Platform-agnostic core types, collaborator traits, and error handling for Resona.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Playlist`, `TrackId`, `ResourceLocator`
//! - **Collaborator Traits**: `SearchService`, `StreamResolver`, `KeyValueStore`
//! - **Error Handling**: Unified `PlayerError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use resona_core::types::{Playlist, Track, TrackDuration};
//!
//! let track = Track::new("kJQP7kiw5Fk", "Despacito")
//!     .with_artists(["Luis Fonsi", "Daddy Yankee"])
//!     .with_duration(TrackDuration::Display("4:42".into()));
//!
//! let mut playlist = Playlist::new("Road Trip").unwrap();
//! playlist.tracks.push(track);
//! assert_eq!(playlist.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{PlayerError, Result};
pub use traits::{KeyValueStore, SearchService, StreamResolver};
pub use types::{
    format_clock, Playlist, ResourceLocator, Track, TrackDescriptor, TrackDuration, TrackId,
};
