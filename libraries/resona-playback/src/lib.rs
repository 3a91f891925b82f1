//! Resona - Playback Engine
//!
//! Platform-agnostic playback and queue management for Resona.
//!
//! This crate provides:
//! - Transport control over a single media output (play, pause, seek, volume, mute)
//! - A persistent collection of named playlists with an active playlist
//! - A queue coordinator binding playback to the active playlist
//! - Autoplay with wraparound when a track ends naturally
//! - Index reconciliation when the active playlist is edited during playback
//! - Generation-guarded loads for asynchronously resolved stream locators
//!
//! # Architecture
//!
//! `resona-playback` knows nothing about audio devices or HTTP:
//! - Audio goes through the [`MediaOutput`] trait ([`HeadlessOutput`] ships for
//!   terminals and tests)
//! - Persistence goes through `resona_core::KeyValueStore`
//! - Locators are built from a configured endpoint or resolved by the caller
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use resona_core::{KeyValueStore, Result, Track};
//! use resona_playback::{
//!     HeadlessOutput, LoadStatus, PlaybackController, PlaylistStore, QueueCoordinator,
//!     StreamMode,
//! };
//! use serde_json::Value;
//!
//! struct Scratch;
//!
//! impl KeyValueStore for Scratch {
//!     fn load(&self, _key: &str) -> Result<Option<Value>> {
//!         Ok(None)
//!     }
//!     fn save(&mut self, _key: &str, _value: Value) -> Result<()> {
//!         Ok(())
//!     }
//! }
//!
//! let store = PlaylistStore::open(Scratch, "Default").unwrap();
//! let controller = PlaybackController::new(HeadlessOutput::new(), 0.8);
//! let mut queue = QueueCoordinator::new(controller, store, StreamMode::default());
//!
//! let status = queue.select_track(Track::new("kJQP7kiw5Fk", "Despacito")).unwrap();
//! assert_eq!(status, LoadStatus::Started);
//! assert!(queue.playback().playing);
//! assert_eq!(queue.current_index(), Some(0));
//! ```
//!
//! # Example: Resolved Streams
//!
//! ```rust,no_run
//! use resona_core::StreamResolver;
//! use resona_playback::{HeadlessOutput, LoadStatus, QueueCoordinator};
//!
//! async fn play(
//!     queue: &mut QueueCoordinator<HeadlessOutput>,
//!     resolver: &impl StreamResolver,
//!     index: usize,
//! ) -> resona_core::Result<()> {
//!     if let LoadStatus::Pending(ticket) = queue.play_at(index)? {
//!         let resolved = resolver.resolve(ticket.track_id()).await;
//!         // A newer request may have superseded this one meanwhile
//!         queue.complete_load(&ticket, resolved)?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod controller;
pub mod coordinator;
pub mod events;
pub mod output;
pub mod playlist_store;
pub mod types;
pub mod volume;

// Re-exports
pub use controller::PlaybackController;
pub use coordinator::QueueCoordinator;
pub use events::{Completion, PlayerEvent};
pub use output::{HeadlessOutput, MediaOutput, OutputCall, OutputEvent};
pub use playlist_store::{PlaylistStore, ACTIVE_INDEX_KEY, PLAYLISTS_KEY};
pub use types::{
    AddOutcome, LoadStatus, LoadTicket, PlaybackConfig, PlaybackState, QueueState, StreamMode,
};
pub use volume::Volume;

// Re-export core types for convenience
pub use resona_core::{PlayerError, Result};
