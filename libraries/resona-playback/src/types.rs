//! Core types for playback and queue management

use crate::volume::Volume;
use resona_core::{ResourceLocator, Track, TrackId};
use serde::{Deserialize, Serialize};

/// Snapshot of what the playback controller is doing
///
/// Position and duration always come from the same observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// Loaded track, if any
    pub track: Option<Track>,

    /// Locator the output was pointed at
    pub locator: Option<ResourceLocator>,

    /// Whether the output is currently playing
    pub playing: bool,

    /// Position in seconds (0 ≤ position ≤ duration once duration is known)
    pub position: f64,

    /// Duration in seconds, 0 while unknown
    pub duration: f64,

    /// Volume level and mute flag
    pub volume: Volume,
}

impl PlaybackState {
    /// Empty state at the given volume
    pub fn new(volume: Volume) -> Self {
        Self {
            track: None,
            locator: None,
            playing: false,
            position: 0.0,
            duration: 0.0,
            volume,
        }
    }

    /// Whether a track is loaded
    pub fn is_loaded(&self) -> bool {
        self.track.is_some()
    }

    /// Whether the output is muted
    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    /// Id of the loaded track
    pub fn track_id(&self) -> Option<&TrackId> {
        self.track.as_ref().map(|t| &t.id)
    }

    /// Fraction of the track played, 0.0 while duration is unknown
    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            (self.position / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::new(Volume::default())
    }
}

/// Queue coordinator state, scoped to the active playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueState {
    /// No current index
    Idle,

    /// Track at `index` of the active playlist is loaded (playing or paused)
    Loaded { index: usize },
}

impl QueueState {
    /// Current index, if loaded
    pub fn current_index(&self) -> Option<usize> {
        match self {
            Self::Idle => None,
            Self::Loaded { index } => Some(*index),
        }
    }

    /// Whether no index is selected
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// How a track id becomes a playable locator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum StreamMode {
    /// Build `<endpoint>/stream/<trackId>` synchronously
    Direct { endpoint: String },

    /// The caller resolves the locator and completes the load later
    Resolved,
}

impl Default for StreamMode {
    fn default() -> Self {
        Self::Direct {
            endpoint: "http://localhost:8080/api".to_string(),
        }
    }
}

/// Handle for an in-flight stream resolution
///
/// Only the ticket from the most recent load request is honored; completing
/// an older ticket is a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    track_id: TrackId,
}

impl LoadTicket {
    pub(crate) fn new(generation: u64, track_id: TrackId) -> Self {
        Self {
            generation,
            track_id,
        }
    }

    /// Generation counter value this ticket was issued at
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Track the locator should be resolved for
    pub fn track_id(&self) -> &TrackId {
        &self.track_id
    }
}

/// Result of asking the coordinator to play something
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Locator built and playback started
    Started,

    /// Caller must resolve the stream and call `complete_load`
    Pending(LoadTicket),
}

/// Result of adding a track to a playlist
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// Appended at this index
    Added(usize),

    /// Already present at this index; nothing changed
    AlreadyPresent(usize),
}

impl AddOutcome {
    /// Index of the track in the playlist either way
    pub fn index(&self) -> usize {
        match self {
            Self::Added(index) | Self::AlreadyPresent(index) => *index,
        }
    }
}

/// Configuration for the playback engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Initial volume (0.0-1.0, default: 1.0)
    pub initial_volume: f64,

    /// How locators are produced (default: direct)
    pub stream_mode: StreamMode,

    /// Name of the playlist created on first run (default: "Default")
    pub default_playlist_name: String,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            initial_volume: 1.0,
            stream_mode: StreamMode::default(),
            default_playlist_name: "Default".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.initial_volume, 1.0);
        assert_eq!(config.default_playlist_name, "Default");
        assert!(matches!(config.stream_mode, StreamMode::Direct { .. }));
    }

    #[test]
    fn progress_needs_duration() {
        let mut state = PlaybackState::default();
        state.position = 30.0;
        assert_eq!(state.progress(), 0.0);

        state.duration = 120.0;
        assert_eq!(state.progress(), 0.25);
    }

    #[test]
    fn queue_state_index() {
        assert_eq!(QueueState::Idle.current_index(), None);
        assert_eq!(QueueState::Loaded { index: 3 }.current_index(), Some(3));
        assert!(QueueState::Idle.is_idle());
    }

    #[test]
    fn stream_mode_deserializes_tagged() {
        let mode: StreamMode =
            serde_json::from_str(r#"{"mode":"direct","endpoint":"http://host/api"}"#).unwrap();
        assert_eq!(
            mode,
            StreamMode::Direct {
                endpoint: "http://host/api".into()
            }
        );

        let mode: StreamMode = serde_json::from_str(r#"{"mode":"resolved"}"#).unwrap();
        assert_eq!(mode, StreamMode::Resolved);
    }

    #[test]
    fn add_outcome_index() {
        assert_eq!(AddOutcome::Added(2).index(), 2);
        assert_eq!(AddOutcome::AlreadyPresent(0).index(), 0);
    }
}
