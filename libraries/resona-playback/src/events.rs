//! Player Events
//!
//! Event-based communication for UI synchronization. The controller and the
//! coordinator push events into one queue that the session drains after each
//! command or output observation:
//! - State changes (play/pause/stop)
//! - Track changes
//! - Position updates
//! - Queue and playlist changes
//! - Transient errors to show the user

use resona_core::TrackId;
use serde::{Deserialize, Serialize};

/// Events emitted by the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerEvent {
    /// Playing flag changed
    StateChanged {
        /// Whether the output is now playing
        playing: bool,
    },

    /// A new track was loaded into the output
    TrackChanged {
        /// ID of the new (current) track
        track_id: TrackId,
        /// ID of the previous track (if any)
        previous_track_id: Option<TrackId>,
    },

    /// Track finished playing naturally (reached end)
    TrackFinished {
        /// ID of the finished track
        track_id: TrackId,
    },

    /// Output stopped and unloaded
    Stopped,

    /// Position/duration observation
    PositionUpdate {
        /// Current playback position in seconds
        position: f64,
        /// Total track duration in seconds (0 while unknown)
        duration: f64,
    },

    /// Volume or mute changed
    VolumeChanged {
        /// New volume level (0.0-1.0)
        level: f64,
        /// Whether audio is muted
        is_muted: bool,
    },

    /// Active playlist contents or current index changed
    QueueChanged {
        /// Active playlist index
        playlist: usize,
        /// Tracks in the active playlist
        length: usize,
        /// Current index, if a track is loaded
        current: Option<usize>,
    },

    /// Playlists were created, deleted, or the active one changed
    PlaylistsChanged {
        /// Number of playlists
        count: usize,
        /// Active playlist index
        active: usize,
    },

    /// Recoverable failure to show as a transient message
    Error {
        /// Error message
        message: String,
    },
}

/// Completion signal sent to the single registered listener
///
/// Sent exactly once per natural end of a loaded track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// ID of the finished track
    pub track_id: TrackId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let event = PlayerEvent::QueueChanged {
            playlist: 1,
            length: 3,
            current: Some(2),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "queue_changed");
        assert_eq!(value["current"], 2);

        let event = PlayerEvent::TrackFinished {
            track_id: TrackId::new("abc"),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "track_finished");
        assert_eq!(value["track_id"], "abc");
    }
}
