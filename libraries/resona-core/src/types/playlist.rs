/// Playlist domain types
use crate::error::{PlayerError, Result};
use crate::types::{Track, TrackId};
use serde::{Deserialize, Serialize};

/// Named, ordered, deduplicated-by-id sequence of tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    /// Display name (not required to be unique)
    pub name: String,

    /// Tracks in play order
    #[serde(rename = "songs", default)]
    pub tracks: Vec<Track>,
}

impl Playlist {
    /// Create a new empty playlist
    ///
    /// Rejects empty or whitespace-only names.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PlayerError::invalid_input("playlist name cannot be empty"));
        }
        Ok(Self {
            name,
            tracks: Vec::new(),
        })
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the playlist has no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Position of the track with the given id
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }

    /// Whether a track with the given id is present
    pub fn contains(&self, id: &TrackId) -> bool {
        self.position_of(id).is_some()
    }

    /// Track at index
    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    /// Drop later duplicates so every id appears once, keeping first occurrences
    ///
    /// Returns the number of tracks removed.
    pub fn dedup_by_id(&mut self) -> usize {
        let before = self.tracks.len();
        let mut seen = std::collections::HashSet::new();
        self.tracks.retain(|t| seen.insert(t.id.clone()));
        before - self.tracks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playlist_creation() {
        let playlist = Playlist::new("Road Trip").unwrap();
        assert_eq!(playlist.name, "Road Trip");
        assert!(playlist.is_empty());
    }

    #[test]
    fn blank_names_rejected() {
        assert!(matches!(
            Playlist::new(""),
            Err(PlayerError::InvalidInput(_))
        ));
        assert!(matches!(
            Playlist::new(" \t "),
            Err(PlayerError::InvalidInput(_))
        ));
    }

    #[test]
    fn serializes_tracks_as_songs() {
        let mut playlist = Playlist::new("Default").unwrap();
        playlist.tracks.push(Track::new("abc", "Song"));

        let value = serde_json::to_value(&playlist).unwrap();
        assert_eq!(value["name"], "Default");
        assert_eq!(value["songs"][0]["id"], "abc");
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let mut playlist = Playlist::new("Mix").unwrap();
        playlist.tracks = vec![
            Track::new("a", "A"),
            Track::new("b", "B"),
            Track::new("a", "A again"),
        ];

        assert_eq!(playlist.dedup_by_id(), 1);
        assert_eq!(playlist.len(), 2);
        assert_eq!(playlist.tracks[0].title, "A");
        assert_eq!(playlist.position_of(&TrackId::new("b")), Some(1));
    }
}
