//! Playlist collection with synchronous persistence
//!
//! Owns every playlist plus the active index. Each mutation validates first,
//! applies the change, then writes the whole collection to the key-value
//! store before returning. Rejected operations leave both memory and the
//! store untouched.

use crate::types::AddOutcome;
use resona_core::{KeyValueStore, Playlist, PlayerError, Result, Track};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Key holding the serialized playlist collection
pub const PLAYLISTS_KEY: &str = "playlists";

/// Key holding the active playlist index
pub const ACTIVE_INDEX_KEY: &str = "currentPlaylistIndex";

/// Ordered playlists plus the active index
///
/// Never empty; the active index is always in range.
pub struct PlaylistStore {
    playlists: Vec<Playlist>,
    active: usize,
    sink: Box<dyn KeyValueStore>,
}

impl PlaylistStore {
    /// Load the collection from `sink`
    ///
    /// Falls back to a single empty playlist called `default_name` on first
    /// run or when the stored blob cannot be used.
    ///
    /// # Errors
    /// `InvalidInput` if `default_name` is blank.
    pub fn open(sink: impl KeyValueStore + 'static, default_name: &str) -> Result<Self> {
        let fallback = Playlist::new(default_name)?;

        let mut playlists = match sink.load(PLAYLISTS_KEY) {
            Ok(Some(value)) => decode_playlists(value),
            Ok(None) => {
                info!("No saved playlists, starting with a default playlist");
                None
            }
            Err(e) => {
                warn!(error = %e, "Could not read saved playlists");
                None
            }
        }
        .unwrap_or_else(|| vec![fallback.clone()]);

        for playlist in &mut playlists {
            if playlist.name.trim().is_empty() {
                warn!("Saved playlist had a blank name, renaming");
                playlist.name = fallback.name.clone();
            }
            let dropped = playlist.dedup_by_id();
            if dropped > 0 {
                warn!(playlist = %playlist.name, dropped, "Dropped duplicate tracks from saved playlist");
            }
        }

        let active = match sink.load(ACTIVE_INDEX_KEY) {
            Ok(Some(value)) => match decode_index(&value) {
                Some(index) if index < playlists.len() => index,
                _ => {
                    warn!(%value, "Saved active playlist index unusable, using 0");
                    0
                }
            },
            Ok(None) => 0,
            Err(e) => {
                warn!(error = %e, "Could not read saved active playlist index");
                0
            }
        };

        debug!(playlists = playlists.len(), active, "Playlist store opened");

        Ok(Self {
            playlists,
            active,
            sink: Box::new(sink),
        })
    }

    /// All playlists in order
    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    /// Number of playlists (always ≥ 1)
    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }

    /// Playlist at `index`
    pub fn playlist(&self, index: usize) -> Result<&Playlist> {
        self.playlists
            .get(index)
            .ok_or_else(|| PlayerError::out_of_range("playlist", index, self.playlists.len()))
    }

    /// Active playlist index
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Active playlist
    pub fn active_playlist(&self) -> &Playlist {
        &self.playlists[self.active]
    }

    /// Append a new empty playlist, returning its index
    ///
    /// Does not change the active index.
    pub fn create_playlist(&mut self, name: &str) -> Result<usize> {
        let playlist = Playlist::new(name.trim())?;
        self.playlists.push(playlist);
        let index = self.playlists.len() - 1;

        info!(index, name = name.trim(), "Created playlist");
        self.persist();
        Ok(index)
    }

    /// Remove a playlist
    ///
    /// Active index follows: removing the active playlist selects 0, removing
    /// one before it shifts it down by one.
    ///
    /// # Errors
    /// `IndexOutOfRange` for an unknown index, `InvalidState` when it is the
    /// only playlist.
    pub fn delete_playlist(&mut self, index: usize) -> Result<Playlist> {
        self.playlist(index)?;
        if self.playlists.len() == 1 {
            return Err(PlayerError::invalid_state(
                "cannot delete the only playlist",
            ));
        }

        let removed = self.playlists.remove(index);
        if index == self.active {
            self.active = 0;
        } else if index < self.active {
            self.active -= 1;
        }

        info!(index, name = %removed.name, active = self.active, "Deleted playlist");
        self.persist();
        Ok(removed)
    }

    /// Append `track` unless a track with the same id is already present
    pub fn add_track(&mut self, playlist_index: usize, track: Track) -> Result<AddOutcome> {
        track.validate()?;
        let playlist = self.playlist_mut(playlist_index)?;

        if let Some(existing) = playlist.tracks.iter().position(|t| t.same_as(&track)) {
            debug!(track_id = %track.id, existing, "Track already in playlist");
            return Ok(AddOutcome::AlreadyPresent(existing));
        }

        debug!(track_id = %track.id, playlist = playlist_index, "Adding track");
        playlist.tracks.push(track);
        let index = playlist.tracks.len() - 1;

        self.persist();
        Ok(AddOutcome::Added(index))
    }

    /// Remove the track at `track_index`, returning it
    ///
    /// Reconciling any externally tracked current index is the caller's job.
    pub fn remove_track(&mut self, playlist_index: usize, track_index: usize) -> Result<Track> {
        let playlist = self.playlist_mut(playlist_index)?;
        check_track_index(playlist, track_index)?;

        let removed = playlist.tracks.remove(track_index);
        debug!(track_id = %removed.id, playlist = playlist_index, track_index, "Removed track");

        self.persist();
        Ok(removed)
    }

    /// Swap the track with the one above it
    ///
    /// Returns the swapped index pair, or `None` at the top (no-op).
    pub fn move_track_up(
        &mut self,
        playlist_index: usize,
        track_index: usize,
    ) -> Result<Option<(usize, usize)>> {
        let playlist = self.playlist_mut(playlist_index)?;
        check_track_index(playlist, track_index)?;

        if track_index == 0 {
            return Ok(None);
        }
        playlist.tracks.swap(track_index, track_index - 1);

        self.persist();
        Ok(Some((track_index, track_index - 1)))
    }

    /// Swap the track with the one below it
    ///
    /// Returns the swapped index pair, or `None` at the bottom (no-op).
    pub fn move_track_down(
        &mut self,
        playlist_index: usize,
        track_index: usize,
    ) -> Result<Option<(usize, usize)>> {
        let playlist = self.playlist_mut(playlist_index)?;
        check_track_index(playlist, track_index)?;

        if track_index + 1 == playlist.tracks.len() {
            return Ok(None);
        }
        playlist.tracks.swap(track_index, track_index + 1);

        self.persist();
        Ok(Some((track_index, track_index + 1)))
    }

    /// Select the active playlist
    pub fn set_active_playlist(&mut self, index: usize) -> Result<()> {
        self.playlist(index)?;
        self.active = index;

        info!(index, "Active playlist changed");
        self.persist();
        Ok(())
    }

    fn playlist_mut(&mut self, index: usize) -> Result<&mut Playlist> {
        let len = self.playlists.len();
        self.playlists
            .get_mut(index)
            .ok_or_else(|| PlayerError::out_of_range("playlist", index, len))
    }

    // Fire-and-forget from the caller's perspective: failures are logged, the
    // in-memory change stands.
    fn persist(&mut self) {
        let playlists = match serde_json::to_value(&self.playlists) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Could not serialize playlists");
                return;
            }
        };

        if let Err(e) = self.sink.save(PLAYLISTS_KEY, playlists) {
            warn!(error = %e, "Failed to persist playlists");
        }
        if let Err(e) = self.sink.save(ACTIVE_INDEX_KEY, json!(self.active)) {
            warn!(error = %e, "Failed to persist active playlist index");
        }
    }
}

fn decode_playlists(value: Value) -> Option<Vec<Playlist>> {
    match serde_json::from_value::<Vec<Playlist>>(value) {
        Ok(playlists) if playlists.is_empty() => {
            warn!("Saved playlist collection was empty");
            None
        }
        Ok(playlists) => Some(playlists),
        Err(e) => {
            warn!(error = %e, "Saved playlists are malformed, starting fresh");
            None
        }
    }
}

// Browser storage hands scalars back as strings, so accept both forms
fn decode_index(value: &Value) -> Option<usize> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        .and_then(|i| usize::try_from(i).ok())
}

fn check_track_index(playlist: &Playlist, track_index: usize) -> Result<()> {
    if track_index >= playlist.tracks.len() {
        return Err(PlayerError::out_of_range(
            "track",
            track_index,
            playlist.tracks.len(),
        ));
    }
    Ok(())
}
