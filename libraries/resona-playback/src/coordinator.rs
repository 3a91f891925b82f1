//! Queue coordinator - core orchestration
//!
//! Binds the playback controller to the active playlist:
//! - which index of the active playlist is loaded (`QueueState`)
//! - play-at-index and select-from-search
//! - autoplay with wraparound on natural end of track
//! - index reconciliation when tracks are removed or reordered
//! - generation-guarded loads when locators are resolved asynchronously
//!
//! All playlist mutations that can affect the current index go through the
//! coordinator so the mutation and the index correction happen in one call.

use crate::{
    controller::PlaybackController,
    events::{Completion, PlayerEvent},
    output::{MediaOutput, OutputEvent},
    playlist_store::PlaylistStore,
    types::{AddOutcome, LoadStatus, LoadTicket, PlaybackState, QueueState, StreamMode},
};
use resona_core::{Playlist, PlayerError, ResourceLocator, Result, Track};
use std::cmp::Ordering;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing::{debug, info, warn};

/// Central queue management
pub struct QueueCoordinator<O: MediaOutput> {
    controller: PlaybackController<O>,
    store: PlaylistStore,
    stream_mode: StreamMode,
    state: QueueState,

    // Bumped on every load request; only the newest ticket may complete
    generation: u64,
    pending: Option<LoadTicket>,

    completions: UnboundedReceiver<Completion>,
}

impl<O: MediaOutput> QueueCoordinator<O> {
    /// Wire a controller and a store together
    pub fn new(
        mut controller: PlaybackController<O>,
        store: PlaylistStore,
        stream_mode: StreamMode,
    ) -> Self {
        let (tx, completions) = unbounded_channel();
        controller.set_completion_listener(tx);

        Self {
            controller,
            store,
            stream_mode,
            state: QueueState::Idle,
            generation: 0,
            pending: None,
            completions,
        }
    }

    // ===== Accessors =====

    /// Queue state for the active playlist
    pub fn state(&self) -> QueueState {
        self.state
    }

    /// Current index into the active playlist
    pub fn current_index(&self) -> Option<usize> {
        self.state.current_index()
    }

    /// Track at the current index
    pub fn current_track(&self) -> Option<&Track> {
        self.current_index()
            .and_then(|index| self.active_playlist().get(index))
    }

    /// Playback state snapshot
    pub fn playback(&self) -> &PlaybackState {
        self.controller.state()
    }

    /// The playback controller
    pub fn controller(&self) -> &PlaybackController<O> {
        &self.controller
    }

    /// The playback controller, for transport commands
    ///
    /// Transport commands never touch the queue, so handing out the
    /// controller cannot break queue invariants.
    pub fn controller_mut(&mut self) -> &mut PlaybackController<O> {
        &mut self.controller
    }

    /// The playlist store (read-only; mutate through the coordinator)
    pub fn store(&self) -> &PlaylistStore {
        &self.store
    }

    /// Active playlist
    pub fn active_playlist(&self) -> &Playlist {
        self.store.active_playlist()
    }

    /// How locators are produced
    pub fn stream_mode(&self) -> &StreamMode {
        &self.stream_mode
    }

    /// Load awaiting `complete_load`, if any
    pub fn pending_load(&self) -> Option<&LoadTicket> {
        self.pending.as_ref()
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        self.controller.drain_events()
    }

    // ===== Selection =====

    /// Play `track`, adding it to the active playlist first if needed
    pub fn select_track(&mut self, track: Track) -> Result<LoadStatus> {
        let active = self.store.active_index();
        let outcome = self.store.add_track(active, track)?;
        if let AddOutcome::Added(_) = outcome {
            self.emit_queue_changed();
        }
        self.start_load(outcome.index())
    }

    /// Play the track at `index` of the active playlist
    ///
    /// # Errors
    /// `IndexOutOfRange` if there is no such track.
    pub fn play_at(&mut self, index: usize) -> Result<LoadStatus> {
        let len = self.active_playlist().len();
        if index >= len {
            return Err(PlayerError::out_of_range("track", index, len));
        }
        self.start_load(index)
    }

    /// Skip forward, wrapping to the first track
    pub fn next(&mut self) -> Result<LoadStatus> {
        let len = self.active_playlist().len();
        match self.state {
            QueueState::Loaded { index } if len > 0 => self.play_at((index + 1) % len),
            _ => self.play_at(0),
        }
    }

    /// Skip back, wrapping to the last track
    pub fn previous(&mut self) -> Result<LoadStatus> {
        let len = self.active_playlist().len();
        match self.state {
            QueueState::Loaded { index } if len > 0 => {
                self.play_at(if index == 0 { len - 1 } else { index - 1 })
            }
            _ => self.play_at(0),
        }
    }

    /// Finish a load started in `StreamMode::Resolved`
    ///
    /// Returns `Ok(false)` when the ticket was superseded by a newer request
    /// or its track left the active playlist; nothing changes in that case.
    ///
    /// # Errors
    /// The resolver's error when `resolved` failed (previous playback keeps
    /// going), or `PlaybackFailure` if the output refuses the new locator.
    pub fn complete_load(
        &mut self,
        ticket: &LoadTicket,
        resolved: Result<ResourceLocator>,
    ) -> Result<bool> {
        if self.pending.as_ref() != Some(ticket) {
            debug!(
                generation = ticket.generation(),
                current = self.generation,
                "Discarding stale stream resolution"
            );
            return Ok(false);
        }
        self.pending = None;

        let locator = match resolved {
            Ok(locator) => locator,
            Err(e) => {
                let err = match e {
                    PlayerError::TransportFailure(_) => e,
                    other => PlayerError::transport(other.to_string()),
                };
                warn!(track_id = %ticket.track_id(), error = %err, "Stream resolution failed");
                self.controller.emit(PlayerEvent::Error {
                    message: err.to_string(),
                });
                return Err(err);
            }
        };

        let Some(index) = self.active_playlist().position_of(ticket.track_id()) else {
            debug!(track_id = %ticket.track_id(), "Resolved track no longer in active playlist");
            return Ok(false);
        };

        self.apply_load(index, locator)?;
        Ok(true)
    }

    // ===== Output events and autoplay =====

    /// Feed an output observation through the controller, then autoplay if
    /// the track finished
    ///
    /// Returns the status of the autoplay load, if one was started.
    pub fn handle_output_event(&mut self, event: OutputEvent) -> Result<Option<LoadStatus>> {
        self.controller.observe(event);

        // Drain everything first so a failed autoplay leaves nothing behind
        let mut last = None;
        while let Ok(completion) = self.completions.try_recv() {
            last = Some(completion);
        }

        match last {
            Some(completion) => self.on_track_completed(&completion),
            None => Ok(None),
        }
    }

    fn on_track_completed(&mut self, completion: &Completion) -> Result<Option<LoadStatus>> {
        let QueueState::Loaded { index } = self.state else {
            debug!(track_id = %completion.track_id, "Completion while idle, ignoring");
            return Ok(None);
        };

        let len = self.active_playlist().len();
        let next = if index + 1 < len { index + 1 } else { 0 };
        info!(finished = %completion.track_id, next, "Autoplay advancing");

        self.play_at(next).map(Some)
    }

    // ===== Playlist mutations with reconciliation =====

    /// Create a playlist; the active playlist and queue are unaffected
    pub fn create_playlist(&mut self, name: &str) -> Result<usize> {
        let index = self.store.create_playlist(name)?;
        self.emit_playlists_changed();
        Ok(index)
    }

    /// Delete a playlist
    ///
    /// Deleting the active playlist resets the queue to `Idle` (playback
    /// continues); deleting another one keeps the current index.
    pub fn delete_playlist(&mut self, index: usize) -> Result<Playlist> {
        let was_active = index == self.store.active_index();
        let removed = self.store.delete_playlist(index)?;

        if was_active {
            self.reset_queue();
        }
        self.emit_playlists_changed();
        self.emit_queue_changed();
        Ok(removed)
    }

    /// Make another playlist active
    ///
    /// Playback is left alone; the queue resets to `Idle` and the completion
    /// listener is re-registered so the old queue cannot autoplay.
    pub fn set_active_playlist(&mut self, index: usize) -> Result<()> {
        if index == self.store.active_index() {
            self.store.playlist(index)?;
            return Ok(());
        }

        self.store.set_active_playlist(index)?;
        self.reset_queue();
        self.emit_playlists_changed();
        self.emit_queue_changed();
        Ok(())
    }

    /// Add a track to any playlist without playing it
    pub fn add_track(&mut self, playlist_index: usize, track: Track) -> Result<AddOutcome> {
        let outcome = self.store.add_track(playlist_index, track)?;
        if matches!(outcome, AddOutcome::Added(_))
            && playlist_index == self.store.active_index()
        {
            self.emit_queue_changed();
        }
        Ok(outcome)
    }

    /// Remove a track, keeping the current index pointed at the same track
    ///
    /// Removing the current track stops playback and goes `Idle`.
    pub fn remove_track(&mut self, playlist_index: usize, track_index: usize) -> Result<Track> {
        let removed = self.store.remove_track(playlist_index, track_index)?;

        if playlist_index == self.store.active_index() {
            if let QueueState::Loaded { index } = self.state {
                match track_index.cmp(&index) {
                    Ordering::Equal => {
                        info!(track_id = %removed.id, "Removed the current track, stopping");
                        self.controller.stop();
                        self.state = QueueState::Idle;
                    }
                    Ordering::Less => {
                        self.state = QueueState::Loaded { index: index - 1 };
                    }
                    Ordering::Greater => {}
                }
            }
            self.emit_queue_changed();
        }
        Ok(removed)
    }

    /// Move a track up one slot; the current index follows its track
    ///
    /// Returns `false` when the track was already at the boundary.
    pub fn move_track_up(&mut self, playlist_index: usize, track_index: usize) -> Result<bool> {
        let swapped = self.store.move_track_up(playlist_index, track_index)?;
        self.follow_swap(playlist_index, swapped);
        Ok(swapped.is_some())
    }

    /// Move a track down one slot; the current index follows its track
    ///
    /// Returns `false` when the track was already at the boundary.
    pub fn move_track_down(&mut self, playlist_index: usize, track_index: usize) -> Result<bool> {
        let swapped = self.store.move_track_down(playlist_index, track_index)?;
        self.follow_swap(playlist_index, swapped);
        Ok(swapped.is_some())
    }

    // ===== Internals =====

    fn start_load(&mut self, index: usize) -> Result<LoadStatus> {
        self.generation += 1;
        let track_id = self.active_playlist().tracks[index].id.clone();

        match &self.stream_mode {
            StreamMode::Direct { endpoint } => {
                let locator = ResourceLocator::direct(endpoint, &track_id);
                self.pending = None;
                self.apply_load(index, locator)?;
                Ok(LoadStatus::Started)
            }
            StreamMode::Resolved => {
                let ticket = LoadTicket::new(self.generation, track_id);
                debug!(
                    generation = ticket.generation(),
                    track_id = %ticket.track_id(),
                    "Waiting for stream resolution"
                );
                self.pending = Some(ticket.clone());
                Ok(LoadStatus::Pending(ticket))
            }
        }
    }

    // Load + play the track at `index`. The queue is `Loaded` even if the
    // output refuses to play, since the track did replace the previous one.
    fn apply_load(&mut self, index: usize, locator: ResourceLocator) -> Result<()> {
        let track = self.active_playlist().tracks[index].clone();
        self.controller.load(track, locator);
        self.state = QueueState::Loaded { index };
        self.emit_queue_changed();
        self.controller.play()
    }

    fn follow_swap(&mut self, playlist_index: usize, swapped: Option<(usize, usize)>) {
        let Some((from, to)) = swapped else {
            return;
        };
        if playlist_index != self.store.active_index() {
            return;
        }

        if let QueueState::Loaded { index } = self.state {
            if index == from {
                self.state = QueueState::Loaded { index: to };
            } else if index == to {
                self.state = QueueState::Loaded { index: from };
            }
        }
        self.emit_queue_changed();
    }

    fn reset_queue(&mut self) {
        self.state = QueueState::Idle;
        self.pending = None;

        let (tx, completions) = unbounded_channel();
        self.controller.set_completion_listener(tx);
        self.completions = completions;
    }

    fn emit_queue_changed(&mut self) {
        let event = PlayerEvent::QueueChanged {
            playlist: self.store.active_index(),
            length: self.active_playlist().len(),
            current: self.current_index(),
        };
        self.controller.emit(event);
    }

    fn emit_playlists_changed(&mut self) {
        let event = PlayerEvent::PlaylistsChanged {
            count: self.store.len(),
            active: self.store.active_index(),
        };
        self.controller.emit(event);
    }
}
