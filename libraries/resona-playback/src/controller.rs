//! Playback controller
//!
//! Owns the media output and the [`PlaybackState`] derived from it. State is
//! changed only by the transport methods here or by output observations fed
//! through [`PlaybackController::observe`].

use crate::{
    events::{Completion, PlayerEvent},
    output::{MediaOutput, OutputEvent},
    types::PlaybackState,
    volume::Volume,
};
use resona_core::{PlayerError, ResourceLocator, Result, Track};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

/// Transport control over a single media output
pub struct PlaybackController<O: MediaOutput> {
    output: O,
    state: PlaybackState,

    // Single completion listener; replacing it drops the old sender
    completion: Option<UnboundedSender<Completion>>,

    // Set by a natural end; play, seek and load clear it so the next end
    // signals completion again
    ended: bool,

    // Event queue for UI synchronization
    pending_events: Vec<PlayerEvent>,
}

impl<O: MediaOutput> PlaybackController<O> {
    /// Create a controller around `output` at the given initial volume
    pub fn new(mut output: O, initial_volume: f64) -> Self {
        let volume = Volume::new(initial_volume);
        output.set_volume(volume.level());

        Self {
            output,
            state: PlaybackState::new(volume),
            completion: None,
            ended: false,
            pending_events: Vec::new(),
        }
    }

    /// Current playback state
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Borrow the media output
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Mutably borrow the media output
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Install the single completion listener
    ///
    /// Any previously installed listener is dropped and will never fire again.
    pub fn set_completion_listener(&mut self, listener: UnboundedSender<Completion>) {
        if self.completion.replace(listener).is_some() {
            debug!("Replaced completion listener");
        }
    }

    /// Point the output at a new resource
    ///
    /// Resets position and duration, does not start playback. Whatever was
    /// playing before is implicitly stopped by the replacement.
    pub fn load(&mut self, track: Track, locator: ResourceLocator) {
        info!(track_id = %track.id, title = %track.title, %locator, "Loading track");

        let previous_track_id = self.state.track.as_ref().map(|t| t.id.clone());
        let was_playing = self.state.playing;

        self.output.load(&locator);

        self.pending_events.push(PlayerEvent::TrackChanged {
            track_id: track.id.clone(),
            previous_track_id,
        });

        self.state.track = Some(track);
        self.state.locator = Some(locator);
        self.state.playing = false;
        self.state.position = 0.0;
        self.state.duration = 0.0;
        self.ended = false;

        if was_playing {
            self.emit_state();
        }
    }

    /// Start or resume playback
    ///
    /// No-op if already playing. Replaying a track that already ended re-arms
    /// its completion signal.
    ///
    /// # Errors
    /// `PlaybackFailure` if nothing is loaded or the output refuses. The
    /// playing flag stays false and an error event is queued.
    pub fn play(&mut self) -> Result<()> {
        if self.state.playing {
            return Ok(());
        }

        if self.state.track.is_none() {
            let err = PlayerError::playback("no track loaded");
            self.emit_error(&err);
            return Err(err);
        }

        match self.output.play() {
            Ok(()) => {
                if self.ended {
                    debug!("Replaying an ended track");
                    self.ended = false;
                }
                self.state.playing = true;
                self.emit_state();
                Ok(())
            }
            Err(e) => {
                let err = match e {
                    PlayerError::PlaybackFailure(_) => e,
                    other => PlayerError::playback(other.to_string()),
                };
                warn!(error = %err, "Output refused to play");
                self.emit_error(&err);
                Err(err)
            }
        }
    }

    /// Pause, keeping position. No-op when not playing.
    pub fn pause(&mut self) {
        if !self.state.playing {
            return;
        }
        self.output.pause();
        self.state.playing = false;
        self.emit_state();
    }

    /// Pause if playing, otherwise play
    pub fn toggle_play(&mut self) -> Result<()> {
        if self.state.playing {
            self.pause();
            Ok(())
        } else {
            self.play()
        }
    }

    /// Explicit stop: unloads the track without signalling completion
    pub fn stop(&mut self) {
        if self.state.track.is_none() {
            return;
        }

        self.output.stop();
        self.state.track = None;
        self.state.locator = None;
        self.state.playing = false;
        self.state.position = 0.0;
        self.state.duration = 0.0;
        self.ended = false;
        self.pending_events.push(PlayerEvent::Stopped);
    }

    /// Seek to `position` seconds
    ///
    /// Clamped to `[0, duration]` when the duration is known. Position updates
    /// immediately; the output catches up. Seeking to the end never counts as
    /// completion.
    ///
    /// # Errors
    /// `InvalidInput` for a non-finite position.
    pub fn seek(&mut self, position: f64) -> Result<()> {
        if !position.is_finite() {
            return Err(PlayerError::invalid_input(format!(
                "seek position must be finite, got {position}"
            )));
        }
        if self.state.track.is_none() {
            debug!(position, "Seek ignored, nothing loaded");
            return Ok(());
        }

        let target = self.clamp_position(position);
        self.state.position = target;
        self.ended = false;
        self.output.seek(target);
        self.emit_position();
        Ok(())
    }

    /// Set volume level, clamped to 0.0-1.0. Returns the stored level.
    ///
    /// # Errors
    /// `InvalidInput` for NaN.
    pub fn set_volume(&mut self, level: f64) -> Result<f64> {
        if level.is_nan() {
            return Err(PlayerError::invalid_input("volume must be a number"));
        }

        let stored = self.state.volume.set_level(level);
        self.output.set_volume(stored);
        self.emit_volume();
        Ok(stored)
    }

    /// Ask the output to flip mute; state reflects what the output reports
    pub fn toggle_mute(&mut self) -> bool {
        let requested = !self.state.volume.is_muted();
        let actual = self.output.set_muted(requested);
        if actual != requested {
            debug!(requested, actual, "Output did not apply mute request");
        }
        self.state.volume.set_muted(actual);
        self.emit_volume();
        actual
    }

    /// Apply an observation reported by the output
    pub fn observe(&mut self, event: OutputEvent) {
        if self.state.track.is_none() {
            debug!(?event, "Output event ignored, nothing loaded");
            return;
        }

        match event {
            OutputEvent::Progress { position } => {
                if !position.is_finite() {
                    return;
                }
                self.state.position = self.clamp_position(position);
                self.emit_position();
            }
            OutputEvent::MetadataLoaded { duration } => {
                // Live streams report an infinite duration: treat as unknown
                self.state.duration = if duration.is_finite() && duration > 0.0 {
                    duration
                } else {
                    0.0
                };
                self.state.position = self.clamp_position(self.state.position);
                self.emit_position();
            }
            OutputEvent::Ended => self.on_ended(),
            OutputEvent::Failed { message } => {
                warn!(%message, "Output failed");
                if self.state.playing {
                    self.state.playing = false;
                    self.emit_state();
                }
                self.emit_error(&PlayerError::playback(message));
            }
        }
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub(crate) fn emit(&mut self, event: PlayerEvent) {
        self.pending_events.push(event);
    }

    fn on_ended(&mut self) {
        if self.state.playing {
            self.state.playing = false;
            self.emit_state();
        }

        if self.ended {
            debug!("Duplicate end-of-track ignored");
            return;
        }
        self.ended = true;

        let Some(track_id) = self.state.track.as_ref().map(|t| t.id.clone()) else {
            return;
        };

        if self.state.duration > 0.0 {
            self.state.position = self.state.duration;
        }

        info!(%track_id, "Track finished");
        self.pending_events.push(PlayerEvent::TrackFinished {
            track_id: track_id.clone(),
        });

        if let Some(listener) = &self.completion {
            if listener.send(Completion { track_id }).is_err() {
                debug!("Completion listener gone");
                self.completion = None;
            }
        }
    }

    fn clamp_position(&self, position: f64) -> f64 {
        let position = position.max(0.0);
        if self.state.duration > 0.0 {
            position.min(self.state.duration)
        } else {
            position
        }
    }

    fn emit_state(&mut self) {
        self.pending_events.push(PlayerEvent::StateChanged {
            playing: self.state.playing,
        });
    }

    fn emit_position(&mut self) {
        self.pending_events.push(PlayerEvent::PositionUpdate {
            position: self.state.position,
            duration: self.state.duration,
        });
    }

    fn emit_volume(&mut self) {
        self.pending_events.push(PlayerEvent::VolumeChanged {
            level: self.state.volume.level(),
            is_muted: self.state.volume.is_muted(),
        });
    }

    fn emit_error(&mut self, err: &PlayerError) {
        self.pending_events.push(PlayerEvent::Error {
            message: err.to_string(),
        });
    }
}
