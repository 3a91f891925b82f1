//! Platform-agnostic media output trait
//!
//! Abstracts the thing that actually plays a locator (a browser audio element,
//! a native player, or the headless output used by the terminal session).

use resona_core::{PlayerError, ResourceLocator, Result};
use tracing::trace;

/// Platform-agnostic media output
///
/// Commands are synchronous. Progress, metadata and end-of-track are reported
/// back asynchronously as [`OutputEvent`]s fed to
/// `PlaybackController::observe`.
pub trait MediaOutput: Send {
    /// Point the output at a new resource, replacing (and stopping) any previous one
    fn load(&mut self, locator: &ResourceLocator);

    /// Start or resume playback
    ///
    /// # Returns
    /// * `Ok(())` - Playback started
    /// * `Err(_)` - Output refused (resource unavailable, nothing loaded, ...)
    fn play(&mut self) -> Result<()>;

    /// Pause without discarding position
    fn pause(&mut self);

    /// Stop and unload
    fn stop(&mut self);

    /// Relocate to `position` seconds
    fn seek(&mut self, position: f64);

    /// Set volume level (0.0-1.0)
    fn set_volume(&mut self, level: f64);

    /// Request a mute state, returning the state the output actually ended up in
    fn set_muted(&mut self, muted: bool) -> bool;
}

/// Asynchronous observations reported by a media output
#[derive(Debug, Clone, PartialEq)]
pub enum OutputEvent {
    /// Playback position advanced
    Progress {
        /// Position in seconds
        position: f64,
    },

    /// Metadata for the loaded resource became available
    MetadataLoaded {
        /// Duration in seconds (non-finite for live streams)
        duration: f64,
    },

    /// Natural end of the loaded resource
    Ended,

    /// The output failed after accepting the resource
    Failed {
        /// Error message
        message: String,
    },
}

/// Command received by a [`HeadlessOutput`]
#[derive(Debug, Clone, PartialEq)]
pub enum OutputCall {
    Load(ResourceLocator),
    Play,
    Pause,
    Stop,
    Seek(f64),
    SetVolume(f64),
    SetMuted(bool),
}

/// Media output with no audio device
///
/// Tracks the commands it receives so the session can run without a sound
/// card and tests can assert on what the controller asked for. Can be told to
/// reject playback or refuse muting.
#[derive(Debug, Clone, Default)]
pub struct HeadlessOutput {
    source: Option<ResourceLocator>,
    playing: bool,
    position: f64,
    volume: f64,
    muted: bool,
    reject_play: bool,
    refuse_mute: bool,
    calls: Vec<OutputCall>,
}

impl HeadlessOutput {
    /// Create an output that accepts every command
    pub fn new() -> Self {
        Self {
            volume: 1.0,
            ..Self::default()
        }
    }

    /// Make `play` fail as if the resource were unavailable
    pub fn set_reject_play(&mut self, reject: bool) {
        self.reject_play = reject;
    }

    /// Make `set_muted(true)` leave the output unmuted
    pub fn set_refuse_mute(&mut self, refuse: bool) {
        self.refuse_mute = refuse;
    }

    /// Currently loaded locator
    pub fn source(&self) -> Option<&ResourceLocator> {
        self.source.as_ref()
    }

    /// Whether the output considers itself playing
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Last position commanded via `seek`
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Last volume commanded
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Whether the output is muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Every command received, oldest first
    pub fn calls(&self) -> &[OutputCall] {
        &self.calls
    }

    /// Forget recorded commands
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl MediaOutput for HeadlessOutput {
    fn load(&mut self, locator: &ResourceLocator) {
        trace!(%locator, "headless load");
        self.source = Some(locator.clone());
        self.playing = false;
        self.position = 0.0;
        self.calls.push(OutputCall::Load(locator.clone()));
    }

    fn play(&mut self) -> Result<()> {
        self.calls.push(OutputCall::Play);
        if self.source.is_none() {
            return Err(PlayerError::playback("no source"));
        }
        if self.reject_play {
            return Err(PlayerError::playback("resource unavailable"));
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.push(OutputCall::Pause);
        self.playing = false;
    }

    fn stop(&mut self) {
        self.calls.push(OutputCall::Stop);
        self.source = None;
        self.playing = false;
        self.position = 0.0;
    }

    fn seek(&mut self, position: f64) {
        self.calls.push(OutputCall::Seek(position));
        self.position = position;
    }

    fn set_volume(&mut self, level: f64) {
        self.calls.push(OutputCall::SetVolume(level));
        self.volume = level;
    }

    fn set_muted(&mut self, muted: bool) -> bool {
        self.calls.push(OutputCall::SetMuted(muted));
        self.muted = muted && !self.refuse_mute;
        self.muted
    }
}
