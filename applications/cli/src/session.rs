//! Interactive session facade
//!
//! Turns typed commands into coordinator calls, resolves pending stream
//! loads, and renders the events the engine queued along the way.

use crate::commands::{Command, HELP};
use crate::config::SessionConfig;
use crate::error::{CliError, Result};
use crate::render;
use resona_core::{PlayerError, SearchService, StreamResolver, Track};
use resona_gateway_client::GatewayClient;
use resona_playback::{
    HeadlessOutput, LoadStatus, MediaOutput, OutputEvent, PlaybackController, PlayerEvent,
    PlaylistStore, QueueCoordinator,
};
use resona_storage::{JsonFileStore, MemoryStore};
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Lines to print for one input line
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub quit: bool,
}

pub struct Session<O: MediaOutput> {
    queue: QueueCoordinator<O>,
    search: Arc<dyn SearchService>,
    resolver: Arc<dyn StreamResolver>,
    results: Vec<Track>,
}

impl Session<HeadlessOutput> {
    /// Wire a headless session from configuration
    ///
    /// `ephemeral` keeps playlists in memory only.
    pub fn open(config: &SessionConfig, ephemeral: bool) -> Result<Self> {
        let gateway = Arc::new(GatewayClient::new(config.gateway_config())?);
        let playback = config.playback_config();

        let store = open_playlists(config, ephemeral)?;
        let controller = PlaybackController::new(HeadlessOutput::new(), playback.initial_volume);
        let queue = QueueCoordinator::new(controller, store, playback.stream_mode);

        info!(
            gateway = gateway.base_url(),
            mode = ?config.playback.stream_mode,
            ephemeral,
            "Session ready"
        );

        Ok(Self::new(queue, gateway.clone(), gateway))
    }
}

impl<O: MediaOutput> Session<O> {
    pub fn new(
        queue: QueueCoordinator<O>,
        search: Arc<dyn SearchService>,
        resolver: Arc<dyn StreamResolver>,
    ) -> Self {
        Self {
            queue,
            search,
            resolver,
            results: Vec::new(),
        }
    }

    pub fn queue(&self) -> &QueueCoordinator<O> {
        &self.queue
    }

    /// Results of the last search
    pub fn results(&self) -> &[Track] {
        &self.results
    }

    /// Read commands until `quit` or end of input
    pub async fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        writeln!(out, "{}", render::playlists(self.queue.store(), self.queue.state()).join("\n"))?;
        writeln!(out, "Type 'help' for commands.")?;

        for line in input.lines() {
            let reply = self.handle_line(&line?).await;
            for line in &reply.lines {
                writeln!(out, "{line}")?;
            }
            out.flush()?;
            if reply.quit {
                break;
            }
        }
        Ok(())
    }

    /// Run one input line
    ///
    /// Command failures are rendered as messages; the session carries on.
    pub async fn handle_line(&mut self, line: &str) -> Reply {
        let command = match Command::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Reply::default(),
            Err(e) => {
                return Reply {
                    lines: vec![format!("error: {e}")],
                    quit: false,
                }
            }
        };
        debug!(?command, "Executing");

        if command == Command::Quit {
            return Reply {
                lines: vec!["Bye".to_string()],
                quit: true,
            };
        }

        let result = self.execute(command).await;

        let events = self.queue.drain_events();
        let reported = events
            .iter()
            .any(|e| matches!(e, PlayerEvent::Error { .. }));
        let mut lines: Vec<String> = events
            .iter()
            .filter_map(|e| render::event(e, self.queue.store()))
            .collect();

        match result {
            Ok(output) => lines.extend(output),
            Err(e) => {
                // Playback and transport failures already came through as events
                if !(reported && is_surfaced(&e)) {
                    lines.push(format!("error: {e}"));
                }
            }
        }

        Reply { lines, quit: false }
    }

    async fn execute(&mut self, command: Command) -> Result<Vec<String>> {
        let mut lines = Vec::new();

        match command {
            Command::Search(query) => {
                self.results = self.search.search(&query).await?;
                lines = render::search_results(&self.results);
            }
            Command::Pick(n) => {
                let track = self.results.get(n).cloned().ok_or_else(|| {
                    PlayerError::out_of_range("search result", n, self.results.len())
                })?;
                let status = self.queue.select_track(track)?;
                self.settle(status).await?;
            }
            Command::Play(index) => {
                let status = self.queue.play_at(index)?;
                self.settle(status).await?;
            }
            Command::Toggle => self.queue.controller_mut().toggle_play()?,
            Command::Pause => self.queue.controller_mut().pause(),
            Command::Seek(position) => {
                self.queue.controller_mut().seek(position)?;
                lines.push(render::now_playing(self.queue.playback()));
            }
            Command::Volume(level) => {
                self.queue.controller_mut().set_volume(level)?;
            }
            Command::Mute => {
                self.queue.controller_mut().toggle_mute();
            }
            Command::Next => {
                let status = self.queue.next()?;
                self.settle(status).await?;
            }
            Command::Previous => {
                let status = self.queue.previous()?;
                self.settle(status).await?;
            }
            Command::NewPlaylist(name) => {
                let index = self.queue.create_playlist(&name)?;
                lines.push(format!("Created playlist {}: {}", index + 1, name.trim()));
            }
            Command::DeletePlaylist(index) => {
                let removed = self.queue.delete_playlist(index)?;
                lines.push(format!("Deleted playlist {}", removed.name));
            }
            Command::UsePlaylist(index) => {
                self.queue.set_active_playlist(index)?;
                lines = render::playlists(self.queue.store(), self.queue.state());
            }
            Command::Remove(index) => {
                let active = self.queue.store().active_index();
                let removed = self.queue.remove_track(active, index)?;
                lines.push(format!("Removed {}", render::track_line(&removed)));
            }
            Command::Up(index) => {
                let active = self.queue.store().active_index();
                if !self.queue.move_track_up(active, index)? {
                    lines.push("Already at the top".to_string());
                }
            }
            Command::Down(index) => {
                let active = self.queue.store().active_index();
                if !self.queue.move_track_down(active, index)? {
                    lines.push("Already at the bottom".to_string());
                }
            }
            Command::List => lines = render::playlists(self.queue.store(), self.queue.state()),
            Command::Status => lines.push(render::now_playing(self.queue.playback())),
            Command::Tick(position) => {
                self.observe(OutputEvent::Progress { position }).await?;
            }
            Command::Meta(duration) => {
                self.observe(OutputEvent::MetadataLoaded { duration }).await?;
            }
            Command::End => self.observe(OutputEvent::Ended).await?,
            Command::Help => lines = HELP.lines().map(str::to_string).collect(),
            Command::Quit => {}
        }

        Ok(lines)
    }

    async fn observe(&mut self, event: OutputEvent) -> Result<()> {
        if let Some(status) = self.queue.handle_output_event(event)? {
            self.settle(status).await?;
        }
        Ok(())
    }

    // Resolve a pending load right away; the session is the only caller so
    // the ticket is normally still current when the resolver returns.
    async fn settle(&mut self, status: LoadStatus) -> Result<()> {
        let LoadStatus::Pending(ticket) = status else {
            return Ok(());
        };

        let resolved = self.resolver.resolve(ticket.track_id()).await;
        if !self.queue.complete_load(&ticket, resolved)? {
            warn!(track_id = %ticket.track_id(), "Resolved stream was no longer wanted");
        }
        Ok(())
    }
}

/// Open the persisted playlist collection (or an in-memory one)
pub fn open_playlists(config: &SessionConfig, ephemeral: bool) -> Result<PlaylistStore> {
    let name = config.storage.default_playlist_name.trim();
    let store = if ephemeral {
        PlaylistStore::open(MemoryStore::new(), name)?
    } else {
        let files = JsonFileStore::open(&config.storage.data_dir)?;
        debug!(dir = %files.dir().display(), "Using JSON playlist storage");
        PlaylistStore::open(files, name)?
    };
    Ok(store)
}

fn is_surfaced(err: &CliError) -> bool {
    matches!(
        err,
        CliError::Player(PlayerError::PlaybackFailure(_) | PlayerError::TransportFailure(_))
    )
}
