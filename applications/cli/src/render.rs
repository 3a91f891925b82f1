/// Text rendering for the terminal session
use resona_core::{format_clock, Track};
use resona_playback::{PlaybackState, PlayerEvent, PlaylistStore, QueueState};

/// `Title - Artist, Artist (3:45)`
pub fn track_line(track: &Track) -> String {
    let mut line = track.title.clone();
    let artists = track.artist_line();
    if !artists.is_empty() {
        line.push_str(" - ");
        line.push_str(&artists);
    }
    if let Some(secs) = track.duration_secs() {
        line.push_str(&format!(" ({})", format_clock(secs)));
    }
    line
}

/// Numbered search results, 1-based
pub fn search_results(tracks: &[Track]) -> Vec<String> {
    if tracks.is_empty() {
        return vec!["No results".to_string()];
    }
    tracks
        .iter()
        .enumerate()
        .map(|(i, track)| format!("{:>3}. {}", i + 1, track_line(track)))
        .collect()
}

/// Now-playing line with position, duration and volume
pub fn now_playing(state: &PlaybackState) -> String {
    let Some(track) = &state.track else {
        return "Nothing loaded".to_string();
    };

    let marker = if state.playing { ">" } else { "||" };
    let volume = if state.is_muted() {
        "muted".to_string()
    } else {
        format!("vol {}%", state.volume.percent())
    };
    let clock = if state.duration > 0.0 {
        format!(
            "{} / {} ({:.0}%)",
            format_clock(state.position),
            format_clock(state.duration),
            state.progress() * 100.0
        )
    } else {
        format_clock(state.position)
    };

    format!("{marker} {}  {clock}  {volume}", track_line(track))
}

/// Playlists with the active one marked, then the active queue with the
/// current track marked
pub fn playlists(store: &PlaylistStore, queue: QueueState) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, playlist) in store.playlists().iter().enumerate() {
        let marker = if i == store.active_index() { '*' } else { ' ' };
        lines.push(format!(
            "{marker} {}. {} ({} tracks)",
            i + 1,
            playlist.name,
            playlist.len()
        ));
    }

    let active = store.active_playlist();
    lines.push(String::new());
    lines.push(format!("Queue: {}", active.name));
    if active.is_empty() {
        lines.push("  (empty)".to_string());
    }
    for (i, track) in active.tracks.iter().enumerate() {
        let marker = if queue.current_index() == Some(i) { '>' } else { ' ' };
        lines.push(format!("{marker} {:>3}. {}", i + 1, track_line(track)));
    }
    lines
}

/// One line for events worth showing; position updates and the like stay quiet
pub fn event(event: &PlayerEvent, store: &PlaylistStore) -> Option<String> {
    match event {
        PlayerEvent::TrackChanged { track_id, .. } => {
            let title = store
                .active_playlist()
                .tracks
                .iter()
                .find(|t| &t.id == track_id)
                .map(track_line)
                .unwrap_or_else(|| track_id.to_string());
            Some(format!("Now playing: {title}"))
        }
        PlayerEvent::TrackFinished { track_id } => Some(format!("Finished {track_id}")),
        PlayerEvent::Stopped => Some("Stopped".to_string()),
        PlayerEvent::VolumeChanged { level, is_muted } => Some(if *is_muted {
            "Muted".to_string()
        } else {
            format!("Volume {:.0}%", level * 100.0)
        }),
        PlayerEvent::PlaylistsChanged { count, active } => Some(format!(
            "{count} playlists, active: {}",
            store
                .playlist(*active)
                .map(|p| p.name.as_str())
                .unwrap_or("?")
        )),
        PlayerEvent::Error { message } => Some(format!("! {message}")),
        PlayerEvent::StateChanged { .. }
        | PlayerEvent::PositionUpdate { .. }
        | PlayerEvent::QueueChanged { .. } => None,
    }
}
