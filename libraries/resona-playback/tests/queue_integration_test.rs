//! Queue coordinator integration tests
//!
//! Real-world flows against a shared in-memory store: building playlists,
//! autoplay through the end of a playlist, editing the active playlist while
//! it plays, and switching playlists mid-track.

use resona_core::{PlayerError, ResourceLocator, Track, TrackId};
use resona_playback::{
    HeadlessOutput, LoadStatus, OutputCall, OutputEvent, PlaybackController, PlayerEvent,
    PlaylistStore, QueueCoordinator, QueueState, StreamMode, ACTIVE_INDEX_KEY, PLAYLISTS_KEY,
};
use resona_storage::MemoryStore;
use serde_json::json;

// ===== Test Helpers =====

const ENDPOINT: &str = "http://localhost:8080/api";

fn track(id: &str) -> Track {
    Track::new(id, format!("Song {}", id.to_uppercase())).with_artists([format!("Artist {id}")])
}

fn session(store: &MemoryStore, mode: StreamMode) -> QueueCoordinator<HeadlessOutput> {
    let playlists = PlaylistStore::open(store.clone(), "Default").unwrap();
    let controller = PlaybackController::new(HeadlessOutput::new(), 1.0);
    QueueCoordinator::new(controller, playlists, mode)
}

fn direct_session(store: &MemoryStore) -> QueueCoordinator<HeadlessOutput> {
    session(
        store,
        StreamMode::Direct {
            endpoint: ENDPOINT.to_string(),
        },
    )
}

fn with_tracks(ids: &[&str]) -> (MemoryStore, QueueCoordinator<HeadlessOutput>) {
    let store = MemoryStore::new();
    let mut queue = direct_session(&store);
    for id in ids {
        queue.add_track(0, track(id)).unwrap();
    }
    (store, queue)
}

fn playing_id(queue: &QueueCoordinator<HeadlessOutput>) -> Option<String> {
    queue.playback().track_id().map(|id| id.to_string())
}

fn saved_ids(store: &MemoryStore, playlist: usize) -> Vec<String> {
    let saved = store.get(PLAYLISTS_KEY).unwrap();
    saved[playlist]["songs"]
        .as_array()
        .unwrap()
        .iter()
        .map(|song| song["id"].as_str().unwrap().to_string())
        .collect()
}

// ===== Playlist Collection =====

#[test]
fn test_road_trip_playlist_deduplicates() {
    let store = MemoryStore::new();
    let mut queue = direct_session(&store);

    let index = queue.create_playlist("Road Trip").unwrap();
    assert_eq!(index, 1);
    assert_eq!(queue.store().len(), 2);
    assert_eq!(queue.store().active_index(), 0);

    queue.set_active_playlist(1).unwrap();
    assert_eq!(queue.store().active_index(), 1);

    queue.add_track(1, track("abc")).unwrap();
    queue.add_track(1, track("abc")).unwrap();

    let road_trip = queue.store().playlist(1).unwrap();
    assert_eq!(road_trip.name, "Road Trip");
    assert_eq!(road_trip.len(), 1);
    assert_eq!(road_trip.tracks[0].id, TrackId::new("abc"));

    assert_eq!(saved_ids(&store, 1), vec!["abc"]);
    assert_eq!(store.get(ACTIVE_INDEX_KEY), Some(json!(1)));
}

#[test]
fn test_collection_survives_restart() {
    let store = MemoryStore::new();
    {
        let mut queue = direct_session(&store);
        queue.create_playlist("Focus").unwrap();
        queue.add_track(1, track("x")).unwrap();
        queue.set_active_playlist(1).unwrap();
    }

    let queue = direct_session(&store);
    assert_eq!(queue.store().len(), 2);
    assert_eq!(queue.store().active_index(), 1);
    assert_eq!(queue.active_playlist().name, "Focus");
    assert_eq!(queue.active_playlist().tracks[0].id, TrackId::new("x"));
    // Restored sessions start idle
    assert!(queue.state().is_idle());
}

#[test]
fn test_malformed_saved_data_falls_back_to_default() {
    let store = MemoryStore::with_values([
        (PLAYLISTS_KEY, json!({"not": "a list"})),
        (ACTIVE_INDEX_KEY, json!(7)),
    ]);

    let queue = direct_session(&store);
    assert_eq!(queue.store().len(), 1);
    assert_eq!(queue.active_playlist().name, "Default");
    assert_eq!(queue.store().active_index(), 0);
}

#[test]
fn test_active_index_stored_as_string_is_accepted() {
    let store = MemoryStore::with_values([
        (
            PLAYLISTS_KEY,
            json!([{"name": "A", "songs": []}, {"name": "B", "songs": []}]),
        ),
        (ACTIVE_INDEX_KEY, json!("1")),
    ]);

    let queue = direct_session(&store);
    assert_eq!(queue.store().active_index(), 1);
}

#[test]
fn test_cannot_delete_last_playlist() {
    let store = MemoryStore::new();
    let mut queue = direct_session(&store);
    let writes = store.write_count();

    let result = queue.delete_playlist(0);
    assert!(matches!(result, Err(PlayerError::InvalidState(_))));
    assert_eq!(queue.store().len(), 1);
    assert_eq!(store.write_count(), writes);
}

#[test]
fn test_persistence_failure_keeps_in_memory_change() {
    let store = MemoryStore::new();
    let mut queue = direct_session(&store);
    store.set_read_only(true);

    queue.add_track(0, track("a")).unwrap();

    assert_eq!(queue.active_playlist().len(), 1);
    assert!(store.get(PLAYLISTS_KEY).is_none());
}

// ===== Autoplay =====

#[test]
fn test_last_track_completion_wraps_to_first() {
    let (_store, mut queue) = with_tracks(&["a", "b", "c"]);
    queue.play_at(2).unwrap();
    assert_eq!(playing_id(&queue).as_deref(), Some("c"));

    let status = queue.handle_output_event(OutputEvent::Ended).unwrap();

    assert_eq!(status, Some(LoadStatus::Started));
    assert_eq!(queue.state(), QueueState::Loaded { index: 0 });
    assert_eq!(playing_id(&queue).as_deref(), Some("a"));
    assert!(queue.playback().playing);
    assert_eq!(
        queue.controller().output().source(),
        Some(&ResourceLocator::new(format!("{ENDPOINT}/stream/a")))
    );
}

#[test]
fn test_autoplay_walks_whole_playlist() {
    let (_store, mut queue) = with_tracks(&["a", "b", "c"]);
    queue.play_at(0).unwrap();

    let mut order = vec![playing_id(&queue).unwrap()];
    for _ in 0..3 {
        queue
            .handle_output_event(OutputEvent::MetadataLoaded { duration: 200.0 })
            .unwrap();
        queue.handle_output_event(OutputEvent::Ended).unwrap();
        order.push(playing_id(&queue).unwrap());
    }

    assert_eq!(order, vec!["a", "b", "c", "a"]);
}

#[test]
fn test_duplicate_end_signal_advances_once() {
    let store = MemoryStore::new();
    let mut queue = session(&store, StreamMode::Resolved);
    for id in ["a", "b", "c"] {
        queue.add_track(0, track(id)).unwrap();
    }
    let Ok(LoadStatus::Pending(ticket)) = queue.play_at(0) else {
        panic!("expected pending load");
    };
    queue
        .complete_load(&ticket, Ok(ResourceLocator::new("https://cdn/a")))
        .unwrap();
    queue.drain_events();

    // "a" stays loaded while "b" resolves, so the output may report its end twice
    let first = queue.handle_output_event(OutputEvent::Ended).unwrap();
    let second = queue.handle_output_event(OutputEvent::Ended).unwrap();

    assert!(matches!(first, Some(LoadStatus::Pending(_))));
    assert_eq!(second, None);

    let finished: Vec<_> = queue
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, PlayerEvent::TrackFinished { .. }))
        .collect();
    assert_eq!(
        finished,
        vec![PlayerEvent::TrackFinished {
            track_id: TrackId::new("a")
        }]
    );
}

#[test]
fn test_single_track_playlist_repeats() {
    let (_store, mut queue) = with_tracks(&["solo"]);
    queue.play_at(0).unwrap();

    queue.handle_output_event(OutputEvent::Ended).unwrap();

    assert_eq!(queue.current_index(), Some(0));
    assert!(queue.playback().playing);
    assert_eq!(queue.playback().position, 0.0);
}

#[test]
fn test_replayed_track_signals_end_again() {
    let (_store, mut queue) = with_tracks(&["a", "b"]);
    queue.create_playlist("Other").unwrap();
    queue.play_at(0).unwrap();
    queue.set_active_playlist(1).unwrap();

    assert_eq!(queue.handle_output_event(OutputEvent::Ended).unwrap(), None);
    assert!(!queue.playback().playing);

    // Replay the finished track by hand while the queue is idle
    queue.controller_mut().play().unwrap();
    assert!(queue.playback().playing);

    assert_eq!(queue.handle_output_event(OutputEvent::Ended).unwrap(), None);
    assert!(!queue.playback().playing);
    assert!(queue.state().is_idle());
}

#[test]
fn test_replay_after_failed_autoplay_resumes_looping() {
    let store = MemoryStore::new();
    let mut queue = session(&store, StreamMode::Resolved);
    queue.add_track(0, track("a")).unwrap();
    queue.add_track(0, track("b")).unwrap();

    let Ok(LoadStatus::Pending(ticket)) = queue.play_at(0) else {
        panic!("expected pending load");
    };
    queue
        .complete_load(&ticket, Ok(ResourceLocator::new("https://cdn/a")))
        .unwrap();

    let Some(LoadStatus::Pending(next)) = queue.handle_output_event(OutputEvent::Ended).unwrap()
    else {
        panic!("expected pending autoplay");
    };
    assert!(queue
        .complete_load(&next, Err(PlayerError::transport("500")))
        .is_err());
    assert_eq!(queue.current_index(), Some(0));

    queue.controller_mut().play().unwrap();
    let status = queue.handle_output_event(OutputEvent::Ended).unwrap();

    let Some(LoadStatus::Pending(retry)) = status else {
        panic!("expected autoplay after the replayed track ended, got {status:?}");
    };
    assert_eq!(retry.track_id(), &TrackId::new("b"));
    assert!(!queue.playback().playing);
}

#[test]
fn test_failed_autoplay_discards_queued_completions() {
    let (_store, mut queue) = with_tracks(&["a", "b", "c"]);
    queue.play_at(0).unwrap();

    // Two natural ends reach the controller before the coordinator looks
    queue.controller_mut().observe(OutputEvent::Ended);
    queue.controller_mut().play().unwrap();
    queue.controller_mut().observe(OutputEvent::Ended);
    queue.controller_mut().output_mut().set_reject_play(true);

    let result = queue.handle_output_event(OutputEvent::Progress { position: 1.0 });
    assert!(matches!(result, Err(PlayerError::PlaybackFailure(_))));
    assert_eq!(queue.current_index(), Some(1));

    queue.controller_mut().output_mut().set_reject_play(false);
    let status = queue
        .handle_output_event(OutputEvent::Progress { position: 2.0 })
        .unwrap();

    assert_eq!(status, None);
    assert_eq!(queue.current_index(), Some(1));
    assert_eq!(playing_id(&queue).as_deref(), Some("b"));
}

#[test]
fn test_seek_to_end_does_not_autoplay() {
    let (_store, mut queue) = with_tracks(&["a", "b"]);
    queue.play_at(0).unwrap();
    queue
        .handle_output_event(OutputEvent::MetadataLoaded { duration: 180.0 })
        .unwrap();

    queue.controller_mut().seek(180.0).unwrap();

    assert_eq!(queue.current_index(), Some(0));
    assert_eq!(queue.playback().position, 180.0);
}

// ===== Reconciliation =====

#[test]
fn test_remove_current_track_stops_playback() {
    let (store, mut queue) = with_tracks(&["a", "b", "c"]);
    queue.play_at(1).unwrap();

    let removed = queue.remove_track(0, 1).unwrap();

    assert_eq!(removed.id, TrackId::new("b"));
    assert!(queue.state().is_idle());
    assert!(!queue.playback().is_loaded());
    assert!(!queue.playback().playing);
    assert_eq!(queue.controller().output().calls().last(), Some(&OutputCall::Stop));
    assert_eq!(saved_ids(&store, 0), vec!["a", "c"]);

    // Explicit stop is not a completion
    assert_eq!(queue.handle_output_event(OutputEvent::Ended).unwrap(), None);
}

#[test]
fn test_remove_before_current_shifts_index() {
    let (_store, mut queue) = with_tracks(&["a", "b", "c"]);
    queue.play_at(2).unwrap();

    queue.remove_track(0, 0).unwrap();

    assert_eq!(queue.current_index(), Some(1));
    assert_eq!(queue.current_track().unwrap().id, TrackId::new("c"));
    assert!(queue.playback().playing);
}

#[test]
fn test_remove_after_current_keeps_index() {
    let (_store, mut queue) = with_tracks(&["a", "b", "c"]);
    queue.play_at(0).unwrap();

    queue.remove_track(0, 2).unwrap();

    assert_eq!(queue.current_index(), Some(0));
    queue.handle_output_event(OutputEvent::Ended).unwrap();
    assert_eq!(playing_id(&queue).as_deref(), Some("b"));
}

#[test]
fn test_reorder_follows_current_track() {
    let (_store, mut queue) = with_tracks(&["a", "b", "c"]);
    queue.play_at(1).unwrap();

    // Current track moves
    assert!(queue.move_track_up(0, 1).unwrap());
    assert_eq!(queue.current_index(), Some(0));

    // Neighbour moves onto the current slot
    assert!(queue.move_track_up(0, 1).unwrap());
    assert_eq!(queue.current_index(), Some(1));
    assert_eq!(queue.current_track().unwrap().id, TrackId::new("b"));

    // Boundary moves are no-ops
    assert!(!queue.move_track_up(0, 0).unwrap());
    assert!(!queue.move_track_down(0, 2).unwrap());
    assert_eq!(queue.current_index(), Some(1));

    // Autoplay follows the new order: [a, b, c] -> after b comes c
    let order: Vec<_> = queue
        .active_playlist()
        .tracks
        .iter()
        .map(|t| t.id.to_string())
        .collect();
    assert_eq!(order, vec!["a", "b", "c"]);
    queue.handle_output_event(OutputEvent::Ended).unwrap();
    assert_eq!(playing_id(&queue).as_deref(), Some("c"));
}

#[test]
fn test_switching_playlist_keeps_playing_but_stops_autoplay() {
    let (_store, mut queue) = with_tracks(&["a", "b"]);
    queue.create_playlist("Other").unwrap();
    queue.add_track(1, track("x")).unwrap();
    queue.play_at(0).unwrap();

    queue.set_active_playlist(1).unwrap();

    assert!(queue.state().is_idle());
    assert!(queue.playback().playing);
    assert_eq!(playing_id(&queue).as_deref(), Some("a"));

    // "a" finishing must not start anything in either playlist
    assert_eq!(queue.handle_output_event(OutputEvent::Ended).unwrap(), None);
    assert!(queue.state().is_idle());
    assert!(!queue.playback().playing);
    assert_eq!(playing_id(&queue).as_deref(), Some("a"));
}

#[test]
fn test_reselecting_active_playlist_is_noop() {
    let (store, mut queue) = with_tracks(&["a"]);
    queue.play_at(0).unwrap();
    let writes = store.write_count();

    queue.set_active_playlist(0).unwrap();

    assert_eq!(queue.current_index(), Some(0));
    assert_eq!(store.write_count(), writes);
}

#[test]
fn test_select_from_search_adds_and_plays() {
    let (store, mut queue) = with_tracks(&["a"]);

    queue.select_track(track("fresh")).unwrap();
    assert_eq!(queue.current_index(), Some(1));
    assert_eq!(saved_ids(&store, 0), vec!["a", "fresh"]);

    // Picking it again reuses the existing entry
    queue.select_track(track("fresh")).unwrap();
    assert_eq!(queue.active_playlist().len(), 2);
    assert_eq!(queue.current_index(), Some(1));
}

#[test]
fn test_select_rejects_track_without_id() {
    let (_store, mut queue) = with_tracks(&["a"]);
    queue.play_at(0).unwrap();

    let result = queue.select_track(Track::new("  ", "Ghost"));

    assert!(matches!(result, Err(PlayerError::InvalidInput(_))));
    assert_eq!(queue.active_playlist().len(), 1);
    assert_eq!(playing_id(&queue).as_deref(), Some("a"));
}

// ===== Resolved Streams =====

#[test]
fn test_resolved_autoplay_waits_for_locator() {
    let store = MemoryStore::new();
    let mut queue = session(&store, StreamMode::Resolved);
    queue.add_track(0, track("a")).unwrap();
    queue.add_track(0, track("b")).unwrap();

    let Ok(LoadStatus::Pending(ticket)) = queue.play_at(0) else {
        panic!("expected pending load");
    };
    queue
        .complete_load(&ticket, Ok(ResourceLocator::new("https://cdn/a")))
        .unwrap();

    let status = queue.handle_output_event(OutputEvent::Ended).unwrap();
    let Some(LoadStatus::Pending(next)) = status else {
        panic!("expected pending autoplay");
    };
    assert_eq!(next.track_id(), &TrackId::new("b"));
    assert!(next.generation() > ticket.generation());

    // Until resolved the finished track stays loaded
    assert_eq!(playing_id(&queue).as_deref(), Some("a"));
    assert!(!queue.playback().playing);

    assert!(queue
        .complete_load(&next, Ok(ResourceLocator::new("https://cdn/b")))
        .unwrap());
    assert_eq!(playing_id(&queue).as_deref(), Some("b"));
}

#[test]
fn test_resolution_failure_emits_error_event() {
    let store = MemoryStore::new();
    let mut queue = session(&store, StreamMode::Resolved);
    queue.add_track(0, track("a")).unwrap();
    queue.drain_events();

    let Ok(LoadStatus::Pending(ticket)) = queue.play_at(0) else {
        panic!("expected pending load");
    };
    let result = queue.complete_load(&ticket, Err(PlayerError::transport("timed out")));

    assert!(matches!(result, Err(PlayerError::TransportFailure(_))));
    assert!(queue.state().is_idle());
    assert!(queue
        .drain_events()
        .iter()
        .any(|e| matches!(e, PlayerEvent::Error { message } if message.contains("timed out"))));
}
