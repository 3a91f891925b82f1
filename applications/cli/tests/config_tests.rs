//! Session configuration tests

use resona_cli::{CliError, SessionConfig, StreamModeSetting};
use resona_playback::StreamMode;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults() {
    let config = SessionConfig::default();

    assert_eq!(config.gateway.url, "http://localhost:8080/api");
    assert_eq!(config.gateway.search_limit, 20);
    assert_eq!(config.gateway.timeout_secs, 30);
    assert_eq!(config.playback.stream_mode, StreamModeSetting::Direct);
    assert_eq!(config.playback.initial_volume, 1.0);
    assert_eq!(config.storage.data_dir, PathBuf::from("./data"));
    assert_eq!(config.storage.default_playlist_name, "Default");
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_file_keeps_defaults() {
    let file = write_config(
        r#"
[gateway]
url = "http://music.lan:9000/api"

[playback]
stream_mode = "resolved"
initial_volume = 0.5
"#,
    );

    let config = SessionConfig::load(Some(file.path())).unwrap();

    assert_eq!(config.gateway.url, "http://music.lan:9000/api");
    assert_eq!(config.gateway.search_limit, 20);
    assert_eq!(config.playback.stream_mode, StreamModeSetting::Resolved);
    assert_eq!(config.playback.initial_volume, 0.5);
    assert_eq!(config.storage.default_playlist_name, "Default");
}

#[test]
fn test_missing_explicit_file_is_error() {
    let result = SessionConfig::load(Some(std::path::Path::new("/nonexistent/resona.toml")));
    match result {
        Err(CliError::Config(msg)) => assert!(msg.contains("not found")),
        other => panic!("expected Config error, got {other:?}"),
    }
}

#[test]
fn test_validation_rejects_bad_values() {
    let mut config = SessionConfig::default();
    config.gateway.url = "localhost:8080".to_string();
    assert!(config.validate().is_err());

    let mut config = SessionConfig::default();
    config.gateway.search_limit = 0;
    assert!(config.validate().is_err());

    let mut config = SessionConfig::default();
    config.playback.initial_volume = 1.5;
    assert!(config.validate().is_err());

    let mut config = SessionConfig::default();
    config.storage.default_playlist_name = "  ".to_string();
    let err = config.validate().unwrap_err();
    assert!(matches!(err, CliError::Config(ref msg) if msg.contains("default_playlist_name")));
}

#[test]
fn test_direct_mode_uses_gateway_as_endpoint() {
    let mut config = SessionConfig::default();
    config.gateway.url = "http://music.lan:9000/api/".to_string();

    let playback = config.playback_config();
    assert_eq!(
        playback.stream_mode,
        StreamMode::Direct {
            endpoint: "http://music.lan:9000/api".to_string()
        }
    );
    assert_eq!(playback.default_playlist_name, "Default");
}

#[test]
fn test_resolved_mode_and_gateway_settings() {
    let mut config = SessionConfig::default();
    config.playback.stream_mode = StreamModeSetting::Resolved;
    config.gateway.timeout_secs = 5;
    config.gateway.search_limit = 7;

    assert_eq!(config.playback_config().stream_mode, StreamMode::Resolved);

    let gateway = config.gateway_config();
    assert_eq!(gateway.timeout, Duration::from_secs(5));
    assert_eq!(gateway.search_limit, 7);
}
