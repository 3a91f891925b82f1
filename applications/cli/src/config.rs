/// Session configuration
use crate::error::{CliError, Result};
use resona_gateway_client::GatewayConfig;
use resona_playback::{PlaybackConfig, StreamMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "resona.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    #[serde(default = "default_gateway")]
    pub gateway: GatewaySettings,

    #[serde(default = "default_playback")]
    pub playback: PlaybackSettings,

    #[serde(default = "default_storage")]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GatewaySettings {
    #[serde(default = "default_gateway_url")]
    pub url: String,

    #[serde(default = "default_search_limit")]
    pub search_limit: u32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default)]
    pub stream_mode: StreamModeSetting,

    #[serde(default = "default_initial_volume")]
    pub initial_volume: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_playlist_name")]
    pub default_playlist_name: String,
}

/// How tracks become playable locators
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamModeSetting {
    /// `<gateway>/stream/<id>` handed straight to the output
    #[default]
    Direct,
    /// Ask the gateway for the extracted audio URL first
    Resolved,
}

impl SessionConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `resona.toml` in the working
    /// directory is used if present. Environment variables prefixed with
    /// `RESONA_` override the file, with `__` between sections
    /// (e.g. `RESONA_GATEWAY__URL`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(CliError::Config(format!(
                        "config file {} not found",
                        path.display()
                    )));
                }
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("RESONA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let url = self.gateway.url.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(CliError::Config(format!(
                "gateway.url must be an http(s) URL, got '{url}'"
            )));
        }

        if self.gateway.search_limit == 0 {
            return Err(CliError::Config(
                "gateway.search_limit must be at least 1".to_string(),
            ));
        }

        if self.gateway.timeout_secs == 0 {
            return Err(CliError::Config(
                "gateway.timeout_secs must be at least 1".to_string(),
            ));
        }

        let volume = self.playback.initial_volume;
        if !(0.0..=1.0).contains(&volume) {
            return Err(CliError::Config(format!(
                "playback.initial_volume must be between 0 and 1, got {volume}"
            )));
        }

        if self.storage.default_playlist_name.trim().is_empty() {
            return Err(CliError::Config(
                "storage.default_playlist_name cannot be blank".to_string(),
            ));
        }

        Ok(())
    }

    /// Settings for the gateway client
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig::new(self.gateway.url.trim())
            .with_timeout(Duration::from_secs(self.gateway.timeout_secs))
            .with_search_limit(self.gateway.search_limit)
    }

    /// Settings for the playback engine
    pub fn playback_config(&self) -> PlaybackConfig {
        let stream_mode = match self.playback.stream_mode {
            StreamModeSetting::Direct => StreamMode::Direct {
                endpoint: self.gateway.url.trim().trim_end_matches('/').to_string(),
            },
            StreamModeSetting::Resolved => StreamMode::Resolved,
        };

        PlaybackConfig {
            initial_volume: self.playback.initial_volume,
            stream_mode,
            default_playlist_name: self.storage.default_playlist_name.trim().to_string(),
        }
    }
}

// Default values
fn default_gateway() -> GatewaySettings {
    GatewaySettings {
        url: default_gateway_url(),
        search_limit: default_search_limit(),
        timeout_secs: default_timeout_secs(),
    }
}

fn default_gateway_url() -> String {
    resona_gateway_client::DEFAULT_GATEWAY_URL.to_string()
}

fn default_search_limit() -> u32 {
    resona_gateway_client::DEFAULT_SEARCH_LIMIT
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_playback() -> PlaybackSettings {
    PlaybackSettings {
        stream_mode: StreamModeSetting::default(),
        initial_volume: default_initial_volume(),
    }
}

fn default_initial_volume() -> f64 {
    1.0
}

fn default_storage() -> StorageSettings {
    StorageSettings {
        data_dir: default_data_dir(),
        default_playlist_name: default_playlist_name(),
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_playlist_name() -> String {
    "Default".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            gateway: default_gateway(),
            playback: default_playback(),
            storage: default_storage(),
        }
    }
}
