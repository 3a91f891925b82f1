//! Resona CLI Library
//!
//! Terminal front end for the Resona playback engine: configuration, command
//! parsing, rendering and the interactive session that drives the queue
//! coordinator with a headless output.
//!
//! This library exposes the session components for testing purposes.

pub mod commands;
pub mod config;
pub mod error;
pub mod render;
pub mod session;

// Re-export commonly used types for convenience
pub use commands::Command;
pub use config::{SessionConfig, StreamModeSetting};
pub use error::{CliError, Result};
pub use session::{open_playlists, Reply, Session};
