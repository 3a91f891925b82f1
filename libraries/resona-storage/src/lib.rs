//! Resona Storage
//!
//! Durability sinks implementing `resona_core::KeyValueStore`.
//!
//! # Stores
//!
//! - **`JsonFileStore`**: one pretty-printed JSON file per key, atomic replace on write
//! - **`MemoryStore`**: shared in-process map for tests and ephemeral sessions
//!
//! # Example
//!
//! ```rust,no_run
//! use resona_core::KeyValueStore;
//! use resona_storage::JsonFileStore;
//! use serde_json::json;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = JsonFileStore::open("./data")?;
//! store.save("currentPlaylistIndex", json!(0))?;
//! assert_eq!(store.load("currentPlaylistIndex")?, Some(json!(0)));
//! # Ok(())
//! # }
//! ```

mod error;
mod json_file;
mod memory;

pub use error::{Result, StorageError};
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
