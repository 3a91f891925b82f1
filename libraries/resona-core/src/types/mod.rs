mod ids;
mod playlist;
mod track;

pub use ids::{ResourceLocator, TrackId};
pub use playlist::Playlist;
pub use track::{format_clock, Track, TrackDescriptor, TrackDuration};
