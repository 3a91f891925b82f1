/// Track domain type
use crate::error::{PlayerError, Result};
use crate::types::TrackId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Track length as reported by the backend
///
/// The search endpoint reports a display string (`"3:45"`), the details
/// endpoint a number of seconds. Both are kept as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrackDuration {
    /// Length in seconds
    Seconds(f64),

    /// Display string such as `"3:45"` or `"1:02:03"`
    Display(String),
}

impl TrackDuration {
    /// Length in seconds, if it can be determined
    pub fn as_secs(&self) -> Option<f64> {
        match self {
            Self::Seconds(secs) if secs.is_finite() && *secs >= 0.0 => Some(*secs),
            Self::Seconds(_) => None,
            Self::Display(text) => parse_clock(text),
        }
    }
}

impl fmt::Display for TrackDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Display(text) => write!(f, "{text}"),
            Self::Seconds(secs) => write!(f, "{}", format_clock(*secs)),
        }
    }
}

/// Parse `ss`, `m:ss` or `h:mm:ss` into seconds
fn parse_clock(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let mut total = 0.0;
    let mut parts = 0;
    for part in text.split(':') {
        let value: f64 = part.trim().parse().ok()?;
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        total = total * 60.0 + value;
        parts += 1;
    }

    if parts > 3 {
        return None;
    }
    Some(total)
}

/// Render seconds as `m:ss` (or `h:mm:ss` past an hour)
pub fn format_clock(secs: f64) -> String {
    let total = if secs.is_finite() && secs > 0.0 {
        secs.floor() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Playable track
///
/// Immutable once fetched from the search backend. Persisted playlists store
/// these verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier
    #[serde(alias = "videoId")]
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist names, in credit order
    #[serde(default)]
    pub artists: Vec<String>,

    /// Album name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album: Option<String>,

    /// Track length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<TrackDuration>,

    /// Thumbnail URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl Track {
    /// Create a new track with minimal metadata
    pub fn new(id: impl Into<TrackId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artists: Vec::new(),
            album: None,
            duration: None,
            thumbnail: None,
        }
    }

    /// Set the artist credits
    pub fn with_artists<I, S>(mut self, artists: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.artists = artists.into_iter().map(Into::into).collect();
        self
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: TrackDuration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Two tracks are the same logical track iff their identifiers match
    pub fn same_as(&self, other: &Track) -> bool {
        self.id == other.id
    }

    /// Artist credits joined for display
    pub fn artist_line(&self) -> String {
        self.artists.join(", ")
    }

    /// Duration in seconds, if known
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration.as_ref().and_then(TrackDuration::as_secs)
    }

    /// Reject tracks missing their identifier or title
    pub fn validate(&self) -> Result<()> {
        if self.id.is_blank() {
            return Err(PlayerError::invalid_input("track is missing an id"));
        }
        if self.title.trim().is_empty() {
            return Err(PlayerError::invalid_input(format!(
                "track {} is missing a title",
                self.id
            )));
        }
        Ok(())
    }
}

/// Track as returned by a collaborator, before validation
///
/// Every field is optional so a malformed entry can be reported instead of
/// failing the whole response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackDescriptor {
    #[serde(alias = "videoId")]
    pub id: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub artists: Vec<Option<String>>,
    pub album: Option<String>,
    pub duration: Option<TrackDuration>,
    pub thumbnail: Option<String>,
}

impl TryFrom<TrackDescriptor> for Track {
    type Error = PlayerError;

    fn try_from(raw: TrackDescriptor) -> Result<Self> {
        let id = raw
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| PlayerError::invalid_input("track is missing an id"))?;
        let title = raw
            .title
            .filter(|title| !title.trim().is_empty())
            .ok_or_else(|| PlayerError::invalid_input(format!("track {id} is missing a title")))?;

        Ok(Self {
            id: TrackId::new(id),
            title,
            artists: raw.artists.into_iter().flatten().collect(),
            album: raw.album,
            duration: raw.duration,
            thumbnail: raw.thumbnail,
        })
    }
}
