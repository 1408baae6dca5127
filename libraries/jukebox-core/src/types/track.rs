/// Track domain type
use crate::types::{StreamHandle, StreamSource, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A resolved, playable track
///
/// Created by the source resolver and immutable afterwards. Owned by a room's
/// queue until dequeued, then shared by the room while it is current.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Track title as listed by the media host
    pub title: String,

    /// Uploader or channel name
    pub uploader: Option<String>,

    /// Link to the uploader's page
    pub uploader_url: Option<String>,

    /// Track duration (live streams have none)
    pub duration: Option<Duration>,

    /// Canonical page URL
    pub page_url: String,

    /// Thumbnail image URL
    pub thumbnail_url: Option<String>,

    /// Song title from music metadata, used for lyrics lookup
    pub song_title: Option<String>,

    /// Artist from music metadata, used for lyrics lookup
    pub artist: Option<String>,

    /// View count if the host reports it
    pub view_count: Option<u64>,

    /// Like count if the host reports it
    pub like_count: Option<u64>,

    /// Where the audio comes from
    pub stream: StreamSource,

    /// User who queued the track
    pub requester: UserId,
}

impl Track {
    /// Create a new track with minimal metadata
    pub fn new(
        title: impl Into<String>,
        page_url: impl Into<String>,
        stream: StreamSource,
        requester: UserId,
    ) -> Self {
        Self {
            title: title.into(),
            uploader: None,
            uploader_url: None,
            duration: None,
            page_url: page_url.into(),
            thumbnail_url: None,
            song_title: None,
            artist: None,
            view_count: None,
            like_count: None,
            stream,
            requester,
        }
    }

    /// Open a fresh single-use handle for one playback start
    pub fn open_stream(&self) -> StreamHandle {
        StreamHandle::open(&self.stream)
    }

    /// Human-readable duration, `None` for live or unknown lengths
    pub fn formatted_duration(&self) -> Option<String> {
        self.duration.map(|d| format_duration(d.as_secs()))
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.uploader {
            Some(uploader) => write!(f, "{} by {}", self.title, uploader),
            None => f.write_str(&self.title),
        }
    }
}

/// Format a duration in seconds as "1 days, 2 hours, 3 minutes, 4 seconds"
///
/// Zero components are omitted; a zero duration yields an empty string.
pub fn format_duration(total_seconds: u64) -> String {
    let (minutes, seconds) = (total_seconds / 60, total_seconds % 60);
    let (hours, minutes) = (minutes / 60, minutes % 60);
    let (days, hours) = (hours / 24, hours % 24);

    [
        (days, "days"),
        (hours, "hours"),
        (minutes, "minutes"),
        (seconds, "seconds"),
    ]
    .iter()
    .filter(|(value, _)| *value > 0)
    .map(|(value, unit)| format!("{value} {unit}"))
    .collect::<Vec<_>>()
    .join(", ")
}
