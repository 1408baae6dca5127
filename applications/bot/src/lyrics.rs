//! Lyrics lookup query
//!
//! Fetching lyrics is left to an external provider; this only builds the
//! search terms from what the extractor tagged on the current track.

use jukebox_core::Track;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

fn bracketed() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"[(\[].*?[)\]]").ok())
        .as_ref()
}

/// Remove `(...)` and `[...]` segments such as "(Remastered 2009)"
pub fn strip_brackets(title: &str) -> String {
    match bracketed() {
        Some(pattern) => pattern.replace_all(title, "").trim().to_string(),
        None => title.trim().to_string(),
    }
}

/// Search terms for a lyrics provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricsQuery {
    pub song: String,
    pub artist: Option<String>,
}

impl LyricsQuery {
    /// Build a query from the track's tagged song title
    ///
    /// Returns `None` when the host did not tag a song title.
    pub fn for_track(track: &Track) -> Option<Self> {
        let song = strip_brackets(track.song_title.as_deref()?);
        if song.is_empty() {
            return None;
        }
        Some(Self {
            song,
            artist: track.artist.clone(),
        })
    }
}

impl fmt::Display for LyricsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.artist {
            Some(artist) => write!(f, "{} {}", self.song, artist),
            None => f.write_str(&self.song),
        }
    }
}
