//! Command replies
//!
//! What a command sends back. Transports decide how to present it; the
//! `Display` impl is the plain-text rendering the console uses.

use crate::lyrics::LyricsQuery;
use jukebox_core::Track;
use jukebox_playback::QueuePage;
use std::fmt;
use std::sync::Arc;

/// Reaction added to the invoking message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    PlayPause,
    Skip,
    Done,
}

impl Reaction {
    pub fn emoji(self) -> &'static str {
        match self {
            Self::PlayPause => "⏯",
            Self::Skip => "⏭",
            Self::Done => "✅",
        }
    }
}

#[derive(Debug, Clone)]
pub enum Reply {
    /// Nothing to say
    Silent,
    React(Reaction),
    Text(String),
    Enqueued {
        track: Arc<Track>,
        /// 1-based queue position
        position: usize,
    },
    NowPlaying(Arc<Track>),
    Queue(QueuePage),
    Lyrics(LyricsQuery),
}

impl Reply {
    pub fn text(msg: impl Into<String>) -> Self {
        Self::Text(msg.into())
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Silent => Ok(()),
            Self::React(reaction) => f.write_str(reaction.emoji()),
            Self::Text(text) => f.write_str(text),
            Self::Enqueued { track, position } => {
                write!(f, "Enqueued {track} (position {position})")
            }
            Self::NowPlaying(track) => write_now_playing(f, track),
            Self::Queue(page) => write_queue(f, page),
            Self::Lyrics(query) => write!(f, "Lyrics search: {query}"),
        }
    }
}

fn write_now_playing(f: &mut fmt::Formatter<'_>, track: &Track) -> fmt::Result {
    writeln!(f, "Now playing: {}", track.title)?;
    if let Some(duration) = track.formatted_duration() {
        writeln!(f, "  Duration: {duration}")?;
    }
    writeln!(f, "  Requested by: {}", track.requester)?;
    if let Some(uploader) = &track.uploader {
        match &track.uploader_url {
            Some(url) => writeln!(f, "  Uploader: {uploader} ({url})")?,
            None => writeln!(f, "  Uploader: {uploader}")?,
        }
    }
    write!(f, "  URL: {}", track.page_url)
}

fn write_queue(f: &mut fmt::Formatter<'_>, page: &QueuePage) -> fmt::Result {
    writeln!(f, "{} tracks:", page.total)?;
    writeln!(f)?;
    for (offset, track) in page.tracks.iter().enumerate() {
        writeln!(
            f,
            "{}. {} ({})",
            page.first_index + offset + 1,
            track.title,
            track.page_url
        )?;
    }
    write!(f, "Viewing page {}/{}", page.page, page.pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jukebox_core::{StreamSource, UserId};
    use std::time::Duration;

    fn track(title: &str) -> Track {
        Track::new(
            title,
            format!("https://example.com/{title}"),
            StreamSource::new("https://cdn.example.com/a.webm"),
            UserId::new(5),
        )
    }

    #[test]
    fn queue_listing_numbers_from_one() {
        let page = QueuePage {
            page: 2,
            pages: 2,
            total: 12,
            first_index: 10,
            tracks: vec![track("k"), track("l")],
        };
        let text = Reply::Queue(page).to_string();

        assert!(text.starts_with("12 tracks:"));
        assert!(text.contains("11. k (https://example.com/k)"));
        assert!(text.contains("12. l (https://example.com/l)"));
        assert!(text.ends_with("Viewing page 2/2"));
    }

    #[test]
    fn now_playing_shows_metadata() {
        let mut current = track("song");
        current.duration = Some(Duration::from_secs(3725));
        current.uploader = Some("Band".to_string());
        let text = Reply::NowPlaying(Arc::new(current)).to_string();

        assert!(text.contains("Now playing: song"));
        assert!(text.contains("Duration: 1 hours, 2 minutes, 5 seconds"));
        assert!(text.contains("Requested by: 5"));
        assert!(text.contains("Uploader: Band"));
    }

    #[test]
    fn silent_renders_nothing() {
        assert_eq!(Reply::Silent.to_string(), "");
        assert_eq!(Reply::React(Reaction::Skip).to_string(), "⏭");
    }
}
