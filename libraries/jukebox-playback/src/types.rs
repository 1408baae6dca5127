//! Core types for room playback

use jukebox_core::Track;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Observable state of a room's player
///
/// The loop itself only distinguishes idle, playing and stopped; paused is
/// reported from the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    /// No current track, waiting on the queue
    Idle,

    /// A track is streaming to the sink
    Playing,

    /// The sink paused the current track
    Paused,

    /// Terminal: queue cleared, sink released, loop exited
    Stopped,
}

/// One page of the queue listing
#[derive(Debug, Clone)]
pub struct QueuePage {
    /// 1-based page number that was requested
    pub page: usize,

    /// Total number of pages (at least 1)
    pub pages: usize,

    /// Total number of queued tracks
    pub total: usize,

    /// 0-based queue index of the first track on this page
    pub first_index: usize,

    /// Tracks on this page (empty past the last page)
    pub tracks: Vec<Track>,
}

/// Configuration for room playback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Seconds an idle, non-looping room waits for a track before disconnecting (default: 180)
    pub idle_timeout_secs: u64,

    /// Votes from non-requesters needed to skip (default: 1)
    pub skip_threshold: usize,

    /// Initial volume for new rooms (0-100, default: 50)
    pub default_volume: u8,

    /// Tracks per queue listing page (default: 10)
    pub queue_page_size: usize,

    /// Buffered room events per subscriber (default: 32)
    pub event_capacity: usize,
}

impl PlaybackConfig {
    /// Idle timeout as a `Duration`
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 180,
            skip_threshold: 1,
            default_volume: 50,
            queue_page_size: 10,
            event_capacity: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlaybackConfig::default();
        assert_eq!(config.idle_timeout(), Duration::from_secs(180));
        assert_eq!(config.skip_threshold, 1);
        assert_eq!(config.default_volume, 50);
        assert_eq!(config.queue_page_size, 10);
    }
}
