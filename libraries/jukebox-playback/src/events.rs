//! Room Events
//!
//! Broadcast by a room's playback loop so the command surface can announce
//! what is playing without polling. Events are emitted at key points:
//! - Track started on the sink (every start, including loop replays)
//! - Track ended normally or with a sink error
//! - Room disconnected (explicit stop or idle timeout)
//!
//! Delivery is best-effort: a lagging subscriber misses old events and nobody
//! listening is not an error.

use jukebox_core::{JukeboxError, Track};
use std::sync::Arc;

/// Why a room released its sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    /// A user stopped the room or it was removed from the director
    Stopped,

    /// Nothing was queued within the idle timeout
    IdleTimeout,
}

/// Events emitted by a room's playback loop
#[derive(Debug, Clone)]
pub enum RoomEvent {
    /// A track started streaming
    TrackStarted {
        /// The track now playing
        track: Arc<Track>,
        /// Volume scalar it was started with
        volume: f32,
    },

    /// The sink reported a normal end (natural or forced by skip)
    TrackFinished {
        /// The track that ended
        track: Arc<Track>,
    },

    /// The track could not be started or failed mid-way
    TrackFailed {
        /// The track that failed
        track: Arc<Track>,
        /// What went wrong
        error: JukeboxError,
    },

    /// The room stopped and released its sink
    Disconnected {
        /// Why the room stopped
        reason: DisconnectReason,
    },
}

impl RoomEvent {
    /// Track the event refers to, if any
    pub fn track(&self) -> Option<&Arc<Track>> {
        match self {
            Self::TrackStarted { track, .. }
            | Self::TrackFinished { track }
            | Self::TrackFailed { track, .. } => Some(track),
            Self::Disconnected { .. } => None,
        }
    }
}
