//! Jukebox - Room Playback
//!
//! Per-room music scheduling for Jukebox.
//!
//! This crate provides:
//! - Track queue (FIFO with remove, shuffle, clear and paging)
//! - Per-room playback loop (idle wait, loop mode, idle timeout)
//! - Volume that applies from the next track on
//! - Skip votes with a configurable threshold
//! - Room events for "now playing" announcements
//! - A director that owns one playback state per room
//!
//! # Architecture
//!
//! `jukebox-playback` knows nothing about chat platforms or media extractors:
//! - Audio output is an [`AudioSink`](jukebox_core::AudioSink) handed in by the caller
//! - Tracks arrive already resolved
//! - Every room loop runs as its own tokio task
//!
//! # Example
//!
//! ```rust,no_run
//! use jukebox_core::{RoomId, StreamSource, Track, UserId};
//! use jukebox_playback::{PlaybackConfig, PlaybackDirector};
//!
//! # async fn demo() -> jukebox_core::Result<()> {
//! let director = PlaybackDirector::new(PlaybackConfig::default());
//! let room = director.get_or_create(RoomId::new(1)).await;
//!
//! // room.connect(sink).await?;
//! let position = room.enqueue(Track::new(
//!     "Song",
//!     "https://example.com/watch?v=1",
//!     StreamSource::new("https://cdn.example.com/1.webm"),
//!     UserId::new(7),
//! ))?;
//! println!("queued at #{position}");
//!
//! director.shutdown_all().await;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod director;
pub mod events;
pub mod queue;
pub mod room;
pub mod types;
pub mod volume;
pub mod votes;

pub use director::PlaybackDirector;
pub use events::{DisconnectReason, RoomEvent};
pub use queue::TrackQueue;
pub use room::RoomPlayback;
pub use types::{PlaybackConfig, PlayerStatus, QueuePage};
pub use volume::Volume;
pub use votes::{SkipVotes, VoteOutcome};
