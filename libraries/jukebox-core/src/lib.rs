//! Jukebox Core
//!
//! Platform-agnostic core types, collaborator traits, and error handling for Jukebox.
//!
//! This crate provides the building blocks shared by the playback scheduler,
//! the source resolver and the command surface.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `StreamSource`, `CandidateInfo`, room/user/channel ids
//! - **Collaborator Traits**: `AudioSink` (audio output) and `SourceResolver`
//!   (query to playable track)
//! - **Completion Signal**: the single-shot "track finished" channel between a sink
//!   and the room loop
//! - **Error Handling**: unified `JukeboxError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use jukebox_core::{StreamSource, Track, UserId};
//!
//! let track = Track::new(
//!     "Never Gonna Give You Up",
//!     "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
//!     StreamSource::new("https://cdn.example.com/audio.webm"),
//!     UserId::new(42),
//! );
//!
//! // Every start opens a fresh, single-use handle.
//! let handle = track.open_stream();
//! assert_eq!(handle.url(), "https://cdn.example.com/audio.webm");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod completion;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use completion::{CompletionSignal, TrackCompletion};
pub use error::{JukeboxError, ResolutionError, Result, SinkError};
pub use traits::{AudioSink, SourceResolver};
pub use types::{
    format_duration, CandidateInfo, ChannelId, RoomId, StreamHandle, StreamSource, Track, UserId,
};
