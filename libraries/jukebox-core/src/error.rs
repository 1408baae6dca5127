/// Core error types for Jukebox
use thiserror::Error;

/// Result type alias using `JukeboxError`
pub type Result<T> = std::result::Result<T, JukeboxError>;

/// Domain errors reported back to the command that triggered them
///
/// All of these are local and recoverable. None of them terminates a room's
/// playback loop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JukeboxError {
    /// Source lookup or stream fetch failed; nothing was enqueued
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Queue mutation addressed an index outside `[0, len)`
    #[error("Index {index} is out of range for a queue of {len} tracks")]
    IndexOutOfRange {
        /// Requested 0-based index
        index: usize,
        /// Queue length at the time of the request
        len: usize,
    },

    /// Operation needs an active sink but the room has none
    #[error("Not connected to any voice channel")]
    NotConnected,

    /// The voter already has a pending skip vote on the current track
    #[error("You have already voted to skip this song")]
    AlreadyVoted,

    /// Operation needs a current track but nothing is playing
    #[error("Nothing being played at the moment")]
    NothingPlaying,

    /// The room's playback loop has terminated
    #[error("The player for this room has stopped")]
    RoomStopped,

    /// The sink reported a failure for one track
    #[error("Playback error: {0}")]
    Playback(String),
}

impl JukeboxError {
    /// Create a playback error
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Whether this error is informational rather than a failure
    pub fn is_informational(&self) -> bool {
        matches!(self, Self::AlreadyVoted)
    }
}

impl From<SinkError> for JukeboxError {
    fn from(err: SinkError) -> Self {
        match err {
            SinkError::NotConnected => Self::NotConnected,
            other => Self::Playback(other.to_string()),
        }
    }
}

/// Failure of either phase of source resolution
///
/// The `Display` text is shown to the requesting user verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// Phase one found no entry for the query
    #[error("Couldn't find anything that matches `{query}`")]
    NotFound {
        /// The user's search text or URL
        query: String,
    },

    /// Phase two could not produce a direct stream for the candidate
    #[error("Couldn't fetch `{url}`: {reason}")]
    Unfetchable {
        /// Page URL of the candidate
        url: String,
        /// Why the stream could not be produced
        reason: String,
    },

    /// Phase two returned a list in which no entry was usable
    #[error("Couldn't retrieve any matches for `{url}`")]
    NoMatches {
        /// Page URL of the candidate
        url: String,
    },

    /// The extractor backend itself failed (not installed, crashed, bad output)
    #[error("Source backend error: {0}")]
    Backend(String),
}

impl ResolutionError {
    /// Create a not found error
    pub fn not_found(query: impl Into<String>) -> Self {
        Self::NotFound {
            query: query.into(),
        }
    }

    /// Create an unfetchable error
    pub fn unfetchable(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Unfetchable {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a no matches error
    pub fn no_matches(url: impl Into<String>) -> Self {
        Self::NoMatches { url: url.into() }
    }

    /// Create a backend error
    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

/// Errors raised by an audio sink
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// The sink has no live connection to the room's audio channel
    #[error("Not connected to a voice channel")]
    NotConnected,

    /// Encoding or transport failure while playing
    #[error("Audio error: {0}")]
    Audio(String),

    /// The sink dropped the completion signal without reporting an outcome
    #[error("Sink abandoned the track without reporting completion")]
    Abandoned,
}

impl SinkError {
    /// Create an audio error
    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio(msg.into())
    }
}
