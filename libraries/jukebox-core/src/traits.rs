/// Collaborator traits for Jukebox
///
/// The playback core talks to two external systems: the audio sink that streams
/// into a room and the resolver that turns a query into a track. Both are
/// specified only at this boundary.
use crate::completion::CompletionSignal;
use crate::error::{ResolutionError, SinkError};
use crate::types::{CandidateInfo, ChannelId, StreamHandle, Track, UserId};
use async_trait::async_trait;

/// Audio output for one room
///
/// Implementers own the actual encode/transport. A room holds at most one sink
/// at a time and never shares it with another room.
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Start streaming a track at the given volume scalar (0.0-1.0)
    ///
    /// The sink must call [`CompletionSignal::finish`] exactly once when the
    /// track ends, whether it ran out, was stopped, or failed mid-way.
    ///
    /// # Errors
    /// Returns an error if playback could not be started at all. The signal is
    /// dropped in that case and no completion is reported.
    fn start(
        &self,
        stream: StreamHandle,
        volume: f32,
        done: CompletionSignal,
    ) -> Result<(), SinkError>;

    /// Stop the current track; its completion fires with `Ok(())`
    fn stop(&self);

    /// Pause the current track without finishing it
    fn pause(&self);

    /// Resume a paused track
    fn resume(&self);

    /// Whether a track is currently streaming (paused counts as not playing)
    fn is_playing(&self) -> bool;

    /// Whether a track is currently paused
    fn is_paused(&self) -> bool;

    /// Channel the sink is connected to
    fn channel(&self) -> ChannelId;

    /// Move the connection to another channel of the same room
    ///
    /// # Errors
    /// Returns an error if the move fails; the sink stays where it was
    async fn move_to(&self, channel: ChannelId) -> Result<(), SinkError>;

    /// Release the connection; any current track ends
    async fn disconnect(&self);
}

/// Two-phase resolution of a user query into a playable track
///
/// Implementations do network I/O and must never block the scheduler: heavy
/// work goes to a child process or a blocking pool and is awaited.
#[async_trait]
pub trait SourceResolver: Send + Sync {
    /// Phase one: identify a single candidate for free text or a URL
    ///
    /// # Errors
    /// Returns [`ResolutionError::NotFound`] if nothing survives disambiguation
    async fn resolve_candidate(&self, query: &str) -> Result<CandidateInfo, ResolutionError>;

    /// Phase two: resolve the candidate's direct stream and full metadata
    ///
    /// # Errors
    /// Returns [`ResolutionError::Unfetchable`] if no stream can be produced
    async fn fetch_playable(
        &self,
        candidate: &CandidateInfo,
        requester: UserId,
    ) -> Result<Track, ResolutionError>;

    /// Run both phases
    ///
    /// # Errors
    /// Returns the first phase's failure unchanged
    async fn resolve(&self, query: &str, requester: UserId) -> Result<Track, ResolutionError> {
        let candidate = self.resolve_candidate(query).await?;
        self.fetch_playable(&candidate, requester).await
    }
}
