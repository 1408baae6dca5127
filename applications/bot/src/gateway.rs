/// Voice gateway
///
/// The chat platform's side of voice: opening an audio connection into a
/// channel. What comes back is the sink a room streams into.
use async_trait::async_trait;
use jukebox_core::{AudioSink, ChannelId, RoomId, SinkError};
use std::sync::Arc;

#[async_trait]
pub trait VoiceGateway: Send + Sync {
    /// Open an audio connection to `channel` in `room`
    async fn connect(
        &self,
        room: RoomId,
        channel: ChannelId,
    ) -> Result<Arc<dyn AudioSink>, SinkError>;
}
