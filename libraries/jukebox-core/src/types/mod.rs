mod ids;
mod stream;
mod track;

pub use ids::{ChannelId, RoomId, UserId};
pub use stream::{CandidateInfo, StreamHandle, StreamSource};
pub use track::{format_duration, Track};
