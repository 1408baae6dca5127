/// ID types for Jukebox entities
///
/// Chat platforms hand out numeric snowflakes; these newtypes keep a room id
/// from being passed where a user id is expected.
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! snowflake_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wrap a raw platform id
            pub const fn new(id: u64) -> Self {
                Self(id)
            }

            /// Get the raw platform id
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

snowflake_id!(
    /// Room (guild) identifier; one playback state exists per room
    RoomId
);

snowflake_id!(
    /// User identifier, used for requesters and skip voters
    UserId
);

snowflake_id!(
    /// Audio channel identifier inside a room
    ChannelId
);
