//! Playback director
//!
//! Registry of live rooms. Lookup-or-create and removal are serialized by one
//! async lock so concurrent commands for a room always see the same
//! `RoomPlayback`, and a room being removed is fully stopped before anyone can
//! create its replacement.

use crate::room::RoomPlayback;
use crate::types::PlaybackConfig;
use jukebox_core::RoomId;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Owns one `RoomPlayback` per active room
pub struct PlaybackDirector {
    config: PlaybackConfig,
    rooms: Mutex<HashMap<RoomId, Arc<RoomPlayback>>>,
}

impl PlaybackDirector {
    /// Create a director whose rooms use `config`
    pub fn new(config: PlaybackConfig) -> Self {
        Self {
            config,
            rooms: Mutex::new(HashMap::new()),
        }
    }

    /// Configuration handed to new rooms
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Return the room's playback state, creating and starting it if needed
    ///
    /// A room that stopped on its own (idle timeout) is replaced by a fresh one.
    pub async fn get_or_create(&self, room_id: RoomId) -> Arc<RoomPlayback> {
        let mut rooms = self.rooms.lock().await;

        if let Some(room) = rooms.get(&room_id) {
            if !room.is_stopped() {
                return Arc::clone(room);
            }
            debug!(room = %room_id, "replacing stopped room");
        }

        info!(room = %room_id, "creating room playback");
        let room = RoomPlayback::spawn(room_id, self.config.clone());
        rooms.insert(room_id, Arc::clone(&room));
        room
    }

    /// Look up a room without creating it
    ///
    /// Stopped rooms are reported as absent.
    pub async fn get(&self, room_id: RoomId) -> Option<Arc<RoomPlayback>> {
        self.rooms
            .lock()
            .await
            .get(&room_id)
            .filter(|room| !room.is_stopped())
            .cloned()
    }

    /// Stop a room and forget it. Returns whether a room was registered.
    pub async fn remove(&self, room_id: RoomId) -> bool {
        let mut rooms = self.rooms.lock().await;
        let Some(room) = rooms.remove(&room_id) else {
            return false;
        };

        // Stop under the lock so a concurrent get_or_create waits for the old
        // loop to exit before building a new one.
        room.stop().await;
        info!(room = %room_id, "room removed");
        true
    }

    /// Stop every room
    pub async fn shutdown_all(&self) {
        let mut rooms = self.rooms.lock().await;
        let count = rooms.len();
        for (_, room) in rooms.drain() {
            room.stop().await;
        }
        info!(count, "all rooms stopped");
    }

    /// Number of registered rooms that have not stopped
    pub async fn room_count(&self) -> usize {
        self.rooms
            .lock()
            .await
            .values()
            .filter(|room| !room.is_stopped())
            .count()
    }
}

impl Default for PlaybackDirector {
    fn default() -> Self {
        Self::new(PlaybackConfig::default())
    }
}
