//! Common test utilities and fixtures
#![allow(dead_code)]

use async_trait::async_trait;
use jukebox_core::{
    AudioSink, ChannelId, CompletionSignal, SinkError, StreamHandle, StreamSource, Track, UserId,
};
use jukebox_playback::RoomEvent;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

pub const REQUESTER: UserId = UserId::new(100);

/// Track whose stream URL ends in `<name>.webm`
pub fn track(name: &str, requester: UserId) -> Track {
    Track::new(
        name,
        format!("https://example.com/watch?v={name}"),
        StreamSource::new(format!("https://cdn.example.com/{name}.webm")),
        requester,
    )
}

#[derive(Default)]
struct SinkState {
    started: Vec<(String, f32)>,
    pending: Option<CompletionSignal>,
    paused: bool,
    disconnects: usize,
    channel: u64,
    fail_next_start: bool,
    on_next_start: Option<Box<dyn FnOnce() + Send>>,
}

/// Sink that records what it was asked to play and lets tests end tracks
#[derive(Default)]
pub struct RecordingSink {
    state: Mutex<SinkState>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// URLs of every started stream, in order
    pub fn started_urls(&self) -> Vec<String> {
        self.state
            .lock()
            .started
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    /// Volumes of every start, in order
    pub fn started_volumes(&self) -> Vec<f32> {
        self.state
            .lock()
            .started
            .iter()
            .map(|(_, volume)| *volume)
            .collect()
    }

    pub fn disconnect_count(&self) -> usize {
        self.state.lock().disconnects
    }

    pub fn current_channel(&self) -> u64 {
        self.state.lock().channel
    }

    /// Make the next `start` call fail
    pub fn fail_next_start(&self) {
        self.state.lock().fail_next_start = true;
    }

    /// Run `hook` at the top of the next `start`, before the stream is accepted
    pub fn on_next_start(&self, hook: impl FnOnce() + Send + 'static) {
        self.state.lock().on_next_start = Some(Box::new(hook));
    }

    /// End the current track normally; returns whether one was playing
    pub fn finish_current(&self) -> bool {
        self.complete(Ok(()))
    }

    /// End the current track with a sink error
    pub fn fail_current(&self, reason: &str) -> bool {
        self.complete(Err(SinkError::audio(reason)))
    }

    fn complete(&self, outcome: Result<(), SinkError>) -> bool {
        let signal = {
            let mut state = self.state.lock();
            state.paused = false;
            state.pending.take()
        };
        match signal {
            Some(signal) => {
                signal.finish(outcome);
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl AudioSink for RecordingSink {
    fn start(
        &self,
        stream: StreamHandle,
        volume: f32,
        done: CompletionSignal,
    ) -> Result<(), SinkError> {
        let hook = self.state.lock().on_next_start.take();
        if let Some(hook) = hook {
            hook();
        }

        let mut state = self.state.lock();
        if state.fail_next_start {
            state.fail_next_start = false;
            return Err(SinkError::audio("could not open stream"));
        }
        state.started.push((stream.url().to_string(), volume));
        state.pending = Some(done);
        state.paused = false;
        Ok(())
    }

    fn stop(&self) {
        self.finish_current();
    }

    fn pause(&self) {
        let mut state = self.state.lock();
        if state.pending.is_some() {
            state.paused = true;
        }
    }

    fn resume(&self) {
        self.state.lock().paused = false;
    }

    fn is_playing(&self) -> bool {
        let state = self.state.lock();
        state.pending.is_some() && !state.paused
    }

    fn is_paused(&self) -> bool {
        let state = self.state.lock();
        state.pending.is_some() && state.paused
    }

    fn channel(&self) -> ChannelId {
        ChannelId::new(self.state.lock().channel)
    }

    async fn move_to(&self, channel: ChannelId) -> Result<(), SinkError> {
        self.state.lock().channel = channel.get();
        Ok(())
    }

    async fn disconnect(&self) {
        self.state.lock().disconnects += 1;
        self.finish_current();
    }
}

/// Next room event, failing the test if none arrives within five seconds
pub async fn next_event(events: &mut broadcast::Receiver<RoomEvent>) -> RoomEvent {
    tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("timed out waiting for a room event")
        .expect("room event channel closed")
}

/// Skip events until a track starts; returns its title and volume
pub async fn next_started(events: &mut broadcast::Receiver<RoomEvent>) -> (String, f32) {
    loop {
        if let RoomEvent::TrackStarted { track, volume } = next_event(events).await {
            return (track.title.clone(), volume);
        }
    }
}
