//! Common test utilities and fixtures
#![allow(dead_code)]

use async_trait::async_trait;
use jukebox_bot::{CommandContext, Invoker, Origin, VoiceGateway};
use jukebox_core::{
    AudioSink, CandidateInfo, ChannelId, CompletionSignal, ResolutionError, RoomId, SinkError,
    SourceResolver, StreamHandle, StreamSource, Track, UserId,
};
use jukebox_playback::RoomPlayback;
use mockall::mock;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ROOM: RoomId = RoomId::new(1);
pub const MEMBER: UserId = UserId::new(10);
pub const OTHER_MEMBER: UserId = UserId::new(11);
pub const VOICE: ChannelId = ChannelId::new(100);
pub const OTHER_VOICE: ChannelId = ChannelId::new(200);

mock! {
    pub Resolver {}

    #[async_trait]
    impl SourceResolver for Resolver {
        async fn resolve_candidate(&self, query: &str) -> Result<CandidateInfo, ResolutionError>;
        async fn fetch_playable(
            &self,
            candidate: &CandidateInfo,
            requester: UserId,
        ) -> Result<Track, ResolutionError>;
    }
}

mock! {
    pub Gateway {}

    #[async_trait]
    impl VoiceGateway for Gateway {
        async fn connect(
            &self,
            room: RoomId,
            channel: ChannelId,
        ) -> Result<Arc<dyn AudioSink>, SinkError>;
    }
}

/// Resolver that finds every query and tags it as a song by "Artist"
pub fn echo_resolver() -> MockResolver {
    let mut resolver = MockResolver::new();
    resolver.expect_resolve_candidate().returning(|query| {
        let mut candidate = CandidateInfo::new(format!("https://example.com/{query}"));
        candidate.title = Some(query.to_string());
        Ok(candidate)
    });
    resolver
        .expect_fetch_playable()
        .returning(|candidate, requester| {
            let title = candidate.title.clone().unwrap_or_default();
            let mut track = Track::new(
                title.clone(),
                candidate.page_url.clone(),
                StreamSource::new(format!("https://cdn.example.com/{title}.webm")),
                requester,
            );
            track.song_title = Some(format!("{title} (Official Video)"));
            track.artist = Some("Artist".to_string());
            Ok(track)
        });
    resolver
}

/// Gateway that expects `connections` connects and hands out `sink`
pub fn gateway_with(sink: Arc<TestSink>, connections: usize) -> MockGateway {
    let mut gateway = MockGateway::new();
    gateway
        .expect_connect()
        .times(connections)
        .returning(move |_, channel| {
            sink.set_channel(channel);
            Ok(Arc::clone(&sink) as Arc<dyn AudioSink>)
        });
    gateway
}

pub fn context(user: UserId, voice: Option<ChannelId>, can_manage: bool) -> CommandContext {
    CommandContext {
        room: ROOM,
        origin: Origin::Room,
        invoker: Invoker {
            user_id: user,
            can_manage,
            voice_channel: voice,
        },
    }
}

/// Wait until the room's loop has started a track
pub async fn wait_until_playing(room: &RoomPlayback) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !room.is_playing() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("room never started playing");
}

#[derive(Default)]
struct SinkState {
    channel: u64,
    started: Vec<String>,
    pending: Option<CompletionSignal>,
    disconnects: usize,
}

/// Sink that records starts and lets the test end tracks
#[derive(Default)]
pub struct TestSink {
    state: Mutex<SinkState>,
}

impl TestSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_channel(&self, channel: ChannelId) {
        self.state.lock().unwrap().channel = channel.get();
    }

    pub fn started(&self) -> Vec<String> {
        self.state.lock().unwrap().started.clone()
    }

    pub fn disconnects(&self) -> usize {
        self.state.lock().unwrap().disconnects
    }

    pub fn finish_current(&self) {
        let signal = self.state.lock().unwrap().pending.take();
        if let Some(signal) = signal {
            signal.finish(Ok(()));
        }
    }
}

#[async_trait]
impl AudioSink for TestSink {
    fn start(
        &self,
        stream: StreamHandle,
        _volume: f32,
        done: CompletionSignal,
    ) -> Result<(), SinkError> {
        let mut state = self.state.lock().unwrap();
        state.started.push(stream.url().to_string());
        state.pending = Some(done);
        Ok(())
    }

    fn stop(&self) {
        self.finish_current();
    }

    fn pause(&self) {}

    fn resume(&self) {}

    fn is_playing(&self) -> bool {
        self.state.lock().unwrap().pending.is_some()
    }

    fn is_paused(&self) -> bool {
        false
    }

    fn channel(&self) -> ChannelId {
        ChannelId::new(self.state.lock().unwrap().channel)
    }

    async fn move_to(&self, channel: ChannelId) -> Result<(), SinkError> {
        self.set_channel(channel);
        Ok(())
    }

    async fn disconnect(&self) {
        self.state.lock().unwrap().disconnects += 1;
        self.finish_current();
    }
}
