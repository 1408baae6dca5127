//! Console transport
//!
//! Runs the command surface against stdin/stdout with a simulated voice
//! connection, so the whole bot can be driven locally without a chat platform.
//!
//! Lines starting with a command prefix are commands. Lines starting with `:`
//! change the console identity:
//!
//! ```text
//! :user 7        act as user 7
//! :voice 3       move the user into voice channel 3 (`:voice none` leaves voice)
//! :manage off    drop the manage permission
//! :room 2        send commands to room 2
//! :dm            toggle between room and direct-message origin
//! :quit          exit
//! ```

use crate::command::{CommandParser, Origin};
use crate::config::ConsoleSettings;
use crate::error::Result;
use crate::gateway::VoiceGateway;
use crate::handler::{CommandContext, CommandSurface, Invoker};
use async_trait::async_trait;
use jukebox_core::{
    AudioSink, ChannelId, CompletionSignal, RoomId, SinkError, StreamHandle, UserId,
};
use jukebox_playback::{RoomEvent, RoomPlayback};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

const PAUSE_POLL: Duration = Duration::from_millis(250);

#[derive(Default)]
struct SinkState {
    channel: u64,
    /// Bumped on every start so stale timers do nothing
    generation: u64,
    pending: Option<CompletionSignal>,
    paused: bool,
}

/// Sink that pretends to stream each track for a fixed time
pub struct SimulatedSink {
    track_length: Duration,
    state: Arc<Mutex<SinkState>>,
}

impl SimulatedSink {
    pub fn new(channel: ChannelId, track_length: Duration) -> Self {
        Self {
            track_length,
            state: Arc::new(Mutex::new(SinkState {
                channel: channel.get(),
                ..SinkState::default()
            })),
        }
    }

    fn finish(&self, outcome: std::result::Result<(), SinkError>) {
        let signal = {
            let mut state = self.state.lock();
            state.paused = false;
            state.pending.take()
        };
        if let Some(signal) = signal {
            signal.finish(outcome);
        }
    }
}

#[async_trait]
impl AudioSink for SimulatedSink {
    fn start(
        &self,
        stream: StreamHandle,
        volume: f32,
        done: CompletionSignal,
    ) -> std::result::Result<(), SinkError> {
        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.pending = Some(done);
            state.paused = false;
            state.generation
        };
        info!(url = stream.url(), volume, "simulated stream started");

        let state = Arc::clone(&self.state);
        let length = self.track_length;
        tokio::spawn(async move {
            tokio::time::sleep(length).await;
            loop {
                let signal = {
                    let mut state = state.lock();
                    if state.generation != generation {
                        return;
                    }
                    if state.paused {
                        None
                    } else {
                        state.pending.take()
                    }
                };
                match signal {
                    Some(signal) => {
                        signal.finish(Ok(()));
                        return;
                    }
                    None => tokio::time::sleep(PAUSE_POLL).await,
                }
            }
        });
        Ok(())
    }

    fn stop(&self) {
        self.finish(Ok(()));
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

    async fn move_to(&self, channel: ChannelId) -> std::result::Result<(), SinkError> {
        self.state.lock().channel = channel.get();
        Ok(())
    }

    async fn disconnect(&self) {
        debug!("simulated sink disconnected");
        self.finish(Ok(()));
    }
}

/// Gateway handing out simulated sinks
pub struct SimulatedGateway {
    track_length: Duration,
}

impl SimulatedGateway {
    pub fn new(track_length: Duration) -> Self {
        Self { track_length }
    }
}

#[async_trait]
impl VoiceGateway for SimulatedGateway {
    async fn connect(
        &self,
        room: RoomId,
        channel: ChannelId,
    ) -> std::result::Result<Arc<dyn AudioSink>, SinkError> {
        debug!(%room, %channel, "opening simulated voice connection");
        Ok(Arc::new(SimulatedSink::new(channel, self.track_length)))
    }
}

/// Interactive console session
pub struct ConsoleSession {
    surface: CommandSurface,
    parser: CommandParser,
    context: CommandContext,
    announced: HashMap<RoomId, Weak<RoomPlayback>>,
}

impl ConsoleSession {
    pub fn new(surface: CommandSurface, parser: CommandParser, settings: &ConsoleSettings) -> Self {
        Self {
            surface,
            parser,
            context: CommandContext {
                room: RoomId::new(settings.room_id),
                origin: Origin::Room,
                invoker: Invoker {
                    user_id: UserId::new(settings.user_id),
                    can_manage: settings.can_manage,
                    voice_channel: settings.voice_channel.map(ChannelId::new),
                },
            },
            announced: HashMap::new(),
        }
    }

    /// Read commands from stdin until EOF or `:quit`
    pub async fn run(mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        println!("Jukebox console. Type !help for commands, :quit to exit.");

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(meta) = line.strip_prefix(':') {
                if !self.apply_meta(meta) {
                    break;
                }
                continue;
            }
            self.dispatch(line).await;
        }
        Ok(())
    }

    async fn dispatch(&mut self, line: &str) {
        let Some(parsed) = self.parser.parse(line, self.context.origin) else {
            return;
        };

        let result = match parsed {
            Ok(command) => self.surface.handle(&self.context, command).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(reply) => {
                let text = reply.to_string();
                if !text.is_empty() {
                    println!("{text}");
                }
            }
            Err(err) => {
                if !err.is_informational() {
                    warn!(error = %err, "command failed");
                }
                println!("{err}");
            }
        }

        if let Some(room) = self.surface.director().get(self.context.room).await {
            self.announce(room);
        }
    }

    /// Print "now playing" lines for a room the first time it is seen
    fn announce(&mut self, room: Arc<RoomPlayback>) {
        let seen = self
            .announced
            .get(&room.room_id())
            .and_then(Weak::upgrade)
            .is_some_and(|known| Arc::ptr_eq(&known, &room));
        if seen {
            return;
        }
        self.announced.insert(room.room_id(), Arc::downgrade(&room));

        let mut events = room.subscribe();
        drop(room);
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(RoomEvent::TrackStarted { track, .. }) => println!("Now playing: {track}"),
                    Ok(RoomEvent::TrackFailed { track, error }) => {
                        println!("Couldn't play {track}: {error}");
                    }
                    Ok(RoomEvent::Disconnected { reason }) => {
                        println!("Left the voice channel ({reason:?})");
                        break;
                    }
                    Ok(RoomEvent::TrackFinished { .. }) | Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => break,
                }
            }
        });
    }

    /// Apply a `:` command; returns `false` to quit
    fn apply_meta(&mut self, meta: &str) -> bool {
        let mut parts = meta.split_whitespace();
        let invoker = &mut self.context.invoker;
        match (parts.next(), parts.next()) {
            (Some("quit" | "q"), _) => return false,
            (Some("user"), Some(id)) => match id.parse() {
                Ok(id) => invoker.user_id = UserId::new(id),
                Err(_) => println!("usage: :user <id>"),
            },
            (Some("voice"), Some("none")) => invoker.voice_channel = None,
            (Some("voice"), Some(id)) => match id.parse() {
                Ok(id) => invoker.voice_channel = Some(ChannelId::new(id)),
                Err(_) => println!("usage: :voice <id>|none"),
            },
            (Some("manage"), Some(flag)) => invoker.can_manage = flag == "on",
            (Some("room"), Some(id)) => match id.parse() {
                Ok(id) => self.context.room = RoomId::new(id),
                Err(_) => println!("usage: :room <id>"),
            },
            (Some("dm"), _) => {
                self.context.origin = match self.context.origin {
                    Origin::Room => Origin::Direct,
                    Origin::Direct => Origin::Room,
                };
            }
            _ => println!("unknown console command `:{meta}`"),
        }
        debug!(context = ?self.context, "console identity updated");
        true
    }
}
