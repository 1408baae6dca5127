//! Room playback state machine
//!
//! One `RoomPlayback` exists per active room. It owns the room's queue and sink
//! and runs a background loop from creation until it stops:
//!
//! ```text
//!            take_next ok                    completion (ok / error / skip)
//!   Idle ───────────────────► Playing ─────────────────────────────┐
//!    ▲  │                        ▲                                  │
//!    │  │ idle timeout,          │ loop on: replay current track    │
//!    │  │ loop off               └──────────────────────────────────┤
//!    │  ▼                                                           │
//!    │ Stopped ◄── stop() ── (any state)                            │
//!    └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pause and resume are sink operations and do not move the state machine.
//! Commands never wait on the loop: every operation here is either
//! synchronous or awaits only the sink.

use crate::events::{DisconnectReason, RoomEvent};
use crate::queue::TrackQueue;
use crate::types::{PlaybackConfig, PlayerStatus, QueuePage};
use crate::volume::Volume;
use crate::votes::{SkipVotes, VoteOutcome};
use jukebox_core::{
    AudioSink, ChannelId, CompletionSignal, JukeboxError, Result, RoomId, Track, UserId,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Idle,
    Playing,
    Stopped,
}

struct RoomInner {
    state: LoopState,
    current: Option<Arc<Track>>,
    sink: Option<Arc<dyn AudioSink>>,
    loop_enabled: bool,
    volume: Volume,
    /// Scalar the current track was started with
    effective_volume: Option<f32>,
    votes: SkipVotes,
    /// The sink accepted `current` and has not reported its end yet
    streaming: bool,
    /// A skip arrived while no stream was running; applied after the next start
    skip_pending: bool,
}

impl RoomInner {
    fn is_playing(&self) -> bool {
        self.state == LoopState::Playing && self.sink.is_some() && self.current.is_some()
    }
}

/// Playback state and loop for one room
pub struct RoomPlayback {
    room_id: RoomId,
    config: PlaybackConfig,
    queue: TrackQueue,
    inner: Mutex<RoomInner>,
    events: broadcast::Sender<RoomEvent>,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl RoomPlayback {
    /// Create the room and start its playback loop on the current runtime
    pub fn spawn(room_id: RoomId, config: PlaybackConfig) -> Arc<Self> {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let room = Arc::new(Self {
            room_id,
            queue: TrackQueue::new(),
            inner: Mutex::new(RoomInner {
                state: LoopState::Idle,
                current: None,
                sink: None,
                loop_enabled: false,
                volume: Volume::new(config.default_volume),
                effective_volume: None,
                votes: SkipVotes::new(config.skip_threshold),
                streaming: false,
                skip_pending: false,
            }),
            events,
            cancel: CancellationToken::new(),
            task: Mutex::new(None),
            config,
        });

        let span = info_span!("room", room = %room_id);
        let handle = tokio::spawn(Arc::clone(&room).run().instrument(span));
        *room.task.lock() = Some(handle);
        room
    }

    async fn run(self: Arc<Self>) {
        debug!("playback loop started");
        while let Some(track) = self.next_track().await {
            if !self.play(track).await {
                break;
            }
        }
        debug!("playback loop exited");
    }

    /// Pick what plays next: the current track again in loop mode, otherwise
    /// the queue head. Returns `None` when the loop must exit.
    async fn next_track(&self) -> Option<Arc<Track>> {
        loop {
            {
                let mut inner = self.inner.lock();
                if inner.state == LoopState::Stopped {
                    return None;
                }
                if inner.loop_enabled {
                    if let Some(current) = &inner.current {
                        return Some(Arc::clone(current));
                    }
                }
                inner.state = LoopState::Idle;
                inner.current = None;
                inner.effective_volume = None;
                inner.streaming = false;
                inner.skip_pending = false;
            }

            let wait = tokio::time::timeout(self.config.idle_timeout(), self.queue.take_next());
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => return None,
                taken = wait => {
                    if let Ok(track) = taken {
                        return Some(Arc::new(track));
                    }
                    if self.inner.lock().loop_enabled {
                        debug!("idle timeout elapsed with loop enabled, waiting again");
                        continue;
                    }
                    info!(
                        timeout_secs = self.config.idle_timeout_secs,
                        "nothing queued in time, disconnecting"
                    );
                    self.shutdown(DisconnectReason::IdleTimeout).await;
                    return None;
                }
            }
        }
    }

    /// Start `track` on the sink and wait for it to end.
    /// Returns `false` once the room has been cancelled.
    async fn play(&self, track: Arc<Track>) -> bool {
        let (signal, completion) = CompletionSignal::channel();
        let (sink, volume) = {
            let mut inner = self.inner.lock();
            if inner.state == LoopState::Stopped {
                return false;
            }
            inner.votes.reset();
            inner.current = Some(Arc::clone(&track));
            let volume = inner.volume.scalar();
            inner.effective_volume = Some(volume);
            inner.state = LoopState::Playing;
            (inner.sink.clone(), volume)
        };

        let started = match &sink {
            Some(sink) => sink
                .start(track.open_stream(), volume, signal)
                .map_err(JukeboxError::from),
            None => Err(JukeboxError::NotConnected),
        };
        if let Err(error) = started {
            warn!(track = %track.title, %error, "could not start track");
            self.forget_current(&track);
            self.emit(RoomEvent::TrackFailed { track, error });
            return !self.cancel.is_cancelled();
        }

        let skip_requested = {
            let mut inner = self.inner.lock();
            inner.streaming = true;
            std::mem::take(&mut inner.skip_pending)
        };

        info!(track = %track.title, volume, "now playing");
        self.emit(RoomEvent::TrackStarted {
            track: Arc::clone(&track),
            volume,
        });

        if skip_requested {
            if let Some(sink) = &sink {
                debug!(track = %track.title, "skip arrived during start, stopping");
                sink.stop();
            }
        }

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => false,
            outcome = completion => {
                self.inner.lock().streaming = false;
                match outcome {
                    Ok(()) => {
                        debug!(track = %track.title, "track finished");
                        self.emit(RoomEvent::TrackFinished { track });
                    }
                    Err(err) => {
                        let error = JukeboxError::from(err);
                        warn!(track = %track.title, %error, "track failed");
                        // Failed tracks are not retried, even in loop mode.
                        self.forget_current(&track);
                        self.emit(RoomEvent::TrackFailed { track, error });
                    }
                }
                true
            }
        }
    }

    fn forget_current(&self, track: &Arc<Track>) {
        let mut inner = self.inner.lock();
        if inner
            .current
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, track))
        {
            inner.current = None;
            inner.effective_volume = None;
            inner.streaming = false;
            inner.skip_pending = false;
        }
    }

    fn emit(&self, event: RoomEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Enter `Stopped` once: clear the queue, release the sink, cancel the loop
    async fn shutdown(&self, reason: DisconnectReason) {
        let sink = {
            let mut inner = self.inner.lock();
            if inner.state == LoopState::Stopped {
                return;
            }
            inner.state = LoopState::Stopped;
            inner.current = None;
            inner.effective_volume = None;
            inner.loop_enabled = false;
            inner.votes.reset();
            inner.streaming = false;
            inner.skip_pending = false;
            inner.sink.take()
        };

        self.cancel.cancel();
        let dropped = self.queue.clear();
        if let Some(sink) = sink {
            sink.disconnect().await;
        }

        info!(room = %self.room_id, ?reason, dropped, "room stopped");
        self.emit(RoomEvent::Disconnected { reason });
    }

    /// Stop the room for good and wait for its loop to exit
    ///
    /// Idempotent. After this the room rejects new tracks and sinks.
    pub async fn stop(&self) {
        self.shutdown(DisconnectReason::Stopped).await;

        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(err) = task.await {
                warn!(room = %self.room_id, error = %err, "playback loop ended abnormally");
            }
        }
    }

    // ===== State =====

    /// Room this state belongs to
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    /// Configuration the room was created with
    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Subscribe to room events
    pub fn subscribe(&self) -> broadcast::Receiver<RoomEvent> {
        self.events.subscribe()
    }

    /// Current player status
    pub fn status(&self) -> PlayerStatus {
        let (state, sink) = {
            let inner = self.inner.lock();
            (inner.state, inner.sink.clone())
        };
        match state {
            LoopState::Stopped => PlayerStatus::Stopped,
            LoopState::Idle => PlayerStatus::Idle,
            LoopState::Playing => {
                if sink.is_some_and(|sink| sink.is_paused()) {
                    PlayerStatus::Paused
                } else {
                    PlayerStatus::Playing
                }
            }
        }
    }

    /// Whether the room reached its terminal state
    pub fn is_stopped(&self) -> bool {
        self.inner.lock().state == LoopState::Stopped
    }

    /// Whether a track is current and a sink is attached (paused counts)
    pub fn is_playing(&self) -> bool {
        self.inner.lock().is_playing()
    }

    /// Track currently owned by the loop, if any
    pub fn current(&self) -> Option<Arc<Track>> {
        self.inner.lock().current.clone()
    }

    /// Current track, or `NothingPlaying`
    pub fn now_playing(&self) -> Result<Arc<Track>> {
        let inner = self.inner.lock();
        match &inner.current {
            Some(track) if inner.is_playing() => Ok(Arc::clone(track)),
            _ => Err(JukeboxError::NothingPlaying),
        }
    }

    /// Volume scalar the current track was started with
    pub fn current_effective_volume(&self) -> Option<f32> {
        self.inner.lock().effective_volume
    }

    /// Configured volume level (0-100) for the next track
    pub fn volume(&self) -> u8 {
        self.inner.lock().volume.level()
    }

    /// Set the volume for the next track start (0-100, clamped)
    ///
    /// The track currently playing keeps its volume. Returns the scalar the
    /// next track will start with.
    pub fn set_volume(&self, level: u8) -> f32 {
        let mut inner = self.inner.lock();
        inner.volume.set_level(level);
        debug!(room = %self.room_id, level = inner.volume.level(), "volume set for next track");
        inner.volume.scalar()
    }

    /// Whether the current track replays when it ends
    pub fn loop_enabled(&self) -> bool {
        self.inner.lock().loop_enabled
    }

    /// Turn loop mode on or off
    pub fn set_loop(&self, enabled: bool) {
        self.inner.lock().loop_enabled = enabled;
    }

    /// Flip loop mode for the current track; returns the new setting
    pub fn toggle_loop(&self) -> Result<bool> {
        let mut inner = self.inner.lock();
        if !inner.is_playing() {
            return Err(JukeboxError::NothingPlaying);
        }
        inner.loop_enabled = !inner.loop_enabled;
        Ok(inner.loop_enabled)
    }

    // ===== Sink =====

    /// Sink the room streams into, if connected
    pub fn sink(&self) -> Option<Arc<dyn AudioSink>> {
        self.inner.lock().sink.clone()
    }

    /// Whether a sink is attached
    pub fn is_connected(&self) -> bool {
        self.inner.lock().sink.is_some()
    }

    /// Attach a sink, disconnecting any previous one
    pub async fn connect(&self, sink: Arc<dyn AudioSink>) -> Result<()> {
        let previous = {
            let mut inner = self.inner.lock();
            if inner.state == LoopState::Stopped {
                return Err(JukeboxError::RoomStopped);
            }
            inner.sink.replace(sink)
        };

        if let Some(previous) = previous {
            previous.disconnect().await;
        }
        Ok(())
    }

    /// Move the attached sink to another channel
    pub async fn move_to(&self, channel: ChannelId) -> Result<()> {
        let sink = self.sink().ok_or(JukeboxError::NotConnected)?;
        sink.move_to(channel).await?;
        Ok(())
    }

    /// Pause the sink; `Ok(false)` if nothing was streaming
    pub fn pause(&self) -> Result<bool> {
        let sink = self.sink().ok_or(JukeboxError::NotConnected)?;
        if sink.is_playing() {
            sink.pause();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Resume the sink; `Ok(false)` if nothing was paused
    pub fn resume(&self) -> Result<bool> {
        let sink = self.sink().ok_or(JukeboxError::NotConnected)?;
        if sink.is_paused() {
            sink.resume();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    // ===== Skipping =====

    /// Force the sink to end the current track
    ///
    /// The loop advances through the normal completion path. Votes on the
    /// skipped track are discarded when the next track starts. Returns whether
    /// a track was playing.
    ///
    /// A skip that lands while the sink has nothing running (the loop is
    /// between marking a track current and starting it, or between a loop-mode
    /// end and the replay) is held and applied right after the next start.
    pub fn skip(&self) -> bool {
        let sink = {
            let mut inner = self.inner.lock();
            if !inner.is_playing() {
                return false;
            }
            if !inner.streaming {
                inner.skip_pending = true;
                debug!(room = %self.room_id, "skip held until the track starts");
                return true;
            }
            inner.sink.clone()
        };
        let Some(sink) = sink else {
            return false;
        };

        if sink.is_playing() || sink.is_paused() {
            debug!(room = %self.room_id, "skipping current track");
            sink.stop();
        } else {
            // The sink already ended; the loop has not seen the completion yet
            self.inner.lock().skip_pending = true;
        }
        true
    }

    /// Vote to skip the current track on behalf of `voter`
    pub fn vote_skip(&self, voter: UserId) -> Result<VoteOutcome> {
        let outcome = {
            let mut inner = self.inner.lock();
            let requester = match &inner.current {
                Some(track) if inner.is_playing() => track.requester,
                _ => return Err(JukeboxError::NothingPlaying),
            };
            inner.votes.cast(voter, requester)?
        };

        if outcome == VoteOutcome::Skip {
            self.skip();
        }
        Ok(outcome)
    }

    /// Votes recorded against the current track
    pub fn skip_votes(&self) -> usize {
        self.inner.lock().votes.count()
    }

    /// Stop the music but keep the room: clear the queue, turn loop off and
    /// end the current track. Returns whether a track was playing.
    pub fn halt(&self) -> bool {
        let dropped = self.queue.clear();
        self.set_loop(false);
        debug!(room = %self.room_id, dropped, "halting playback");
        self.skip()
    }

    // ===== Queue =====

    /// Queue of pending tracks
    pub fn queue(&self) -> &TrackQueue {
        &self.queue
    }

    /// Append a track; returns its 1-based position in the queue
    pub fn enqueue(&self, track: Track) -> Result<usize> {
        if self.is_stopped() {
            return Err(JukeboxError::RoomStopped);
        }
        debug!(room = %self.room_id, track = %track.title, "enqueued");
        Ok(self.queue.append(track))
    }

    /// Remove the queued track at a 0-based index
    pub fn remove(&self, index: usize) -> Result<Track> {
        self.queue.remove_at(index)
    }

    /// Shuffle the queued tracks
    pub fn shuffle(&self) {
        self.queue.shuffle();
    }

    /// Number of queued tracks
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// One page (1-based) of the queue listing
    pub fn queue_page(&self, page: usize) -> QueuePage {
        let size = self.config.queue_page_size.max(1);
        let total = self.queue.len();
        let page = page.max(1);
        let first_index = (page - 1).saturating_mul(size);

        QueuePage {
            page,
            pages: total.div_ceil(size).max(1),
            total,
            first_index,
            tracks: self
                .queue
                .peek_range(first_index, first_index.saturating_add(size)),
        }
    }
}

impl Drop for RoomPlayback {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
