//! Command surface
//!
//! Checks who may run what, finds the room through the director and maps each
//! command onto one room playback operation.

use crate::command::{Command, Origin, HELP};
use crate::error::{BotError, Result};
use crate::gateway::VoiceGateway;
use crate::lyrics::LyricsQuery;
use crate::reply::{Reaction, Reply};
use jukebox_core::{ChannelId, JukeboxError, RoomId, SourceResolver, UserId};
use jukebox_playback::{PlaybackDirector, RoomPlayback, VoteOutcome};
use std::sync::Arc;
use tracing::{debug, info};

/// Who sent a command, as seen by the chat platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invoker {
    pub user_id: UserId,
    /// Holds the manage-server permission
    pub can_manage: bool,
    /// Voice channel the user is currently in
    pub voice_channel: Option<ChannelId>,
}

/// Where and by whom a command was sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandContext {
    pub room: RoomId,
    pub origin: Origin,
    pub invoker: Invoker,
}

pub struct CommandSurface {
    director: Arc<PlaybackDirector>,
    resolver: Arc<dyn SourceResolver>,
    gateway: Arc<dyn VoiceGateway>,
}

impl CommandSurface {
    pub fn new(
        director: Arc<PlaybackDirector>,
        resolver: Arc<dyn SourceResolver>,
        gateway: Arc<dyn VoiceGateway>,
    ) -> Self {
        Self {
            director,
            resolver,
            gateway,
        }
    }

    pub fn director(&self) -> &Arc<PlaybackDirector> {
        &self.director
    }

    /// Run one command and produce the reply for the invoker
    pub async fn handle(&self, ctx: &CommandContext, command: Command) -> Result<Reply> {
        if command == Command::Help {
            return Ok(Reply::text(HELP));
        }
        if ctx.origin == Origin::Direct {
            return Err(BotError::DirectMessage);
        }

        debug!(room = %ctx.room, user = %ctx.invoker.user_id, command = command.name(), "handling command");

        match command {
            Command::Join => self.join(ctx).await,
            Command::Summon(channel) => self.summon(ctx, channel).await,
            Command::Leave => self.leave(ctx).await,
            Command::Volume(level) => self.volume(ctx, level).await,
            Command::Now => self.now(ctx).await,
            Command::Pause => self.pause(ctx).await,
            Command::Resume => self.resume(ctx).await,
            Command::Stop => self.stop(ctx).await,
            Command::Skip => self.skip(ctx).await,
            Command::Queue(page) => self.queue(ctx, page).await,
            Command::Shuffle => self.shuffle(ctx).await,
            Command::Remove(position) => self.remove(ctx, position).await,
            Command::Loop => self.toggle_loop(ctx).await,
            Command::Play(query) => self.play(ctx, &query).await,
            Command::Lyrics => self.lyrics(ctx).await,
            Command::Help => Ok(Reply::text(HELP)),
        }
    }

    // ===== Checks =====

    fn require_manage(ctx: &CommandContext) -> Result<()> {
        if ctx.invoker.can_manage {
            Ok(())
        } else {
            Err(BotError::Permission)
        }
    }

    /// Invoker must be in voice, and in the bot's channel if it is connected
    async fn ensure_voice(&self, ctx: &CommandContext) -> Result<ChannelId> {
        let channel = ctx.invoker.voice_channel.ok_or(BotError::NotInVoice)?;

        if let Some(room) = self.director.get(ctx.room).await {
            if let Some(sink) = room.sink() {
                if sink.channel() != channel {
                    return Err(BotError::AlreadyInOtherChannel);
                }
            }
        }
        Ok(channel)
    }

    /// Connect the room to `channel`, or move it there if already connected
    async fn connect_to(&self, room: &RoomPlayback, channel: ChannelId) -> Result<()> {
        if room.is_connected() {
            room.move_to(channel).await?;
            debug!(room = %room.room_id(), %channel, "moved voice connection");
            return Ok(());
        }

        let sink = self
            .gateway
            .connect(room.room_id(), channel)
            .await
            .map_err(JukeboxError::from)?;
        room.connect(sink).await?;
        info!(room = %room.room_id(), %channel, "joined voice channel");
        Ok(())
    }

    async fn existing_room(&self, ctx: &CommandContext) -> Option<Arc<RoomPlayback>> {
        self.director.get(ctx.room).await
    }

    // ===== Voice =====

    async fn join(&self, ctx: &CommandContext) -> Result<Reply> {
        let channel = self.ensure_voice(ctx).await?;
        let room = self.director.get_or_create(ctx.room).await;
        self.connect_to(&room, channel).await?;
        Ok(Reply::React(Reaction::Done))
    }

    async fn summon(&self, ctx: &CommandContext, channel: Option<ChannelId>) -> Result<Reply> {
        Self::require_manage(ctx)?;
        let destination = channel.or(ctx.invoker.voice_channel).ok_or_else(|| {
            BotError::usage(
                "You are neither connected to a voice channel nor specified a channel to join.",
            )
        })?;

        let room = self.director.get_or_create(ctx.room).await;
        self.connect_to(&room, destination).await?;
        Ok(Reply::React(Reaction::Done))
    }

    async fn leave(&self, ctx: &CommandContext) -> Result<Reply> {
        Self::require_manage(ctx)?;
        if self.existing_room(ctx).await.is_none() || !self.director.remove(ctx.room).await {
            return Err(JukeboxError::NotConnected.into());
        }
        Ok(Reply::React(Reaction::Done))
    }

    // ===== Playback =====

    async fn volume(&self, ctx: &CommandContext, level: u8) -> Result<Reply> {
        Self::require_manage(ctx)?;
        self.ensure_voice(ctx).await?;

        let room = self.director.get_or_create(ctx.room).await;
        room.set_volume(level);
        Ok(Reply::text(format!(
            "Volume of the player set to {level}%\nThe volume will be applied in the next song."
        )))
    }

    async fn now(&self, ctx: &CommandContext) -> Result<Reply> {
        let room = self
            .existing_room(ctx)
            .await
            .ok_or(JukeboxError::NothingPlaying)?;
        Ok(Reply::NowPlaying(room.now_playing()?))
    }

    async fn pause(&self, ctx: &CommandContext) -> Result<Reply> {
        let paused = match self.existing_room(ctx).await {
            Some(room) => room.pause(),
            None => Err(JukeboxError::NotConnected),
        };
        match paused {
            Ok(true) => Ok(Reply::React(Reaction::PlayPause)),
            Ok(false) => Ok(Reply::Silent),
            Err(JukeboxError::NotConnected) => {
                Ok(Reply::text("Can't pause. No song is being played!"))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn resume(&self, ctx: &CommandContext) -> Result<Reply> {
        let resumed = match self.existing_room(ctx).await {
            Some(room) => room.resume(),
            None => Err(JukeboxError::NotConnected),
        };
        match resumed {
            Ok(true) => Ok(Reply::React(Reaction::PlayPause)),
            Ok(false) => Ok(Reply::text("No music paused!")),
            Err(JukeboxError::NotConnected) => {
                Ok(Reply::text("Can't resume. No song is being played!"))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn stop(&self, ctx: &CommandContext) -> Result<Reply> {
        let stopped = match self.existing_room(ctx).await {
            Some(room) => room.halt(),
            None => false,
        };
        if stopped {
            Ok(Reply::text("🛑 Stopped the music"))
        } else {
            Ok(Reply::text("Cannot stop. Not playing any song right now."))
        }
    }

    async fn skip(&self, ctx: &CommandContext) -> Result<Reply> {
        let outcome = match self.existing_room(ctx).await {
            Some(room) => room.vote_skip(ctx.invoker.user_id),
            None => Err(JukeboxError::NothingPlaying),
        };
        match outcome {
            Ok(VoteOutcome::Skip) => Ok(Reply::React(Reaction::Skip)),
            Ok(VoteOutcome::Counted { votes, required }) => Ok(Reply::text(format!(
                "Skip vote added, currently at **{votes}/{required}**"
            ))),
            Err(JukeboxError::NothingPlaying) => Ok(Reply::text(
                "Cannot skip. Not playing any song right now.",
            )),
            Err(err) => Err(err.into()),
        }
    }

    async fn toggle_loop(&self, ctx: &CommandContext) -> Result<Reply> {
        let room = self
            .existing_room(ctx)
            .await
            .ok_or(JukeboxError::NothingPlaying)?;
        let enabled = room.toggle_loop()?;
        debug!(room = %ctx.room, enabled, "loop toggled");
        Ok(Reply::React(Reaction::Done))
    }

    // ===== Queue =====

    async fn queue(&self, ctx: &CommandContext, page: usize) -> Result<Reply> {
        match self.existing_room(ctx).await {
            Some(room) if room.queue_len() > 0 => Ok(Reply::Queue(room.queue_page(page))),
            _ => Ok(Reply::text("The queue is empty.")),
        }
    }

    async fn shuffle(&self, ctx: &CommandContext) -> Result<Reply> {
        match self.existing_room(ctx).await {
            Some(room) if room.queue_len() > 0 => {
                room.shuffle();
                Ok(Reply::React(Reaction::Done))
            }
            _ => Ok(Reply::text("Cannot shuffle because the queue is empty.")),
        }
    }

    async fn remove(&self, ctx: &CommandContext, position: usize) -> Result<Reply> {
        match self.existing_room(ctx).await {
            Some(room) if room.queue_len() > 0 => {
                let removed = room.remove(position.saturating_sub(1))?;
                debug!(room = %ctx.room, track = %removed.title, position, "removed from queue");
                Ok(Reply::React(Reaction::Done))
            }
            _ => Ok(Reply::text("Cannot remove song because the queue is empty.")),
        }
    }

    async fn play(&self, ctx: &CommandContext, query: &str) -> Result<Reply> {
        let channel = self.ensure_voice(ctx).await?;
        let room = self.director.get_or_create(ctx.room).await;
        if !room.is_connected() {
            self.connect_to(&room, channel).await?;
        }

        let track = self.resolver.resolve(query, ctx.invoker.user_id).await?;
        let announced = Arc::new(track.clone());
        let position = room.enqueue(track)?;
        info!(room = %ctx.room, track = %announced.title, position, "track enqueued");

        Ok(Reply::Enqueued {
            track: announced,
            position,
        })
    }

    async fn lyrics(&self, ctx: &CommandContext) -> Result<Reply> {
        let room = self
            .existing_room(ctx)
            .await
            .ok_or(JukeboxError::NothingPlaying)?;
        let track = room.now_playing()?;

        Ok(match LyricsQuery::for_track(&track) {
            Some(query) => Reply::Lyrics(query),
            None => Reply::text("Couldn't find lyrics for this track!"),
        })
    }
}
