//! Command parsing
//!
//! Turns a chat message into a [`Command`]. Argument validation happens here so
//! room playback only ever sees checked values.

use crate::config::BotSettings;
use crate::error::{BotError, Result};
use jukebox_core::ChannelId;

/// Where a message was sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// A room (server) text channel
    Room,
    /// A direct message to the bot
    Direct,
}

/// A validated user command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Join,
    /// Join an explicit channel, or the invoker's when `None`
    Summon(Option<ChannelId>),
    Leave,
    /// Volume percentage, already checked to be 0-100
    Volume(u8),
    Now,
    Pause,
    Resume,
    Stop,
    Skip,
    /// 1-based page
    Queue(usize),
    Shuffle,
    /// 1-based queue position
    Remove(usize),
    Loop,
    Play(String),
    Lyrics,
    Help,
}

impl Command {
    /// Canonical command name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Join => "join",
            Self::Summon(_) => "summon",
            Self::Leave => "leave",
            Self::Volume(_) => "volume",
            Self::Now => "now",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Stop => "stop",
            Self::Skip => "skip",
            Self::Queue(_) => "queue",
            Self::Shuffle => "shuffle",
            Self::Remove(_) => "remove",
            Self::Loop => "loop",
            Self::Play(_) => "play",
            Self::Lyrics => "lyrics",
            Self::Help => "help",
        }
    }
}

/// Help text listing every command
pub const HELP: &str = "\
Music:
  join    Joins your voice channel.
  leave   Clears the queue and leaves the voice channel.
  loop    Loops the currently playing song.
  lyrics  Get the lyrics of the current song.
  now     Displays the currently playing song.
  pause   Pauses the currently playing song.
  play    Plays a song.
  queue   Shows the player's queue.
  remove  Removes a song from the queue at a given index.
  resume  Resumes a currently paused song.
  shuffle Shuffles the queue.
  skip    Vote to skip a song. The requester can automatically skip.
  stop    Stops playing song and clears the queue.
  summon  Summons the bot to a voice channel.
  volume  Sets the volume of the player.";

/// Prefix-aware command parser
#[derive(Debug, Clone)]
pub struct CommandParser {
    prefixes: Vec<String>,
    dm_prefix: String,
}

impl CommandParser {
    pub fn new(settings: &BotSettings) -> Self {
        Self {
            prefixes: settings.prefixes.clone(),
            dm_prefix: settings.dm_prefix.clone(),
        }
    }

    /// Parse `text`; `None` if the message is not addressed to the bot
    pub fn parse(&self, text: &str, origin: Origin) -> Option<Result<Command>> {
        let body = self.strip_prefix(text.trim_start(), origin)?;
        let (name, args) = match body.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (body, ""),
        };
        if name.is_empty() {
            return None;
        }
        Some(parse_command(&name.to_lowercase(), args))
    }

    fn strip_prefix<'a>(&self, text: &'a str, origin: Origin) -> Option<&'a str> {
        match origin {
            Origin::Direct => text.strip_prefix(self.dm_prefix.as_str()),
            Origin::Room => self
                .prefixes
                .iter()
                .find_map(|prefix| text.strip_prefix(prefix.as_str())),
        }
    }
}

fn parse_command(name: &str, args: &str) -> Result<Command> {
    let command = match name {
        "join" => Command::Join,
        "summon" => Command::Summon(optional_number(args, "channel")?.map(ChannelId::new)),
        "leave" | "disconnect" => Command::Leave,
        "volume" => Command::Volume(parse_volume(args)?),
        "now" | "current" | "playing" => Command::Now,
        "pause" => Command::Pause,
        "resume" => Command::Resume,
        "stop" => Command::Stop,
        "skip" => Command::Skip,
        "queue" => Command::Queue(positive(optional_number(args, "page")?.unwrap_or(1), "page")?),
        "shuffle" => Command::Shuffle,
        "remove" => {
            let index = optional_number(args, "index")?
                .ok_or_else(|| BotError::usage("index is a required argument that is missing."))?;
            Command::Remove(positive(index, "index")?)
        }
        "loop" => Command::Loop,
        "play" => {
            if args.is_empty() {
                return Err(BotError::usage(
                    "search is a required argument that is missing.",
                ));
            }
            Command::Play(args.to_string())
        }
        "lyrics" => Command::Lyrics,
        "help" => Command::Help,
        other => return Err(BotError::UnknownCommand(other.to_string())),
    };
    Ok(command)
}

fn optional_number(args: &str, what: &str) -> Result<Option<u64>> {
    let Some(first) = args.split_whitespace().next() else {
        return Ok(None);
    };
    first
        .parse::<u64>()
        .map(Some)
        .map_err(|_| BotError::usage(format!("Converting to \"int\" failed for parameter \"{what}\".")))
}

fn positive(value: u64, what: &str) -> Result<usize> {
    match usize::try_from(value) {
        Ok(value) if value >= 1 => Ok(value),
        _ => Err(BotError::usage(format!("The {what} must be 1 or greater."))),
    }
}

fn parse_volume(args: &str) -> Result<u8> {
    let raw = args
        .split_whitespace()
        .next()
        .ok_or_else(|| BotError::usage("volume is a required argument that is missing."))?;
    let value: i64 = raw.parse().map_err(|_| {
        BotError::usage("Converting to \"int\" failed for parameter \"volume\".")
    })?;

    u8::try_from(value)
        .ok()
        .filter(|v| *v <= 100)
        .ok_or_else(|| BotError::usage("Volume must be between 0 and 100."))
}
