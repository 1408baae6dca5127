//! Jukebox Bot Library
//!
//! Parses prefixed chat commands, checks permissions and voice presence, and
//! drives the per-room playback director. The console transport runs it all
//! locally against a simulated voice connection.

pub mod command;
pub mod config;
pub mod console;
pub mod error;
pub mod gateway;
pub mod handler;
pub mod lyrics;
pub mod reply;

// Re-export commonly used types for convenience
pub use command::{Command, CommandParser, Origin};
pub use config::BotConfig;
pub use error::{BotError, Result};
pub use gateway::VoiceGateway;
pub use handler::{CommandContext, CommandSurface, Invoker};
pub use reply::{Reaction, Reply};
