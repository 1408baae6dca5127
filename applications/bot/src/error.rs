/// Command surface error types
use jukebox_core::{JukeboxError, ResolutionError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BotError>;

/// Why a command was refused or failed
///
/// `Display` is the text sent back to the user.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("{0}")]
    Usage(String),

    #[error("Command \"{0}\" is not found")]
    UnknownCommand(String),

    #[error("You are missing Manage Server permission(s) to run this command.")]
    Permission,

    #[error("This command can't be used in DM channels.")]
    DirectMessage,

    #[error("You are not connected to any voice channel.")]
    NotInVoice,

    #[error("Bot is already in a voice channel.")]
    AlreadyInOtherChannel,

    #[error("An error occurred while processing this request: {0}")]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Jukebox(#[from] JukeboxError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BotError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Errors that are routine replies rather than failures worth logging
    pub fn is_informational(&self) -> bool {
        match self {
            Self::Jukebox(err) => err.is_informational(),
            Self::Usage(_) | Self::UnknownCommand(_) => true,
            _ => false,
        }
    }
}

impl From<config::ConfigError> for BotError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_failures_are_wrapped_for_the_user() {
        let err = BotError::from(ResolutionError::not_found("zzz"));
        assert_eq!(
            err.to_string(),
            "An error occurred while processing this request: Couldn't find anything that matches `zzz`"
        );
    }

    #[test]
    fn domain_errors_pass_through() {
        let err = BotError::from(JukeboxError::AlreadyVoted);
        assert_eq!(err.to_string(), "You have already voted to skip this song");
        assert!(err.is_informational());
        assert!(!BotError::NotInVoice.is_informational());
    }
}
