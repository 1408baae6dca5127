/// Bot configuration
use crate::error::{BotError, Result};
use jukebox_playback::PlaybackConfig;
use jukebox_resolver::ResolverConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    #[serde(default = "default_bot")]
    pub bot: BotSettings,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default = "default_console")]
    pub console: ConsoleSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotSettings {
    /// Command prefixes accepted in rooms
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,

    /// Only prefix accepted in direct messages
    #[serde(default = "default_dm_prefix")]
    pub dm_prefix: String,
}

/// Identity used by the local console transport
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_room_id")]
    pub room_id: u64,

    #[serde(default = "default_user_id")]
    pub user_id: u64,

    /// Voice channel the console user starts in
    #[serde(default = "default_voice_channel")]
    pub voice_channel: Option<u64>,

    #[serde(default = "default_can_manage")]
    pub can_manage: bool,

    /// How long the simulated sink "plays" each track
    #[serde(default = "default_simulated_track_secs")]
    pub simulated_track_secs: u64,
}

impl BotConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `jukebox.toml` in the working
    /// directory is used when present. `JUKEBOX_` variables override both,
    /// with `__` between sections (`JUKEBOX_PLAYBACK__IDLE_TIMEOUT_SECS=60`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from("jukebox.toml");
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("JUKEBOX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Ok(settings.build()?.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.bot.prefixes.is_empty() || self.bot.prefixes.iter().any(String::is_empty) {
            return Err(BotError::Config(
                "bot.prefixes must contain at least one non-empty prefix".to_string(),
            ));
        }

        if self.bot.dm_prefix.is_empty() {
            return Err(BotError::Config("bot.dm_prefix must not be empty".to_string()));
        }

        if self.playback.idle_timeout_secs == 0 {
            return Err(BotError::Config(
                "playback.idle_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.playback.default_volume > 100 {
            return Err(BotError::Config(format!(
                "playback.default_volume must be between 0 and 100, got {}",
                self.playback.default_volume
            )));
        }

        if self.playback.skip_threshold == 0 || self.playback.queue_page_size == 0 {
            return Err(BotError::Config(
                "playback.skip_threshold and playback.queue_page_size must be at least 1"
                    .to_string(),
            ));
        }

        self.resolver.validate().map_err(BotError::Config)
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bot: default_bot(),
            playback: PlaybackConfig::default(),
            resolver: ResolverConfig::default(),
            console: default_console(),
        }
    }
}

// Default values
fn default_bot() -> BotSettings {
    BotSettings {
        prefixes: default_prefixes(),
        dm_prefix: default_dm_prefix(),
    }
}

fn default_prefixes() -> Vec<String> {
    vec!["/".to_string(), "!".to_string()]
}

fn default_dm_prefix() -> String {
    "?".to_string()
}

fn default_console() -> ConsoleSettings {
    ConsoleSettings {
        room_id: default_room_id(),
        user_id: default_user_id(),
        voice_channel: default_voice_channel(),
        can_manage: default_can_manage(),
        simulated_track_secs: default_simulated_track_secs(),
    }
}

fn default_room_id() -> u64 {
    1
}

fn default_user_id() -> u64 {
    1
}

fn default_voice_channel() -> Option<u64> {
    Some(1)
}

fn default_can_manage() -> bool {
    true
}

fn default_simulated_track_secs() -> u64 {
    30
}
