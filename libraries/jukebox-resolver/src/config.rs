/// Extractor configuration
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// yt-dlp compatible executable
    #[serde(default = "default_program")]
    pub program: String,

    /// Format selector for the stream phase
    #[serde(default = "default_format")]
    pub format: String,

    /// How free text is searched
    #[serde(default = "default_search")]
    pub default_search: String,

    /// Local address outgoing extractor requests bind to
    #[serde(default = "default_source_address")]
    pub source_address: String,

    /// Seconds each extractor run may take before it is killed
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Options handed to the audio decoder in front of the stream URL
    #[serde(default = "default_input_args")]
    pub input_args: Vec<String>,

    /// Extra arguments appended to every extractor run
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl ResolverConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<(), String> {
        if self.program.trim().is_empty() {
            return Err("resolver.program must not be empty".to_string());
        }
        if self.format.trim().is_empty() {
            return Err("resolver.format must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("resolver.timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            format: default_format(),
            default_search: default_search(),
            source_address: default_source_address(),
            timeout_secs: default_timeout_secs(),
            input_args: default_input_args(),
            extra_args: Vec::new(),
        }
    }
}

fn default_program() -> String {
    "yt-dlp".to_string()
}

fn default_format() -> String {
    "bestaudio/best".to_string()
}

fn default_search() -> String {
    "auto".to_string()
}

fn default_source_address() -> String {
    "0.0.0.0".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_input_args() -> Vec<String> {
    [
        "-reconnect",
        "1",
        "-reconnect_streamed",
        "1",
        "-reconnect_delay_max",
        "5",
    ]
    .iter()
    .map(|arg| (*arg).to_string())
    .collect()
}
