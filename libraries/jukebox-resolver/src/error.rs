//! Error types for the extractor process

use thiserror::Error;

/// Result type alias using `ExtractorError`
pub type Result<T> = std::result::Result<T, ExtractorError>;

/// Failures running the extractor or reading its output
///
/// These never reach users directly; the resolver maps them onto
/// `ResolutionError` depending on which phase failed.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// The extractor binary could not be started
    #[error("Failed to launch `{program}`: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The extractor exited unsuccessfully
    #[error("`{program}` exited with {status}: {message}")]
    Failed {
        program: String,
        status: String,
        message: String,
    },

    /// The extractor did not finish in time and was killed
    #[error("`{program}` timed out after {secs}s")]
    TimedOut { program: String, secs: u64 },

    /// Output was not the JSON info document we asked for
    #[error("Failed to parse extractor output: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Last meaningful stderr line, without yt-dlp's `ERROR:` prefix
pub(crate) fn summarize_stderr(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
        .map(|line| line.strip_prefix("ERROR:").unwrap_or(line).trim().to_string())
        .unwrap_or_else(|| "no error output".to_string())
}
