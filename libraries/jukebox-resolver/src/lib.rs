//! Jukebox - Source Resolution
//!
//! Turns a user's search text or URL into a playable [`Track`](jukebox_core::Track)
//! using a yt-dlp compatible extractor.
//!
//! Resolution runs in two phases (see [`SourceResolver`](jukebox_core::SourceResolver)):
//! 1. Flat lookup picks the first usable entry for the query
//! 2. Full extraction of that entry's page yields the direct stream and metadata
//!
//! # Example
//!
//! ```rust,no_run
//! use jukebox_core::{SourceResolver, UserId};
//! use jukebox_resolver::{ResolverConfig, YtDlpResolver};
//!
//! # async fn demo() -> Result<(), jukebox_core::ResolutionError> {
//! let resolver = YtDlpResolver::new(ResolverConfig::default());
//! let track = resolver.resolve("never gonna give you up", UserId::new(1)).await?;
//! println!("{track} ({})", track.formatted_duration().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod info;
pub mod ytdlp;

pub use config::ResolverConfig;
pub use error::{ExtractorError, Result};
pub use info::InfoDict;
pub use ytdlp::YtDlpResolver;
