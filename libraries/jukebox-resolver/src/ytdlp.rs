//! yt-dlp source resolver
//!
//! Both resolution phases run the extractor as a child process and read its
//! single JSON document from stdout. Phase one uses flat extraction, so search
//! results are identified without resolving any stream; phase two fully
//! extracts the chosen page to get a direct media URL.

use crate::config::ResolverConfig;
use crate::error::{summarize_stderr, ExtractorError, Result};
use crate::info::{self, InfoDict};
use async_trait::async_trait;
use jukebox_core::{CandidateInfo, ResolutionError, SourceResolver, Track, UserId};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Resolver backed by a yt-dlp compatible executable
#[derive(Debug, Clone)]
pub struct YtDlpResolver {
    config: ResolverConfig,
}

impl YtDlpResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    fn common_args(&self) -> Vec<String> {
        let mut args = vec![
            "--dump-single-json".to_string(),
            "--no-playlist".to_string(),
            "--no-check-certificates".to_string(),
            "--quiet".to_string(),
            "--no-warnings".to_string(),
        ];
        if !self.config.default_search.is_empty() {
            args.push("--default-search".to_string());
            args.push(self.config.default_search.clone());
        }
        if !self.config.source_address.is_empty() {
            args.push("--source-address".to_string());
            args.push(self.config.source_address.clone());
        }
        args.extend(self.config.extra_args.iter().cloned());
        args
    }

    /// Arguments for the flat candidate lookup
    pub fn candidate_args(&self, query: &str) -> Vec<String> {
        let mut args = self.common_args();
        args.push("--flat-playlist".to_string());
        args.push("--".to_string());
        args.push(query.to_string());
        args
    }

    /// Arguments for the full stream extraction
    pub fn playable_args(&self, page_url: &str) -> Vec<String> {
        let mut args = self.common_args();
        args.push("--format".to_string());
        args.push(self.config.format.clone());
        args.push("--".to_string());
        args.push(page_url.to_string());
        args
    }

    async fn run(&self, args: &[String]) -> Result<Option<InfoDict>> {
        let program = &self.config.program;
        debug!(%program, ?args, "running extractor");

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.config.timeout(), cmd.output())
            .await
            .map_err(|_| ExtractorError::TimedOut {
                program: program.clone(),
                secs: self.config.timeout_secs,
            })?
            .map_err(|source| ExtractorError::Launch {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExtractorError::Failed {
                program: program.clone(),
                status: output.status.to_string(),
                message: summarize_stderr(&output.stderr),
            });
        }

        info::parse_info(&output.stdout)
    }
}

impl Default for YtDlpResolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

#[async_trait]
impl SourceResolver for YtDlpResolver {
    async fn resolve_candidate(
        &self,
        query: &str,
    ) -> std::result::Result<CandidateInfo, ResolutionError> {
        let info = match self.run(&self.candidate_args(query)).await {
            Ok(info) => info,
            Err(ExtractorError::Failed { message, .. }) => {
                debug!(query, %message, "extractor found nothing");
                return Err(ResolutionError::not_found(query));
            }
            Err(err) => {
                warn!(query, error = %err, "candidate lookup failed");
                return Err(ResolutionError::backend(err.to_string()));
            }
        };

        let candidate = info::select_candidate(info, query)?;
        debug!(query, page_url = %candidate.page_url, "candidate selected");
        Ok(candidate)
    }

    async fn fetch_playable(
        &self,
        candidate: &CandidateInfo,
        requester: UserId,
    ) -> std::result::Result<Track, ResolutionError> {
        let page_url = candidate.page_url.as_str();
        let info = match self.run(&self.playable_args(page_url)).await {
            Ok(info) => info,
            Err(ExtractorError::Failed { message, .. }) => {
                debug!(page_url, %message, "stream extraction refused");
                return Err(ResolutionError::unfetchable(page_url, message));
            }
            Err(err) => {
                warn!(page_url, error = %err, "stream extraction failed");
                return Err(ResolutionError::backend(err.to_string()));
            }
        };

        let entry = info::select_playable(info, page_url)?;
        info::into_track(entry, candidate, requester, &self.config.input_args)
    }
}
