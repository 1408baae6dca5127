/// Stream descriptors handed from the resolver to the sink
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where a track's audio can be pulled from
///
/// This is a reusable description. The sink never sees it directly; it gets a
/// [`StreamHandle`] opened from it for each start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamSource {
    /// Direct media URL resolved by the extractor
    pub url: String,

    /// Headers the media host expects (user agent, cookies, referer)
    #[serde(default)]
    pub http_headers: BTreeMap<String, String>,

    /// Extra input arguments for the decoder (reconnect behavior)
    #[serde(default)]
    pub input_args: Vec<String>,
}

impl StreamSource {
    /// Create a source with no extra headers or arguments
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http_headers: BTreeMap::new(),
            input_args: Vec::new(),
        }
    }

    /// Add a request header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.http_headers.insert(name.into(), value.into());
        self
    }

    /// Replace the decoder input arguments
    #[must_use]
    pub fn with_input_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.input_args = args.into_iter().map(Into::into).collect();
        self
    }
}

/// Single-use stream resource consumed by exactly one sink `start`
///
/// Deliberately not `Clone`: once moved into a sink it cannot be replayed.
/// Replays (loop mode) open a new handle from the track's [`StreamSource`].
#[derive(Debug)]
pub struct StreamHandle {
    source: StreamSource,
}

impl StreamHandle {
    pub(crate) fn open(source: &StreamSource) -> Self {
        Self {
            source: source.clone(),
        }
    }

    /// Direct media URL
    pub fn url(&self) -> &str {
        &self.source.url
    }

    /// Request headers for the media host
    pub fn http_headers(&self) -> &BTreeMap<String, String> {
        &self.source.http_headers
    }

    /// Decoder input arguments
    pub fn input_args(&self) -> &[String] {
        &self.source.input_args
    }

    /// Take ownership of the underlying description
    pub fn into_source(self) -> StreamSource {
        self.source
    }
}

/// Provisional identification of a track (phase one of resolution)
///
/// Not yet guaranteed playable: the direct stream is resolved separately and
/// can fail independently (region lock, deleted media).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateInfo {
    /// Canonical page URL used to fetch the playable stream
    pub page_url: String,

    /// Title if the flat listing already carried one
    pub title: Option<String>,

    /// Name of the extractor that recognised the query
    pub extractor: Option<String>,
}

impl CandidateInfo {
    /// Create a candidate for a page URL
    pub fn new(page_url: impl Into<String>) -> Self {
        Self {
            page_url: page_url.into(),
            title: None,
            extractor: None,
        }
    }
}
