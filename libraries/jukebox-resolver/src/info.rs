//! Extractor info documents
//!
//! yt-dlp prints one JSON "info dict" per run. A single video comes back as a
//! flat object; searches and playlists come back with an `entries` list whose
//! items may be `null` when an entry failed to extract.

use crate::error::Result;
use jukebox_core::{CandidateInfo, ResolutionError, StreamSource, Track, UserId};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Subset of the extractor's info dict that Jukebox reads
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InfoDict {
    /// `url`, `playlist`, `video` ...
    #[serde(rename = "_type")]
    pub kind: Option<String>,

    pub entries: Option<Vec<Option<InfoDict>>>,

    pub id: Option<String>,

    /// Direct media URL after full extraction, page URL in flat entries
    pub url: Option<String>,

    pub webpage_url: Option<String>,
    pub title: Option<String>,
    pub uploader: Option<String>,
    pub uploader_url: Option<String>,
    pub thumbnail: Option<String>,

    /// Seconds; fractional for some hosts, absent for live streams
    pub duration: Option<f64>,

    /// Song title as tagged by the host (music videos only)
    pub track: Option<String>,
    pub artist: Option<String>,

    pub view_count: Option<u64>,
    pub like_count: Option<u64>,

    pub extractor: Option<String>,
    pub ie_key: Option<String>,

    /// Headers the stream URL must be requested with
    #[serde(default)]
    pub http_headers: BTreeMap<String, String>,
}

/// Parse extractor stdout; `null` or no output means nothing was found
pub fn parse_info(stdout: &[u8]) -> Result<Option<InfoDict>> {
    let text = String::from_utf8_lossy(stdout);
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    Ok(serde_json::from_str(text)?)
}

/// Phase one: first usable entry of a flat extraction
pub fn select_candidate(
    info: Option<InfoDict>,
    query: &str,
) -> std::result::Result<CandidateInfo, ResolutionError> {
    let mut info = info.ok_or_else(|| ResolutionError::not_found(query))?;

    let entry = match info.entries.take() {
        Some(entries) => entries
            .into_iter()
            .flatten()
            .next()
            .ok_or_else(|| ResolutionError::not_found(query))?,
        None => info,
    };

    let page_url = entry
        .webpage_url
        .or(entry.url)
        .ok_or_else(|| ResolutionError::not_found(query))?;

    Ok(CandidateInfo {
        page_url,
        title: entry.title,
        extractor: entry.ie_key.or(entry.extractor),
    })
}

/// Phase two: the fully extracted entry, skipping empty list items
pub fn select_playable(
    info: Option<InfoDict>,
    page_url: &str,
) -> std::result::Result<InfoDict, ResolutionError> {
    let mut info = info
        .ok_or_else(|| ResolutionError::unfetchable(page_url, "the extractor returned nothing"))?;

    match info.entries.take() {
        Some(entries) => entries
            .into_iter()
            .flatten()
            .next()
            .ok_or_else(|| ResolutionError::no_matches(page_url)),
        None => Ok(info),
    }
}

/// Build a playable track from a fully extracted entry
pub fn into_track(
    info: InfoDict,
    candidate: &CandidateInfo,
    requester: UserId,
    input_args: &[String],
) -> std::result::Result<Track, ResolutionError> {
    let stream_url = info.url.ok_or_else(|| {
        ResolutionError::unfetchable(&candidate.page_url, "no direct stream URL was returned")
    })?;

    let mut stream = StreamSource::new(stream_url).with_input_args(input_args.iter().cloned());
    stream.http_headers = info.http_headers;

    let page_url = info
        .webpage_url
        .unwrap_or_else(|| candidate.page_url.clone());
    let title = info
        .title
        .or_else(|| candidate.title.clone())
        .unwrap_or_else(|| page_url.clone());

    let mut track = Track::new(title, page_url, stream, requester);
    track.uploader = info.uploader;
    track.uploader_url = info.uploader_url;
    track.thumbnail_url = info.thumbnail;
    track.duration = info
        .duration
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(|secs| Duration::from_secs(secs as u64));
    track.song_title = info.track;
    track.artist = info.artist;
    track.view_count = info.view_count;
    track.like_count = info.like_count;
    Ok(track)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEARCH: &[u8] = include_bytes!("../tests/fixtures/flat_search.json");
    const VIDEO: &[u8] = include_bytes!("../tests/fixtures/full_video.json");

    fn candidate() -> CandidateInfo {
        CandidateInfo::new("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
    }

    #[test]
    fn null_output_is_nothing() {
        assert!(parse_info(b"null\n").unwrap().is_none());
        assert!(parse_info(b"").unwrap().is_none());
        assert!(parse_info(b"{not json").is_err());
    }

    #[test]
    fn candidate_skips_null_entries() {
        let info = parse_info(SEARCH).unwrap();
        let candidate = select_candidate(info, "rick astley").unwrap();

        assert_eq!(
            candidate.page_url,
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
        assert_eq!(
            candidate.title.as_deref(),
            Some("Rick Astley - Never Gonna Give You Up (Official Music Video)")
        );
        assert_eq!(candidate.extractor.as_deref(), Some("Youtube"));
    }

    #[test]
    fn candidate_from_single_video() {
        let info = parse_info(VIDEO).unwrap();
        let candidate = select_candidate(info, "https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(
            candidate.page_url,
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }

    #[test]
    fn empty_search_is_not_found() {
        let info = parse_info(br#"{"_type": "playlist", "entries": [null, null]}"#).unwrap();
        assert_eq!(
            select_candidate(info, "zzzz").unwrap_err(),
            ResolutionError::not_found("zzzz")
        );
        assert_eq!(
            select_candidate(None, "zzzz").unwrap_err(),
            ResolutionError::not_found("zzzz")
        );
    }

    #[test]
    fn playable_list_without_entries_has_no_matches() {
        let info = parse_info(br#"{"_type": "playlist", "entries": [null]}"#).unwrap();
        assert_eq!(
            select_playable(info, "https://example.com/list").unwrap_err(),
            ResolutionError::no_matches("https://example.com/list")
        );
    }

    #[test]
    fn playable_nothing_is_unfetchable() {
        let err = select_playable(None, "https://example.com/v").unwrap_err();
        assert!(matches!(err, ResolutionError::Unfetchable { .. }));
        assert!(err.to_string().starts_with("Couldn't fetch `https://example.com/v`"));
    }

    #[test]
    fn track_carries_full_metadata() {
        let info = select_playable(parse_info(VIDEO).unwrap(), &candidate().page_url).unwrap();
        let args = vec!["-reconnect".to_string(), "1".to_string()];
        let track = into_track(info, &candidate(), UserId::new(9), &args).unwrap();

        assert_eq!(
            track.title,
            "Rick Astley - Never Gonna Give You Up (Official Music Video)"
        );
        assert_eq!(track.uploader.as_deref(), Some("Rick Astley"));
        assert_eq!(track.duration, Some(Duration::from_secs(212)));
        assert_eq!(
            track.formatted_duration().as_deref(),
            Some("3 minutes, 32 seconds")
        );
        assert_eq!(track.song_title.as_deref(), Some("Never Gonna Give You Up"));
        assert_eq!(track.artist.as_deref(), Some("Rick Astley"));
        assert_eq!(track.view_count, Some(1_500_000_000));
        assert_eq!(track.requester, UserId::new(9));
        assert_eq!(
            track.stream.url,
            "https://rr1---sn.googlevideo.com/videoplayback?id=abc&itag=251"
        );
        assert_eq!(track.stream.input_args, args);
        assert_eq!(
            track.stream.http_headers.get("User-Agent").map(String::as_str),
            Some("Mozilla/5.0")
        );
    }

    #[test]
    fn track_without_stream_url_is_unfetchable() {
        let info = InfoDict {
            title: Some("No stream".to_string()),
            ..InfoDict::default()
        };
        let err = into_track(info, &candidate(), UserId::new(1), &[]).unwrap_err();
        assert!(matches!(err, ResolutionError::Unfetchable { .. }));
    }

    #[test]
    fn live_stream_has_no_duration() {
        let info = InfoDict {
            url: Some("https://example.com/live.m3u8".to_string()),
            ..InfoDict::default()
        };
        let track = into_track(info, &candidate(), UserId::new(1), &[]).unwrap();
        assert!(track.duration.is_none());
        assert_eq!(track.title, candidate().page_url);
    }
}
