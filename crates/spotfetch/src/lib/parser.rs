//! # Search page parsing
//!
//! Extracts the `ytInitialData` blob embedded in a YouTube results page and
//! turns its video entries into search candidates.

use std::sync::LazyLock;

use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::types::ResolvedSource;

static YT_INITIAL_DATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    regex::Regex::new(r"(?s)<script[^>]*>\s*var\s+ytInitialData\s*=\s*(\{.*?\});\s*</script>")
        .unwrap()
});

pub const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch";

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("{0}")]
    Structure(&'static str),
    #[error("Malformed search data: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoRenderer {
    video_id: String,
    title: Runs,
    length_text: Option<SimpleText>,
    owner_text: Option<Runs>,
}

#[derive(Debug, Deserialize)]
struct Runs {
    #[serde(default)]
    runs: Vec<Run>,
}

#[derive(Debug, Deserialize)]
struct Run {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimpleText {
    simple_text: String,
}

/// Parses the video results of a search page, in page order.
///
/// Entries without a length (live streams, upcoming premieres) are skipped, as
/// are non-video items such as channels, playlists and shelves.
#[tracing::instrument(skip(json))]
pub fn parse_search_results(json: &Value) -> Result<Vec<ResolvedSource>, ParseError> {
    let sections = json["contents"]["twoColumnSearchResultsRenderer"]["primaryContents"]
        ["sectionListRenderer"]["contents"]
        .as_array()
        .ok_or(ParseError::Structure(
            "Failed to get ytInitialData['contents']['twoColumnSearchResultsRenderer']['primaryContents']['sectionListRenderer']['contents']",
        ))?;

    let mut candidates = Vec::new();
    for section in sections {
        let Some(items) = section["itemSectionRenderer"]["contents"].as_array() else {
            continue;
        };

        for item in items {
            let Some(video_renderer) = item.get("videoRenderer") else {
                continue;
            };
            let video_renderer =
                match serde_json::from_value::<VideoRenderer>(video_renderer.clone()) {
                    Ok(video_renderer) => video_renderer,
                    Err(e) => {
                        tracing::debug!(error = %e, "Skipping unreadable videoRenderer");
                        continue;
                    }
                };

            let Some(length_text) = video_renderer.length_text else {
                continue;
            };
            let title = video_renderer
                .title
                .runs
                .into_iter()
                .map(|r| r.text)
                .collect::<String>();

            tracing::trace!(
                video_id = %video_renderer.video_id,
                owner = ?video_renderer.owner_text.as_ref().and_then(|o| o.runs.first()).map(|r| &r.text),
                "Found search candidate"
            );

            candidates.push(ResolvedSource {
                url: format!("{YOUTUBE_WATCH_URL}?v={}", video_renderer.video_id),
                id: Some(video_renderer.video_id),
                title: Some(title),
                duration_secs: parse_duration_to_seconds(&length_text.simple_text),
            });
        }
    }

    Ok(candidates)
}

/// `SS`, `MM:SS` or `HH:MM:SS`. Any non-numeric part makes the whole text
/// unparseable.
pub fn parse_duration_to_seconds(duration_str: &str) -> Option<u64> {
    let parts = duration_str
        .split(':')
        .map(|p| p.trim().parse::<u64>().ok())
        .collect::<Option<Vec<_>>>()?;

    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    parts
        .into_iter()
        .try_fold(0u64, |total, part| total.checked_mul(60)?.checked_add(part))
}

/// Raw HTML of a results page.
pub struct SearchPage(String);

impl SearchPage {
    pub fn new(html: impl Into<String>) -> Self {
        SearchPage(html.into())
    }

    /// Decodes the first `ytInitialData` assignment found in a script tag.
    pub fn initial_data<T>(&self) -> Result<T, ParseError>
    where
        T: DeserializeOwned,
    {
        let blob = YT_INITIAL_DATA_RE
            .captures(&self.0)
            .and_then(|cap| cap.get(1))
            .ok_or(ParseError::Structure("No ytInitialData script in the page"))?;

        Ok(serde_json::from_str(blob.as_str())?)
    }
}
