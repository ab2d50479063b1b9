use reqwest::Url;
use ytdlp_runner::{FlatEntry, YtDlp};

use crate::{settings::Platform, types::ResolvedSource, yt::scraper::Scraper, yt::Searcher};

/// Dispatches searches to YouTube (results page scraping) or YouTube Music
/// (yt-dlp listing of the songs tab).
#[derive(Debug, Clone)]
pub struct PlatformSearcher {
    scraper: Scraper,
    yt_dlp: YtDlp,
}

impl PlatformSearcher {
    const MUSIC_SEARCH_URL: &str = "https://music.youtube.com/search";
    const MUSIC_WATCH_URL: &str = "https://music.youtube.com/watch";
    const MAX_CANDIDATES: usize = 5;

    pub fn new(yt_dlp: YtDlp) -> Self {
        Self {
            scraper: Scraper::default(),
            yt_dlp,
        }
    }

    pub fn with_scraper(mut self, scraper: Scraper) -> Self {
        self.scraper = scraper;
        self
    }

    fn music_search_url(query: &str) -> anyhow::Result<Url> {
        let mut url = Url::parse_with_params(Self::MUSIC_SEARCH_URL, &[("q", query)])?;
        url.set_fragment(Some("songs"));
        Ok(url)
    }

    fn music_candidate(entry: FlatEntry) -> ResolvedSource {
        let url = entry
            .url
            .clone()
            .unwrap_or_else(|| format!("{}?v={}", Self::MUSIC_WATCH_URL, entry.id));

        ResolvedSource {
            url,
            duration_secs: entry.duration_secs(),
            title: entry.title,
            id: Some(entry.id),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn search_music(&self, query: &str) -> anyhow::Result<Vec<ResolvedSource>> {
        let url = Self::music_search_url(query)?;
        let entries = self
            .yt_dlp
            .flat_search(url.as_str(), Self::MAX_CANDIDATES, None)
            .await?;

        Ok(entries.into_iter().map(Self::music_candidate).collect())
    }
}

impl Searcher for PlatformSearcher {
    async fn search(&self, query: &str, platform: Platform) -> anyhow::Result<Vec<ResolvedSource>> {
        let mut candidates = match platform {
            Platform::YtMusic => self.search_music(query).await?,
            Platform::YouTube => self.scraper.search_videos(query).await?,
        };
        candidates.truncate(Self::MAX_CANDIDATES);
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_music_search_url_targets_songs_tab() {
        let url = PlatformSearcher::music_search_url("Song B Artist Y & Z").unwrap();
        assert_eq!(
            url.as_str(),
            "https://music.youtube.com/search?q=Song+B+Artist+Y+%26+Z#songs"
        );
    }

    #[test]
    fn test_music_candidate_falls_back_to_watch_url() {
        let entry = FlatEntry {
            id: "abc123".into(),
            url: None,
            title: Some("Song B".into()),
            duration: Some(180.4),
            channel: None,
        };

        let candidate = PlatformSearcher::music_candidate(entry);
        assert_eq!(candidate.url, "https://music.youtube.com/watch?v=abc123");
        assert_eq!(candidate.id.as_deref(), Some("abc123"));
        assert_eq!(candidate.duration_secs, Some(180));
    }
}
