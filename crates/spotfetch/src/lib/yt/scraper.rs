use crate::{
    parser::{parse_search_results, SearchPage},
    types::ResolvedSource,
};

/// Searches YouTube by scraping the regular results page.
#[derive(Debug, Clone)]
pub struct Scraper {
    client: reqwest::Client,
    base_url: String,
}

impl Default for Scraper {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

impl Scraper {
    const BASE_URL: &str = "https://www.youtube.com";

    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: Self::BASE_URL.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[tracing::instrument(skip(self))]
    pub async fn search_videos(&self, query: &str) -> anyhow::Result<Vec<ResolvedSource>> {
        let resp = self
            .client
            .get(format!("{}/results", self.base_url))
            .query(&[("search_query", query)])
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            anyhow::bail!("YouTube search returned HTTP {}", resp.status().as_u16());
        }

        let page = SearchPage::new(resp.text().await?);
        let json = page.initial_data::<serde_json::Value>()?;
        let candidates = parse_search_results(&json)?;

        tracing::debug!(count = candidates.len(), "Parsed search results");
        Ok(candidates)
    }
}
