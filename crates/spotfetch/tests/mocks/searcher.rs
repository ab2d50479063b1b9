use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};
use spotfetch::{yt::Searcher, Platform, ResolvedSource};

#[derive(Clone, Default)]
pub struct MockSearcher {
    pub calls: Arc<Mutex<Vec<(String, Platform)>>>,
    /// Queries answered with an empty result list
    pub no_results_for: HashSet<String>,
    pub fail_with: Option<String>,
}

impl MockSearcher {
    pub fn with_no_results_for(query: &str) -> Self {
        Self {
            no_results_for: HashSet::from([query.to_string()]),
            ..Default::default()
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(query, _)| query.clone())
            .collect()
    }
}

pub fn slug(text: &str) -> String {
    text.to_lowercase().replace(' ', "-")
}

impl Searcher for MockSearcher {
    async fn search(&self, query: &str, platform: Platform) -> anyhow::Result<Vec<ResolvedSource>> {
        self.calls
            .lock()
            .unwrap()
            .push((query.to_string(), platform));

        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        if self.no_results_for.contains(query) {
            return Ok(Vec::new());
        }

        let id = slug(query);
        Ok(vec![ResolvedSource {
            url: format!("https://music.youtube.com/watch?v={id}"),
            id: Some(id),
            title: Some(query.to_string()),
            duration_secs: Some(200),
        }])
    }
}
