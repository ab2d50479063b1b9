use std::{
    collections::{HashMap, HashSet},
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};
use spotfetch::{yt::AudioHandler, ResolvedSource, Settings};

#[derive(Clone, Default)]
pub struct MockAudioHandler {
    pub calls: Arc<Mutex<Vec<String>>>,
    /// Source URLs that fail to download
    pub fail_for: HashSet<String>,
    /// Artificial latency per source URL
    pub delays: HashMap<String, Duration>,
}

impl MockAudioHandler {
    pub fn failing_for(url: &str) -> Self {
        Self {
            fail_for: HashSet::from([url.to_string()]),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl AudioHandler for MockAudioHandler {
    async fn download(&self, source: &ResolvedSource, settings: &Settings) -> anyhow::Result<PathBuf> {
        self.calls.lock().unwrap().push(source.url.clone());

        if let Some(delay) = self.delays.get(&source.url) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail_for.contains(&source.url) {
            return Err(anyhow::anyhow!("yt-dlp download failed: Video unavailable"));
        }

        let name = source
            .id
            .clone()
            .unwrap_or_else(|| source.url.rsplit('/').next().unwrap_or("audio").to_string());
        Ok(settings
            .output_path
            .join(format!("{name}.{}", settings.audio_format)))
    }
}
