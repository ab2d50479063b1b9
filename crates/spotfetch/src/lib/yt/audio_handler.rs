use std::{
    ops::Deref,
    path::{Path, PathBuf},
};

use anyhow::Context;
use tempfile::TempDir;
use ytdlp_runner::YtDlp;

use crate::{settings::Settings, types::ResolvedSource, yt::AudioHandler};

const STAGING_PREFIX: &str = ".spotfetch-";

#[derive(Debug, Clone)]
pub struct YtDlpWrapper(pub YtDlp);

impl YtDlpWrapper {
    pub fn new(yt_dlp: YtDlp) -> Self {
        Self(yt_dlp)
    }
}

impl Deref for YtDlpWrapper {
    type Target = YtDlp;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Per-download working directory inside the output directory. Files only
/// leave it once yt-dlp has finished post-processing, and it is removed when
/// dropped, so an interrupted or failed download leaves nothing behind. Every
/// call gets its own directory, even for the same source.
fn staging_dir(output_path: &Path) -> std::io::Result<TempDir> {
    tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(output_path)
}

impl AudioHandler for YtDlpWrapper {
    #[tracing::instrument(skip(self, settings), fields(url = %source.url))]
    async fn download(&self, source: &ResolvedSource, settings: &Settings) -> anyhow::Result<PathBuf> {
        const OUTPUT_TEMPLATE: &str = "%(title)s [%(id)s].%(ext)s";

        let staging = staging_dir(&settings.output_path).context("Failed to create staging directory")?;
        tracing::debug!(path = %staging.path().display(), "Created staging directory");

        let produced = self
            .download_audio(
                &source.url,
                settings.audio_format.as_str(),
                &staging.path().join(OUTPUT_TEMPLATE),
                settings.cookie_file.as_deref(),
            )
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to download audio"))?;

        if produced.len() > 1 {
            tracing::warn!(count = produced.len(), "yt-dlp produced several files, keeping the last");
        }
        let Some(produced) = produced.last().filter(|p| p.exists()) else {
            anyhow::bail!("yt-dlp did not produce the expected file");
        };

        let file_name = produced
            .file_name()
            .context("yt-dlp reported a path without a file name")?;
        let final_path = settings.output_path.join(file_name);

        tokio::fs::rename(produced, &final_path)
            .await
            .with_context(|| format!("Failed to move audio into {}", final_path.display()))?;

        tracing::debug!(path = %final_path.display(), "Audio written");
        Ok(final_path)
    }
}
