pub mod audio_handler;
pub mod scraper;
pub mod searcher;

use std::{future::Future, path::PathBuf};

use crate::{
    settings::{Platform, Settings},
    types::ResolvedSource,
};

/// Platform search used to resolve track/artist requests.
pub trait Searcher {
    /// Returns candidates best match first. An empty list means no match.
    fn search(
        &self,
        query: &str,
        platform: Platform,
    ) -> impl Future<Output = anyhow::Result<Vec<ResolvedSource>>> + Send;
}

/// The external download/transcode capability.
pub trait AudioHandler {
    /// Fetches `source` and transcodes it into `settings.audio_format` under
    /// `settings.output_path`, returning the written file. Must not leave
    /// partial files named as complete ones on failure.
    fn download(
        &self,
        source: &ResolvedSource,
        settings: &Settings,
    ) -> impl Future<Output = anyhow::Result<PathBuf>> + Send;
}
