use std::path::PathBuf;

use crate::{
    error::{Error, Result},
    settings::Settings,
    types::ResolvedSource,
    yt::AudioHandler,
};

/// Runs the external download capability for one resolved source.
#[derive(Debug, Clone)]
pub struct Executor<A> {
    audio_handler: A,
}

impl<A: AudioHandler> Executor<A> {
    pub fn new(audio_handler: A) -> Self {
        Self { audio_handler }
    }

    pub fn audio_handler(&self) -> &A {
        &self.audio_handler
    }

    /// Calls the audio handler exactly once. Any failure is reported as
    /// [`Error::Download`].
    #[tracing::instrument(skip_all, fields(url = %source.url))]
    pub async fn acquire(&self, source: &ResolvedSource, settings: &Settings) -> Result<PathBuf> {
        self.audio_handler
            .download(source, settings)
            .await
            .map_err(|e| Error::Download {
                url: source.url.clone(),
                reason: format!("{e:#}"),
            })
    }
}
