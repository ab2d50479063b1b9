use std::time::Duration;

use spotfetch::{
    yt::{audio_handler::YtDlpWrapper, searcher::PlatformSearcher},
    BatchReport, BatchRunnerBuilder, InputKind, Result, Settings,
};
use ytdlp_runner::YtDlp;

use crate::terminal;

/// Everything needed to turn one input into downloaded files.
pub struct App {
    yt_dlp: YtDlp,
    concurrency: usize,
    item_timeout: Option<Duration>,
}

impl App {
    pub fn new(yt_dlp: YtDlp, concurrency: usize, item_timeout: Option<Duration>) -> Self {
        Self {
            yt_dlp,
            concurrency,
            item_timeout,
        }
    }

    /// Normalizes `input` and downloads every request it yields, printing
    /// progress as it goes. Only input and settings problems are returned as
    /// errors; failed tracks end up in the report.
    #[tracing::instrument(skip(self, input, settings), fields(input = input.description()))]
    pub async fn acquire(&self, input: InputKind, settings: &Settings) -> Result<BatchReport> {
        terminal::warning(&format!("Reading {}...", input.description()));
        let normalized = input.normalize()?;

        for row in &normalized.skipped {
            terminal::warning(&format!("Skipped line {}: {}", row.line, row.reason));
        }
        if normalized.is_empty() {
            match input {
                InputKind::GenericCsv(_)
                | InputKind::TuneMyMusicCsv(_)
                | InputKind::ExportifyCsv(_) => terminal::warning("No songs found in the CSV file"),
                _ => terminal::warning("Nothing to download"),
            }
            return Ok(BatchReport::default());
        }

        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let mut builder = BatchRunnerBuilder::new(settings.clone())
            .searcher(PlatformSearcher::new(self.yt_dlp.clone()))
            .audio_handler(YtDlpWrapper::new(self.yt_dlp.clone()))
            .concurrency(self.concurrency)
            .events(tx);
        if let Some(item_timeout) = self.item_timeout {
            builder = builder.item_timeout(item_timeout);
        }

        terminal::heading(&format!("Starting download of {} songs...", normalized.requests.len()));
        let (report, ()) = tokio::join!(
            builder.build().run(normalized.requests),
            terminal::print_events(rx)
        );

        let report = report?;
        terminal::print_summary(&report);
        Ok(report)
    }
}
