pub mod builder;

use std::{path::PathBuf, time::Duration};

use futures::{stream, StreamExt};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    error::{Error, Result},
    executor::Executor,
    resolver::SourceResolver,
    settings::Settings,
    types::{ResolvedSource, TrackRequest},
    yt::{AudioHandler, Searcher},
};

/// Per-item lifecycle. `ResolutionFailed`, `Failed` and `Succeeded` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Pending,
    Resolving,
    Resolved,
    ResolutionFailed,
    Acquiring,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Success,
    Failure,
}

/// Terminal result for one request of a batch.
#[derive(Debug)]
pub struct Outcome {
    /// 1-based position in the input
    pub index: usize,
    pub status: OutcomeStatus,
    pub request: TrackRequest,
    pub error: Option<Error>,
    pub resolved_source: Option<ResolvedSource>,
    pub output_file: Option<PathBuf>,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        self.status == OutcomeStatus::Success
    }
}

/// Outcomes in input order plus aggregate counts.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<Outcome>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }
}

/// Progress notifications, sent in the order things happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    ItemStarted {
        index: usize,
        total: usize,
        label: String,
    },
    StateChanged {
        index: usize,
        state: ItemState,
    },
    ItemFinished {
        index: usize,
        total: usize,
        label: String,
        /// `None` on success, the short cause otherwise
        error: Option<String>,
        output_file: Option<PathBuf>,
    },
    Completed {
        succeeded: usize,
        failed: usize,
    },
}

/// Resolves and acquires every request of a batch, isolating failures so one
/// bad entry never stops the others.
#[derive(Debug)]
pub struct BatchRunner<S, A>
where
    S: Searcher + Send + Sync + 'static,
    A: AudioHandler + Send + Sync + 'static,
{
    settings: Settings,
    resolver: SourceResolver<S>,
    executor: Executor<A>,
    concurrency: usize,
    item_timeout: Option<Duration>,
    events: Option<UnboundedSender<BatchEvent>>,
}

impl<S, A> BatchRunner<S, A>
where
    S: Searcher + Send + Sync + 'static,
    A: AudioHandler + Send + Sync + 'static,
{
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn emit(&self, event: BatchEvent) {
        if let Some(events) = &self.events {
            // a dropped receiver only means nobody is watching
            let _ = events.send(event);
        }
    }

    fn set_state(&self, index: usize, state: ItemState) {
        tracing::trace!(index, ?state, "Item state changed");
        self.emit(BatchEvent::StateChanged { index, state });
    }

    /// Processes `requests` and returns one outcome per request, in input
    /// order. Only invalid settings make this fail, and only before any item
    /// is attempted.
    #[tracing::instrument(skip_all, fields(total = requests.len()))]
    pub async fn run(self, requests: Vec<TrackRequest>) -> Result<BatchReport> {
        if self.concurrency == 0 {
            return Err(Error::Configuration("concurrency must be at least 1".into()));
        }
        self.settings
            .prepare()
            .inspect_err(|e| tracing::error!(error = %e, "Refusing to start batch"))?;

        let total = requests.len();
        tracing::info!(
            total,
            concurrency = self.concurrency,
            format = %self.settings.audio_format,
            platform = %self.settings.platform,
            "Starting batch"
        );

        // `buffered` starts items in input order and yields outcomes in input
        // order, whatever order they complete in
        let outcomes = stream::iter(requests.into_iter().enumerate())
            .map(|(idx, request)| self.run_item(idx + 1, total, request))
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        let report = BatchReport { outcomes };
        tracing::info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Batch complete"
        );
        self.emit(BatchEvent::Completed {
            succeeded: report.succeeded(),
            failed: report.failed(),
        });

        Ok(report)
    }

    /// Never fails: every error is folded into the returned outcome.
    async fn run_item(&self, index: usize, total: usize, request: TrackRequest) -> Outcome {
        let label = request.label();
        tracing::info!(index, total, "[{index}/{total}] Downloading: {label}");
        self.emit(BatchEvent::ItemStarted {
            index,
            total,
            label: label.clone(),
        });
        self.set_state(index, ItemState::Pending);

        // filled in by `attempt` as soon as resolution succeeds, so it
        // survives a timeout during acquisition
        let mut resolved_source = None;
        let result = match self.item_timeout {
            Some(limit) => {
                tokio::time::timeout(limit, self.attempt(index, &request, &mut resolved_source))
                    .await
                    .unwrap_or_else(|_| {
                        self.set_state(index, ItemState::Failed);
                        Err(Error::Download {
                            url: label.clone(),
                            reason: format!("timed out after {}s", limit.as_secs_f64()),
                        })
                    })
            }
            None => self.attempt(index, &request, &mut resolved_source).await,
        };

        let (status, error, output_file) = match result {
            Ok(path) => {
                tracing::info!(index, path = %path.display(), "Successfully downloaded: {label}");
                (OutcomeStatus::Success, None, Some(path))
            }
            Err(e) => {
                tracing::warn!(index, error = %e, "Failed to download {label}");
                (OutcomeStatus::Failure, Some(e), None)
            }
        };

        self.emit(BatchEvent::ItemFinished {
            index,
            total,
            label,
            error: error.as_ref().map(|e| e.cause().to_string()),
            output_file: output_file.clone(),
        });

        Outcome {
            index,
            status,
            request,
            error,
            resolved_source,
            output_file,
        }
    }

    async fn attempt(
        &self,
        index: usize,
        request: &TrackRequest,
        resolved_source: &mut Option<ResolvedSource>,
    ) -> Result<PathBuf> {
        self.set_state(index, ItemState::Resolving);
        let resolved = match self.resolver.resolve(request, self.settings.platform).await {
            Ok(resolved) => resolved,
            Err(e) => {
                self.set_state(index, ItemState::ResolutionFailed);
                return Err(e);
            }
        };
        self.set_state(index, ItemState::Resolved);

        self.set_state(index, ItemState::Acquiring);
        let resolved = resolved_source.insert(resolved);
        let result = self.executor.acquire(resolved, &self.settings).await;
        self.set_state(
            index,
            match result {
                Ok(_) => ItemState::Succeeded,
                Err(_) => ItemState::Failed,
            },
        );

        result
    }
}
