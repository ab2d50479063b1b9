use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;

use crate::{
    batch::{BatchEvent, BatchRunner},
    executor::Executor,
    resolver::SourceResolver,
    settings::Settings,
    yt::{AudioHandler, Searcher},
};

pub struct BatchRunnerBuilder<S = (), A = ()> {
    settings: Settings,
    searcher: S,
    audio_handler: A,
    concurrency: usize,
    item_timeout: Option<Duration>,
    events: Option<UnboundedSender<BatchEvent>>,
}

impl BatchRunnerBuilder {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            searcher: (),
            audio_handler: (),
            concurrency: 1,
            item_timeout: None,
            events: None,
        }
    }
}

impl<S, A> BatchRunnerBuilder<S, A> {
    pub fn searcher<S2: Searcher + Send + Sync + 'static>(
        self,
        searcher: S2,
    ) -> BatchRunnerBuilder<S2, A> {
        BatchRunnerBuilder {
            settings: self.settings,
            searcher,
            audio_handler: self.audio_handler,
            concurrency: self.concurrency,
            item_timeout: self.item_timeout,
            events: self.events,
        }
    }

    pub fn audio_handler<A2: AudioHandler + Send + Sync + 'static>(
        self,
        audio_handler: A2,
    ) -> BatchRunnerBuilder<S, A2> {
        BatchRunnerBuilder {
            settings: self.settings,
            searcher: self.searcher,
            audio_handler,
            concurrency: self.concurrency,
            item_timeout: self.item_timeout,
            events: self.events,
        }
    }

    /// Number of items processed at the same time; 1 means strictly sequential
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Wall-clock limit per item; an item running over it fails as a download error
    pub fn item_timeout(mut self, item_timeout: Duration) -> Self {
        self.item_timeout = Some(item_timeout);
        self
    }

    pub fn events(mut self, events: UnboundedSender<BatchEvent>) -> Self {
        self.events = Some(events);
        self
    }
}

impl<S, A> BatchRunnerBuilder<S, A>
where
    S: Searcher + Send + Sync + 'static,
    A: AudioHandler + Send + Sync + 'static,
{
    pub fn build(self) -> BatchRunner<S, A> {
        BatchRunner {
            settings: self.settings,
            resolver: SourceResolver::new(self.searcher),
            executor: Executor::new(self.audio_handler),
            concurrency: self.concurrency,
            item_timeout: self.item_timeout,
            events: self.events,
        }
    }
}
