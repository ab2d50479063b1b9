use crate::{
    error::{Error, Result},
    settings::Platform,
    types::{ResolvedSource, TrackRequest},
    yt::Searcher,
};

/// Turns a request into something the executor can fetch.
#[derive(Debug, Clone)]
pub struct SourceResolver<S> {
    searcher: S,
}

impl<S: Searcher> SourceResolver<S> {
    /// How many of the top results a duration hint may pick from
    const TIE_BREAK_WINDOW: usize = 3;
    const DURATION_TOLERANCE_SECS: u64 = 5;

    pub fn new(searcher: S) -> Self {
        Self { searcher }
    }

    pub fn searcher(&self) -> &S {
        &self.searcher
    }

    /// Direct sources pass through untouched and never reach the searcher.
    #[tracing::instrument(skip(self, request), fields(request = %request.label()))]
    pub async fn resolve(&self, request: &TrackRequest, platform: Platform) -> Result<ResolvedSource> {
        if let Some(source) = request.direct_source() {
            return Ok(ResolvedSource::direct(source));
        }

        let query = request.search_query().ok_or_else(|| Error::Resolution {
            query: request.label(),
            reason: "request has neither a source nor a track to search for".into(),
        })?;

        let candidates = self
            .searcher
            .search(&query, platform)
            .await
            .inspect_err(|e| tracing::error!(error = %e, %query, "Search failed"))
            .map_err(|e| Error::Resolution {
                query: query.clone(),
                reason: format!("search on {} failed: {e:#}", platform.display_name()),
            })?;

        tracing::debug!(count = candidates.len(), %query, "Search returned candidates");

        Self::pick(candidates, request.expected_duration_secs()).ok_or_else(|| Error::Resolution {
            query,
            reason: format!("no results on {}", platform.display_name()),
        })
    }

    /// The top result wins unless a duration hint matches one of the first
    /// few candidates.
    fn pick(candidates: Vec<ResolvedSource>, expected_secs: Option<u64>) -> Option<ResolvedSource> {
        let hinted = expected_secs.and_then(|expected| {
            candidates
                .iter()
                .take(Self::TIE_BREAK_WINDOW)
                .position(|c| {
                    c.duration_secs
                        .is_some_and(|d| d.abs_diff(expected) <= Self::DURATION_TOLERANCE_SECS)
                })
        });

        candidates.into_iter().nth(hinted.unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::BTreeMap,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use super::*;
    use crate::types::DURATION_MS_KEY;

    struct StubSearcher {
        results: Vec<ResolvedSource>,
        calls: AtomicUsize,
    }

    impl StubSearcher {
        fn new(results: Vec<ResolvedSource>) -> Self {
            Self {
                results,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl Searcher for StubSearcher {
        async fn search(&self, _query: &str, _platform: Platform) -> anyhow::Result<Vec<ResolvedSource>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.results.clone())
        }
    }

    fn candidate(id: &str, duration_secs: Option<u64>) -> ResolvedSource {
        ResolvedSource {
            url: format!("https://music.youtube.com/watch?v={id}"),
            id: Some(id.into()),
            title: None,
            duration_secs,
        }
    }

    #[tokio::test]
    async fn test_direct_source_bypasses_search() {
        let resolver = SourceResolver::new(StubSearcher::new(vec![candidate("x", None)]));
        let request = TrackRequest::from_source("https://youtu.be/direct").unwrap();

        let resolved = resolver.resolve(&request, Platform::YouTube).await.unwrap();
        assert_eq!(resolved, ResolvedSource::direct("https://youtu.be/direct"));
        assert_eq!(resolver.searcher().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_top_result_is_picked() {
        let resolver = SourceResolver::new(StubSearcher::new(vec![
            candidate("first", Some(200)),
            candidate("second", Some(201)),
        ]));
        let request = TrackRequest::from_search("Song A", ["Artist X"]).unwrap();

        let resolved = resolver.resolve(&request, Platform::YtMusic).await.unwrap();
        assert_eq!(resolved.id.as_deref(), Some("first"));
        assert_eq!(resolver.searcher().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_no_results_is_resolution_error() {
        let resolver = SourceResolver::new(StubSearcher::new(vec![]));
        let request = TrackRequest::from_search("Song A", ["Artist X"]).unwrap();

        let err = resolver.resolve(&request, Platform::YtMusic).await.unwrap_err();
        match err {
            Error::Resolution { query, .. } => assert_eq!(query, "Song A Artist X"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_duration_hint_breaks_ties_within_window() {
        let candidates = vec![
            candidate("music-video", Some(290)),
            candidate("audio", Some(203)),
            candidate("live", Some(240)),
            candidate("outside-window", Some(201)),
        ];

        let picked = SourceResolver::<StubSearcher>::pick(candidates.clone(), Some(201)).unwrap();
        assert_eq!(picked.id.as_deref(), Some("audio"));

        // no candidate close enough inside the window
        let picked = SourceResolver::<StubSearcher>::pick(candidates[2..].to_vec(), Some(100)).unwrap();
        assert_eq!(picked.id.as_deref(), Some("live"));

        let picked = SourceResolver::<StubSearcher>::pick(candidates, None).unwrap();
        assert_eq!(picked.id.as_deref(), Some("music-video"));
    }

    #[tokio::test]
    async fn test_hint_comes_from_metadata() {
        let resolver = SourceResolver::new(StubSearcher::new(vec![
            candidate("video", Some(260)),
            candidate("track", Some(180)),
        ]));
        let request = TrackRequest::from_search("Song B", ["Artist Y", "Artist Z"])
            .unwrap()
            .with_metadata(BTreeMap::from([(DURATION_MS_KEY.into(), "180400".into())]));

        let resolved = resolver.resolve(&request, Platform::YtMusic).await.unwrap();
        assert_eq!(resolved.id.as_deref(), Some("track"));
    }
}
