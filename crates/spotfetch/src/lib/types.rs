use std::collections::BTreeMap;

use itertools::Itertools;

/// Metadata key holding the expected track length in milliseconds
pub const DURATION_MS_KEY: &str = "duration_ms";

/// A single unit of work: either a direct source or a track/artist search.
///
/// Requests can only be built through [`TrackRequest::from_source`] and
/// [`TrackRequest::from_search`], so every request carries a direct source or
/// a track name together with at least one artist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRequest {
    direct_source: Option<String>,
    track_name: Option<String>,
    artist_names: Vec<String>,
    extra_metadata: BTreeMap<String, String>,
}

impl TrackRequest {
    /// Returns `None` when `source` is blank.
    pub fn from_source(source: impl AsRef<str>) -> Option<Self> {
        let source = source.as_ref().trim();
        if source.is_empty() {
            return None;
        }
        Some(Self {
            direct_source: Some(source.to_string()),
            track_name: None,
            artist_names: Vec::new(),
            extra_metadata: BTreeMap::new(),
        })
    }

    /// Returns `None` when the track name is blank or no artist is left after
    /// dropping blank entries. Artist order is kept; the first one is primary.
    pub fn from_search<I, S>(track_name: impl AsRef<str>, artist_names: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let track_name = track_name.as_ref().trim();
        let artist_names = artist_names
            .into_iter()
            .map(|a| a.as_ref().trim().to_string())
            .filter(|a| !a.is_empty())
            .collect::<Vec<_>>();

        if track_name.is_empty() || artist_names.is_empty() {
            return None;
        }
        Some(Self {
            direct_source: None,
            track_name: Some(track_name.to_string()),
            artist_names,
            extra_metadata: BTreeMap::new(),
        })
    }

    pub fn with_metadata(mut self, extra_metadata: BTreeMap<String, String>) -> Self {
        self.extra_metadata = extra_metadata;
        self
    }

    pub fn direct_source(&self) -> Option<&str> {
        self.direct_source.as_deref()
    }

    pub fn track_name(&self) -> Option<&str> {
        self.track_name.as_deref()
    }

    pub fn artist_names(&self) -> &[String] {
        &self.artist_names
    }

    pub fn primary_artist(&self) -> Option<&str> {
        self.artist_names.first().map(String::as_str)
    }

    pub fn extra_metadata(&self) -> &BTreeMap<String, String> {
        &self.extra_metadata
    }

    /// `"<track> <artist 1> <artist 2> ..."`, primary artist first.
    pub fn search_query(&self) -> Option<String> {
        let track_name = self.track_name.as_deref()?;
        Some(
            std::iter::once(track_name)
                .chain(self.artist_names.iter().map(String::as_str))
                .join(" "),
        )
    }

    pub fn expected_duration_secs(&self) -> Option<u64> {
        self.extra_metadata
            .get(DURATION_MS_KEY)
            .and_then(|ms| ms.trim().parse::<u64>().ok())
            .map(|ms| (ms + 500) / 1000)
    }

    /// Identifying text used in progress and failure reports
    pub fn label(&self) -> String {
        match (&self.direct_source, &self.track_name) {
            (Some(source), _) => source.clone(),
            (None, Some(track_name)) => {
                format!("{} by {}", track_name, self.artist_names.iter().join(", "))
            }
            (None, None) => "<empty request>".to_string(),
        }
    }
}

/// A concrete, fetchable reference to a media item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSource {
    pub url: String,
    pub id: Option<String>,
    pub title: Option<String>,
    pub duration_secs: Option<u64>,
}

impl ResolvedSource {
    pub fn direct(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            id: None,
            title: None,
            duration_secs: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_source_rejects_blank() {
        assert!(TrackRequest::from_source("   ").is_none());

        let request = TrackRequest::from_source(" https://youtu.be/abc ").unwrap();
        assert_eq!(request.direct_source(), Some("https://youtu.be/abc"));
        assert_eq!(request.search_query(), None);
        assert_eq!(request.label(), "https://youtu.be/abc");
    }

    #[test]
    fn test_from_search_requires_track_and_artist() {
        assert!(TrackRequest::from_search("Song", Vec::<String>::new()).is_none());
        assert!(TrackRequest::from_search("Song", [" ", ""]).is_none());
        assert!(TrackRequest::from_search(" ", ["Artist"]).is_none());
    }

    #[test]
    fn test_search_query_keeps_primary_artist_first() {
        let request = TrackRequest::from_search("Song B", ["Artist Y", "", "Artist Z"]).unwrap();
        assert_eq!(request.artist_names(), ["Artist Y", "Artist Z"]);
        assert_eq!(request.primary_artist(), Some("Artist Y"));
        assert_eq!(
            request.search_query().as_deref(),
            Some("Song B Artist Y Artist Z")
        );
        assert_eq!(request.label(), "Song B by Artist Y, Artist Z");
    }

    #[test]
    fn test_expected_duration_rounds_to_seconds() {
        let metadata = BTreeMap::from([(DURATION_MS_KEY.to_string(), "201500".to_string())]);
        let request = TrackRequest::from_search("Song", ["Artist"])
            .unwrap()
            .with_metadata(metadata);
        assert_eq!(request.expected_duration_secs(), Some(202));

        let metadata = BTreeMap::from([(DURATION_MS_KEY.to_string(), "n/a".to_string())]);
        let request = request.with_metadata(metadata);
        assert_eq!(request.expected_duration_secs(), None);
    }
}
