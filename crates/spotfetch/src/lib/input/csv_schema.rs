use std::{collections::BTreeMap, io::Read};

use csv::{ReaderBuilder, StringRecord, Trim};

use super::{NormalizedInput, SkippedRow};
use crate::{
    error::{Error, Result},
    types::{TrackRequest, DURATION_MS_KEY},
};

/// Column layouts of the supported CSV inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvSchema {
    /// `name,artist`, header spelled exactly like that
    Generic,
    /// TuneMyMusic export: `Track name`, `Artist name`, `Album`, `Playlist name`, ...
    TuneMyMusic,
    /// Exportify export: `Track Name`, `Artist Name(s)`, `Album Name`, ...
    Exportify,
}

struct Columns {
    track: usize,
    artist: usize,
}

impl CsvSchema {
    fn track_headers(&self) -> &'static [&'static str] {
        match self {
            CsvSchema::Generic => &["name"],
            CsvSchema::TuneMyMusic => &["Track name", "Track Name"],
            CsvSchema::Exportify => &["Track Name"],
        }
    }

    fn artist_headers(&self) -> &'static [&'static str] {
        match self {
            CsvSchema::Generic => &["artist"],
            CsvSchema::TuneMyMusic => &["Artist name", "Artist Name"],
            CsvSchema::Exportify => &["Artist Name(s)", "Artist Names"],
        }
    }

    fn header_matches(&self, header: &str, candidates: &[&str]) -> bool {
        match self {
            CsvSchema::Generic => candidates.contains(&header),
            _ => candidates.iter().any(|c| c.eq_ignore_ascii_case(header)),
        }
    }

    fn locate_columns(&self, headers: &[String]) -> Result<Columns> {
        let find = |candidates: &[&str]| {
            headers
                .iter()
                .position(|h| self.header_matches(h, candidates))
                .ok_or_else(|| {
                    Error::InputFormat(format!(
                        "missing required column '{}' (found: {})",
                        candidates[0],
                        headers.join(",")
                    ))
                })
        };

        Ok(Columns {
            track: find(self.track_headers())?,
            artist: find(self.artist_headers())?,
        })
    }

    fn split_artists<'a>(&self, cell: &'a str) -> Vec<&'a str> {
        match self {
            // Newer exports separate artists with ';', older ones with ','
            CsvSchema::Exportify if cell.contains(';') => cell.split(';').collect(),
            CsvSchema::Exportify => cell.split(',').collect(),
            _ => vec![cell],
        }
    }

    fn keeps_metadata(&self) -> bool {
        !matches!(self, CsvSchema::Generic)
    }

    fn metadata_key(header: &str) -> String {
        match header.to_ascii_lowercase().as_str() {
            "album" | "album name" => "album".into(),
            "isrc" => "isrc".into(),
            "track duration (ms)" | "duration (ms)" => DURATION_MS_KEY.into(),
            "release date" | "album release date" => "release_date".into(),
            "playlist name" => "playlist".into(),
            "track uri" => "track_uri".into(),
            "spotify - id" => "spotify_id".into(),
            _ => header.to_string(),
        }
    }

    /// Reads the whole CSV. A missing required header fails the whole file;
    /// rows with a missing cell are skipped and recorded.
    pub fn read(&self, reader: impl Read) -> Result<NormalizedInput> {
        let mut csv_reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| Error::InputFormat(format!("failed to read CSV header: {e}")))?
            .iter()
            .enumerate()
            .map(|(idx, h)| match idx {
                0 => h.trim_start_matches('\u{feff}').to_string(),
                _ => h.to_string(),
            })
            .collect::<Vec<_>>();
        let columns = self.locate_columns(&headers)?;

        let mut normalized = NormalizedInput::default();
        for (idx, record) in csv_reader.records().enumerate() {
            // header sits on line 1
            let fallback_line = idx as u64 + 2;
            let line = record
                .as_ref()
                .ok()
                .and_then(|r| r.position())
                .map(|p| p.line())
                .unwrap_or(fallback_line);

            let request = record
                .map_err(|e| format!("unreadable record: {e}"))
                .and_then(|record| self.to_request(&record, &headers, &columns));

            match request {
                Ok(request) => normalized.requests.push(request),
                Err(reason) => normalized.skipped.push(SkippedRow { line, reason }),
            }
        }
        Ok(normalized)
    }

    fn to_request(
        &self,
        record: &StringRecord,
        headers: &[String],
        columns: &Columns,
    ) -> std::result::Result<TrackRequest, String> {
        let track = record
            .get(columns.track)
            .filter(|c| !c.is_empty())
            .ok_or("missing track name")?;
        let artists = record
            .get(columns.artist)
            .filter(|c| !c.is_empty())
            .ok_or("missing artist name")?;

        let request = TrackRequest::from_search(track, self.split_artists(artists))
            .ok_or("missing artist name")?;

        if !self.keeps_metadata() {
            return Ok(request);
        }

        let metadata = headers
            .iter()
            .zip(record.iter())
            .enumerate()
            .filter(|(idx, (_, value))| {
                *idx != columns.track && *idx != columns.artist && !value.is_empty()
            })
            .map(|(_, (header, value))| (Self::metadata_key(header), value.to_string()))
            .collect::<BTreeMap<_, _>>();

        Ok(request.with_metadata(metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_csv_row() {
        let content = "name,artist\n\"Song A\",\"Artist X\"\n";
        let normalized = CsvSchema::Generic.read(content.as_bytes()).unwrap();

        assert_eq!(normalized.requests.len(), 1);
        let request = &normalized.requests[0];
        assert_eq!(request.track_name(), Some("Song A"));
        assert_eq!(request.artist_names(), ["Artist X"]);
        assert_eq!(request.direct_source(), None);
        assert!(request.extra_metadata().is_empty());
    }

    #[test]
    fn test_generic_csv_requires_exact_header() {
        for content in ["title,artist\nSong,Artist\n", "Name,Artist\nSong,Artist\n", ""] {
            let err = CsvSchema::Generic.read(content.as_bytes()).unwrap_err();
            assert!(matches!(err, Error::InputFormat(_)), "{content:?}");
        }
    }

    #[test]
    fn test_malformed_row_is_skipped() {
        let content = "name,artist\nSong A,Artist X\nSong B,\nSong C,Artist Z\n";
        let normalized = CsvSchema::Generic.read(content.as_bytes()).unwrap();

        let tracks = normalized
            .requests
            .iter()
            .map(|r| r.track_name().unwrap())
            .collect::<Vec<_>>();
        assert_eq!(tracks, ["Song A", "Song C"]);
        assert_eq!(
            normalized.skipped,
            vec![SkippedRow {
                line: 3,
                reason: "missing artist name".into()
            }]
        );
    }

    #[test]
    fn test_short_row_is_skipped() {
        let content = "name,artist\nSong A\nSong B,Artist Y\n";
        let normalized = CsvSchema::Generic.read(content.as_bytes()).unwrap();
        assert_eq!(normalized.requests.len(), 1);
        assert_eq!(normalized.skipped.len(), 1);
    }

    #[test]
    fn test_tunemymusic_export() {
        let content = "Track name,Artist name,Album,Playlist name,Type,ISRC\n\
                       Song A,Artist X,Album 1,Road trip,Playlist,USRC17607839\n\
                       ,Artist Y,Album 2,Road trip,Playlist,\n";
        let normalized = CsvSchema::TuneMyMusic.read(content.as_bytes()).unwrap();

        assert_eq!(normalized.requests.len(), 1);
        assert_eq!(normalized.skipped[0].reason, "missing track name");

        let request = &normalized.requests[0];
        assert_eq!(request.artist_names(), ["Artist X"]);
        let metadata = request.extra_metadata();
        assert_eq!(metadata.get("album").map(String::as_str), Some("Album 1"));
        assert_eq!(metadata.get("playlist").map(String::as_str), Some("Road trip"));
        assert_eq!(metadata.get("isrc").map(String::as_str), Some("USRC17607839"));
    }

    #[test]
    fn test_tunemymusic_header_spelling_variants() {
        let content = "Track Name,Artist Name\nSong A,Artist X\n";
        let normalized = CsvSchema::TuneMyMusic.read(content.as_bytes()).unwrap();
        assert_eq!(normalized.requests.len(), 1);
    }

    #[test]
    fn test_exportify_comma_separated_artists() {
        let content = "\u{feff}Track URI,\"Track Name\",\"Artist URI(s)\",\"Artist Name(s)\",\"Album Name\",\"Track Duration (ms)\"\n\
                       \"spotify:track:1\",\"Song B\",\"spotify:artist:y,spotify:artist:z\",\"Artist Y,Artist Z\",\"Album 2\",\"201000\"\n";
        let normalized = CsvSchema::Exportify.read(content.as_bytes()).unwrap();

        let request = &normalized.requests[0];
        assert_eq!(request.artist_names(), ["Artist Y", "Artist Z"]);
        assert_eq!(
            request.search_query().as_deref(),
            Some("Song B Artist Y Artist Z")
        );
        assert_eq!(request.expected_duration_secs(), Some(201));

        let metadata = request.extra_metadata();
        assert_eq!(metadata.get("album").map(String::as_str), Some("Album 2"));
        assert_eq!(
            metadata.get("track_uri").map(String::as_str),
            Some("spotify:track:1")
        );
        assert_eq!(
            metadata.get("Artist URI(s)").map(String::as_str),
            Some("spotify:artist:y,spotify:artist:z")
        );
    }

    #[test]
    fn test_exportify_semicolon_separated_artists() {
        let content = "Track URI,Track Name,Album Name,Artist Name(s),Release Date,Duration (ms)\n\
                       spotify:track:2,\"Song, Part 2\",Album 3,\"Tyler, The Creator;Artist Z\",2021-06-25,180000\n";
        let normalized = CsvSchema::Exportify.read(content.as_bytes()).unwrap();

        let request = &normalized.requests[0];
        assert_eq!(request.track_name(), Some("Song, Part 2"));
        assert_eq!(request.artist_names(), ["Tyler, The Creator", "Artist Z"]);
        assert_eq!(
            request.extra_metadata().get("release_date").map(String::as_str),
            Some("2021-06-25")
        );
        assert_eq!(request.expected_duration_secs(), Some(180));
    }

    #[test]
    fn test_exportify_missing_artist_column() {
        let content = "Track Name,Album Name\nSong,Album\n";
        let err = CsvSchema::Exportify.read(content.as_bytes()).unwrap_err();
        assert!(matches!(err, Error::InputFormat(_)));
    }
}
