//! # Input normalization
//!
//! Turns each supported input form into an ordered list of [`TrackRequest`]s.
//! Input order is preserved since it drives download order and progress
//! numbering. Nothing here touches the network.

mod csv_schema;
mod urls;

use std::{
    fs::File,
    io,
    path::{Path, PathBuf},
};

use crate::{
    error::{Error, Result},
    types::TrackRequest,
};

pub use csv_schema::CsvSchema;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// A single video or track URL
    SingleUrl(String),
    /// Text file with one URL per line
    UrlFile(PathBuf),
    /// CSV with a `name,artist` header
    GenericCsv(PathBuf),
    /// TuneMyMusic playlist export
    TuneMyMusicCsv(PathBuf),
    /// Exportify playlist export
    ExportifyCsv(PathBuf),
    /// A track/artist pair typed in by the operator
    SearchQuery { track: String, artist: String },
}

/// A row that could not be turned into a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the source file
    pub line: u64,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedInput {
    pub requests: Vec<TrackRequest>,
    pub skipped: Vec<SkippedRow>,
}

impl NormalizedInput {
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    fn single(request: TrackRequest) -> Self {
        Self {
            requests: vec![request],
            skipped: Vec::new(),
        }
    }
}

impl InputKind {
    pub fn normalize(&self) -> Result<NormalizedInput> {
        normalize(self)
    }

    pub fn description(&self) -> &'static str {
        match self {
            InputKind::SingleUrl(_) => "single URL",
            InputKind::UrlFile(_) => "URL file",
            InputKind::GenericCsv(_) => "custom CSV",
            InputKind::TuneMyMusicCsv(_) => "TuneMyMusic CSV",
            InputKind::ExportifyCsv(_) => "Exportify CSV",
            InputKind::SearchQuery { .. } => "search query",
        }
    }
}

#[tracing::instrument]
pub fn normalize(kind: &InputKind) -> Result<NormalizedInput> {
    let normalized = match kind {
        InputKind::SingleUrl(url) => TrackRequest::from_source(url)
            .map(NormalizedInput::single)
            .ok_or_else(|| Error::InputFormat("URL is empty".into()))?,
        InputKind::SearchQuery { track, artist } => TrackRequest::from_search(track, [artist])
            .map(NormalizedInput::single)
            .ok_or_else(|| {
                Error::InputFormat("both a track name and an artist name are required".into())
            })?,
        InputKind::UrlFile(path) => urls::read_url_list(open(path)?)?,
        InputKind::GenericCsv(path) => CsvSchema::Generic.read(open(path)?)?,
        InputKind::TuneMyMusicCsv(path) => CsvSchema::TuneMyMusic.read(open(path)?)?,
        InputKind::ExportifyCsv(path) => CsvSchema::Exportify.read(open(path)?)?,
    };

    for row in &normalized.skipped {
        tracing::warn!(line = row.line, reason = %row.reason, "Skipped malformed row");
    }
    tracing::info!(
        requests = normalized.requests.len(),
        skipped = normalized.skipped.len(),
        "Normalized input"
    );
    Ok(normalized)
}

fn open(path: &Path) -> Result<File> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::InputFormat(format!("file {} not found", path.display())),
        _ => Error::InputFormat(format!("failed to open {}: {e}", path.display())),
    })?;

    // directories open fine on unix but fail every read
    let is_file = file
        .metadata()
        .map_err(|e| Error::InputFormat(format!("failed to inspect {}: {e}", path.display())))?
        .is_file();
    if !is_file {
        return Err(Error::InputFormat(format!("{} is not a file", path.display())));
    }
    Ok(file)
}
