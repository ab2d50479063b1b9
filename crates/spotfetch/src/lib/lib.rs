//! # SpotFetch
//!
//! Bulk audio acquisition: playlist exports, CSVs, URL lists and single URLs
//! are normalized into [`TrackRequest`]s, resolved to a fetchable source and
//! downloaded as audio files by a [`BatchRunner`].

mod batch;
mod error;
mod executor;
pub mod input;
pub mod parser;
mod resolver;
pub mod settings;
pub mod tracing;
pub mod types;
pub mod yt;

pub use batch::{
    builder::BatchRunnerBuilder, BatchEvent, BatchReport, BatchRunner, ItemState, Outcome,
    OutcomeStatus,
};
pub use error::{Error, ErrorKind, Result};
pub use executor::Executor;
pub use input::{InputKind, NormalizedInput, SkippedRow};
pub use resolver::SourceResolver;
pub use settings::{AudioFormat, Platform, Settings, SettingsEditor};
pub use types::{ResolvedSource, TrackRequest};
