use std::io::{self, BufRead, BufReader, Read};

use super::{NormalizedInput, SkippedRow};
use crate::{
    error::{Error, Result},
    types::TrackRequest,
};

/// One request per non-empty line; there is no header row.
///
/// A line that is not valid UTF-8 is skipped; any other read error fails the
/// whole file.
pub(super) fn read_url_list(reader: impl Read) -> Result<NormalizedInput> {
    let mut normalized = NormalizedInput::default();

    for (idx, line) in BufReader::new(reader).lines().enumerate() {
        let line_no = idx as u64 + 1;
        match line {
            Ok(line) => {
                if let Some(request) = TrackRequest::from_source(line.trim_start_matches('\u{feff}')) {
                    normalized.requests.push(request);
                }
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => normalized.skipped.push(SkippedRow {
                line: line_no,
                reason: format!("unreadable line: {e}"),
            }),
            Err(e) => {
                return Err(Error::InputFormat(format!(
                    "failed to read line {line_no}: {e}"
                )))
            }
        }
    }
    Ok(normalized)
}
