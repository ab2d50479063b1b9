use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or malformed input file/header; aborts the operation before any download
    #[error("Invalid input: {0}")]
    InputFormat(String),

    /// No usable source for one item
    #[error("No source found for '{query}': {reason}")]
    Resolution { query: String, reason: String },

    /// Network, availability or transcode failure for one item
    #[error("Download failed for '{url}': {reason}")]
    Download { url: String, reason: String },

    /// Invalid settings; fatal before a batch starts
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InputFormat,
    Resolution,
    Download,
    Configuration,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InputFormat(_) => ErrorKind::InputFormat,
            Error::Resolution { .. } => ErrorKind::Resolution,
            Error::Download { .. } => ErrorKind::Download,
            Error::Configuration(_) => ErrorKind::Configuration,
        }
    }

    /// Short cause string, without the item identification
    pub fn cause(&self) -> &str {
        match self {
            Error::InputFormat(reason) | Error::Configuration(reason) => reason,
            Error::Resolution { reason, .. } | Error::Download { reason, .. } => reason,
        }
    }

    /// Whether the error only concerns a single batch item
    pub fn is_item_level(&self) -> bool {
        matches!(self.kind(), ErrorKind::Resolution | ErrorKind::Download)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InputFormat => "InputFormatError",
            ErrorKind::Resolution => "ResolutionError",
            ErrorKind::Download => "DownloadError",
            ErrorKind::Configuration => "ConfigurationError",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_cause() {
        let err = Error::Download {
            url: "https://youtube.com/watch?v=x".into(),
            reason: "Video unavailable".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Download);
        assert_eq!(err.cause(), "Video unavailable");
        assert!(err.is_item_level());
        assert_eq!(
            err.to_string(),
            "Download failed for 'https://youtube.com/watch?v=x': Video unavailable"
        );

        let err = Error::Configuration("cookie file not found".into());
        assert!(!err.is_item_level());
        assert_eq!(err.kind().to_string(), "ConfigurationError");
    }
}
