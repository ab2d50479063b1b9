#[derive(Debug, thiserror::Error)]
pub enum YtDlpError {
    #[error("yt-dlp binary not found: {0}")]
    BinaryNotFound(#[from] which::Error),
    #[error("Failed to run yt-dlp: {0}")]
    Io(#[from] std::io::Error),
    #[error("yt-dlp exited with status {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },
    #[error("Failed to decode yt-dlp output: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("yt-dlp did not report an output file")]
    MissingOutput,
}
