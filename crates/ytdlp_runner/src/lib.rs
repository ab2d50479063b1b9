//! # yt-dlp runner
//!
//! Thin async wrapper around the `yt-dlp` binary. It knows how to extract a
//! single audio file into a target format and how to list the entries of a
//! search page without downloading anything.
//!
//! The binary is located through `YTDLP_PATH` or, failing that, on `PATH`.

mod error;
mod search;

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Output,
};

use tokio::process::Command;

pub use error::YtDlpError;
pub use search::{FlatEntry, FlatPlaylist};

#[derive(Debug, Clone)]
pub struct YtDlp {
    binary: PathBuf,
}

impl YtDlp {
    pub const BINARY_ENV: &str = "YTDLP_PATH";
    const BINARY_NAME: &str = "yt-dlp";

    /// Locates the binary via `YTDLP_PATH` or the `PATH` lookup.
    pub fn new() -> Result<Self, YtDlpError> {
        if let Some(path) = std::env::var_os(Self::BINARY_ENV).filter(|p| !p.is_empty()) {
            return Ok(Self::with_binary(path));
        }
        let binary = which::which(Self::BINARY_NAME)?;
        tracing::debug!(binary = %binary.display(), "Located yt-dlp");
        Ok(Self { binary })
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub async fn version(&self) -> Result<String, YtDlpError> {
        let output = self.run(["--version"]).await?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Extracts the audio of `url` into `audio_format`, writing to
    /// `output_template` (a yt-dlp `-o` template).
    ///
    /// Returns the final paths reported by yt-dlp after post-processing, in the
    /// order they were written. A playlist URL yields several paths.
    #[tracing::instrument(skip(self, cookies))]
    pub async fn download_audio(
        &self,
        url: &str,
        audio_format: &str,
        output_template: &Path,
        cookies: Option<&Path>,
    ) -> Result<Vec<PathBuf>, YtDlpError> {
        let args = audio_args(url, audio_format, output_template, cookies);
        let output = self.run(args).await?;

        let paths = parse_printed_paths(&String::from_utf8_lossy(&output.stdout));
        if paths.is_empty() {
            return Err(YtDlpError::MissingOutput);
        }
        Ok(paths)
    }

    /// Lists up to `limit` entries of a search or playlist page without
    /// resolving each entry.
    #[tracing::instrument(skip(self, cookies))]
    pub async fn flat_search(
        &self,
        search_url: &str,
        limit: usize,
        cookies: Option<&Path>,
    ) -> Result<Vec<FlatEntry>, YtDlpError> {
        let mut args: Vec<OsString> = vec![
            "--flat-playlist".into(),
            "--dump-single-json".into(),
            "--playlist-end".into(),
            limit.to_string().into(),
        ];
        push_cookies(&mut args, cookies);
        args.push(search_url.into());

        let output = self.run(args).await?;
        let playlist = serde_json::from_slice::<FlatPlaylist>(&output.stdout)?;
        Ok(playlist.entries)
    }

    async fn run<I, S>(&self, args: I) -> Result<Output, YtDlpError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let output = Command::new(&self.binary)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to spawn yt-dlp"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(YtDlpError::Failed {
                code: output.status.code(),
                stderr: last_error_line(&stderr),
            });
        }
        Ok(output)
    }
}

fn push_cookies(args: &mut Vec<OsString>, cookies: Option<&Path>) {
    if let Some(cookies) = cookies {
        args.push("--cookies".into());
        args.push(cookies.into());
    }
}

fn audio_args(
    url: &str,
    audio_format: &str,
    output_template: &Path,
    cookies: Option<&Path>,
) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--extract-audio".into(),
        "--audio-format".into(),
        audio_format.into(),
        "--audio-quality".into(),
        "0".into(),
        "--no-playlist".into(),
        "--no-simulate".into(),
        "--no-progress".into(),
        "--print".into(),
        "after_move:filepath".into(),
        "--output".into(),
        output_template.into(),
    ];
    push_cookies(&mut args, cookies);
    args.push(url.into());
    args
}

fn parse_printed_paths(stdout: &str) -> Vec<PathBuf> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(PathBuf::from)
        .collect()
}

// yt-dlp writes warnings before the actual error; keep the part that explains the failure
fn last_error_line(stderr: &str) -> String {
    let lines = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>();

    lines
        .iter()
        .rev()
        .find(|l| l.starts_with("ERROR:"))
        .or(lines.last())
        .map(|l| l.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_args_include_format_template_and_cookies() {
        let args = audio_args(
            "https://youtube.com/watch?v=abc",
            "flac",
            Path::new("/music/%(title)s.%(ext)s"),
            Some(Path::new("/tmp/cookies.txt")),
        );
        let args = args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect::<Vec<_>>();

        let fmt_idx = args.iter().position(|a| a == "--audio-format").unwrap();
        assert_eq!(args[fmt_idx + 1], "flac");

        let out_idx = args.iter().position(|a| a == "--output").unwrap();
        assert_eq!(args[out_idx + 1], "/music/%(title)s.%(ext)s");

        let cookie_idx = args.iter().position(|a| a == "--cookies").unwrap();
        assert_eq!(args[cookie_idx + 1], "/tmp/cookies.txt");

        assert_eq!(args.last().unwrap(), "https://youtube.com/watch?v=abc");
    }

    #[test]
    fn test_audio_args_without_cookies() {
        let args = audio_args("url", "mp3", Path::new("out"), None);
        assert!(!args.iter().any(|a| a == "--cookies"));
    }

    #[test]
    fn test_parse_printed_paths_skips_blank_lines() {
        let paths = parse_printed_paths("/music/a.mp3\n\n  /music/b.mp3  \n");
        assert_eq!(
            paths,
            vec![PathBuf::from("/music/a.mp3"), PathBuf::from("/music/b.mp3")]
        );
    }

    #[test]
    fn test_last_error_line_prefers_error_prefix() {
        let stderr = "WARNING: something odd\nERROR: [youtube] abc: Video unavailable\nhint: update\n";
        assert_eq!(
            last_error_line(stderr),
            "ERROR: [youtube] abc: Video unavailable"
        );
        assert_eq!(last_error_line("plain failure\n"), "plain failure");
        assert_eq!(last_error_line(""), "");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_binary_reports_stderr() {
        let yt_dlp = YtDlp::with_binary("false");
        let err = yt_dlp.version().await.unwrap_err();
        assert!(matches!(err, YtDlpError::Failed { .. }));
    }

    #[tokio::test]
    async fn test_missing_binary_is_io_error() {
        let yt_dlp = YtDlp::with_binary("/definitely/not/a/yt-dlp");
        let err = yt_dlp.version().await.unwrap_err();
        assert!(matches!(err, YtDlpError::Io(_)));
    }
}
