//! # Settings
//!
//! [`Settings`] is the configuration applied uniformly to one batch run. It is
//! never mutated while a run is in progress: the interactive editor works on a
//! [`SettingsEditor`] draft and only swaps a new value in once it validates.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum AudioFormat {
    #[default]
    Mp3,
    M4a,
    Flac,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 3] = [AudioFormat::Mp3, AudioFormat::M4a, AudioFormat::Flac];

    /// Name understood by `yt-dlp --audio-format`, also the file extension
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::M4a => "m4a",
            AudioFormat::Flac => "flac",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "Most compatible format",
            AudioFormat::M4a => "Great balance between quality and compression",
            AudioFormat::Flac => "Lossless, huge in size",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AudioFormat::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Configuration(format!("unsupported audio format '{s}'")))
    }
}

/// Where track/artist searches are run. Direct sources ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Platform {
    #[default]
    #[value(name = "ytmusic")]
    YtMusic,
    #[value(name = "youtube")]
    YouTube,
}

impl Platform {
    pub const ALL: [Platform; 2] = [Platform::YtMusic, Platform::YouTube];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::YtMusic => "ytmusic",
            Platform::YouTube => "youtube",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::YtMusic => "YouTube Music",
            Platform::YouTube => "YouTube",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Platform::YtMusic => "Best for popular songs, avoids video clips",
            Platform::YouTube => "Best for niche/lesser known songs and artists",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Configuration(format!("unsupported platform '{s}'")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub audio_format: AudioFormat,
    pub output_path: PathBuf,
    pub cookie_file: Option<PathBuf>,
    pub platform: Platform,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            audio_format: AudioFormat::Mp3,
            output_path: PathBuf::from("."),
            cookie_file: None,
            platform: Platform::YtMusic,
        }
    }
}

impl Settings {
    pub fn new(
        audio_format: AudioFormat,
        output_path: impl Into<PathBuf>,
        cookie_file: Option<PathBuf>,
        platform: Platform,
    ) -> Self {
        Self {
            audio_format,
            output_path: output_path.into(),
            cookie_file,
            platform,
        }
    }

    pub fn as_tuple(&self) -> (AudioFormat, &Path, Option<&Path>, Platform) {
        (
            self.audio_format,
            self.output_path.as_path(),
            self.cookie_file.as_deref(),
            self.platform,
        )
    }

    /// Makes sure the output directory exists (creating it if needed) and the
    /// cookie file, when set, is an existing file.
    #[tracing::instrument]
    pub fn prepare(&self) -> Result<()> {
        if self.output_path.as_os_str().is_empty() {
            return Err(Error::Configuration("output directory is empty".into()));
        }
        ensure_output_dir(&self.output_path)?;

        if let Some(cookie_file) = &self.cookie_file {
            check_cookie_file(cookie_file)?;
        }
        Ok(())
    }
}

fn ensure_output_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    if path.exists() {
        return Err(Error::Configuration(format!(
            "output path {} is not a directory",
            path.display()
        )));
    }
    std::fs::create_dir_all(path).map_err(|e| {
        Error::Configuration(format!(
            "failed to create output directory {}: {e}",
            path.display()
        ))
    })?;
    tracing::info!(path = %path.display(), "Created output directory");
    Ok(())
}

fn check_cookie_file(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(Error::Configuration(format!(
            "cookie file {} not found",
            path.display()
        )));
    }
    Ok(())
}

/// Mutable draft used while the operator edits settings.
#[derive(Debug, Clone, Default)]
pub struct SettingsEditor {
    draft: Settings,
}

impl SettingsEditor {
    pub fn new(current: &Settings) -> Self {
        Self {
            draft: current.clone(),
        }
    }

    pub fn draft(&self) -> &Settings {
        &self.draft
    }

    pub fn set_audio_format(&mut self, audio_format: AudioFormat) -> &mut Self {
        self.draft.audio_format = audio_format;
        self
    }

    pub fn set_platform(&mut self, platform: Platform) -> &mut Self {
        self.draft.platform = platform;
        self
    }

    /// Sets the output directory. A missing directory is created when `create`
    /// is true and rejected otherwise; the draft is left untouched on error.
    pub fn set_output_path(&mut self, path: impl Into<PathBuf>, create: bool) -> Result<&mut Self> {
        let path = path.into();
        if !path.exists() && !create {
            return Err(Error::Configuration(format!(
                "output directory {} does not exist",
                path.display()
            )));
        }
        ensure_output_dir(&path)?;
        self.draft.output_path = path;
        Ok(self)
    }

    /// `None` disables cookies. A path must point to an existing file.
    pub fn set_cookie_file(&mut self, path: Option<PathBuf>) -> Result<&mut Self> {
        if let Some(path) = &path {
            check_cookie_file(path)?;
        }
        self.draft.cookie_file = path;
        Ok(self)
    }

    pub fn reset(&mut self) -> &mut Self {
        self.draft = Settings::default();
        self
    }

    /// Validates the draft and returns it as the new settings value.
    pub fn commit(self) -> Result<Settings> {
        self.draft.prepare()?;
        Ok(self.draft)
    }
}
