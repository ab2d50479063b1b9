mod app;
mod menu;
mod prompt;
mod terminal;

use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use clap::{Parser, Subcommand};
use spotfetch::{tracing::init_tracing_subscriber, AudioFormat, InputKind, Platform, Settings};
use ytdlp_runner::YtDlp;

use crate::{app::App, menu::Menu};

#[derive(Parser)]
#[command(
    name = "spotfetch",
    version,
    about = "Bulk audio downloads from playlist exports, CSV files and URLs"
)]
struct Cli {
    /// Audio format of the downloaded files
    #[arg(long, short, env = "SPOTFETCH_FORMAT", value_enum, default_value_t = AudioFormat::Mp3, global = true)]
    format: AudioFormat,

    /// Directory the audio files are written to
    #[arg(long, short, env = "SPOTFETCH_OUTPUT_DIR", default_value = ".", global = true)]
    output: PathBuf,

    /// Path to a yt-dlp cookies file
    #[arg(long, env = "SPOTFETCH_COOKIES_PATH", global = true)]
    cookies: Option<PathBuf>,

    /// Where track/artist searches are run
    #[arg(long, env = "SPOTFETCH_PLATFORM", value_enum, default_value_t = Platform::YtMusic, global = true)]
    platform: Platform,

    /// Number of tracks downloaded at the same time
    #[arg(long, env = "SPOTFETCH_CONCURRENCY", default_value = "1", global = true)]
    concurrency: usize,

    /// Give up on a single track after this many seconds
    #[arg(long, env = "SPOTFETCH_ITEM_TIMEOUT", global = true)]
    item_timeout: Option<u64>,

    /// Without a command the interactive menu is started
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Download the tracks of an Exportify playlist export
    Exportify { path: PathBuf },
    /// Download the tracks of a TuneMyMusic playlist export
    Tunemymusic { path: PathBuf },
    /// Download every URL of a text file, one per line
    Urls { path: PathBuf },
    /// Download the tracks of a CSV file with a `name,artist` header
    Csv { path: PathBuf },
    /// Download a single video or playlist URL
    Url { url: String },
    /// Search for a track and download the best match
    Search {
        #[arg(long)]
        track: String,
        #[arg(long)]
        artist: String,
    },
}

impl From<Command> for InputKind {
    fn from(command: Command) -> Self {
        match command {
            Command::Exportify { path } => InputKind::ExportifyCsv(path),
            Command::Tunemymusic { path } => InputKind::TuneMyMusicCsv(path),
            Command::Urls { path } => InputKind::UrlFile(path),
            Command::Csv { path } => InputKind::GenericCsv(path),
            Command::Url { url } => InputKind::SingleUrl(url),
            Command::Search { track, artist } => InputKind::SearchQuery { track, artist },
        }
    }
}

impl Cli {
    fn settings(&self) -> Settings {
        Settings::new(
            self.format,
            &self.output,
            self.cookies.clone(),
            self.platform,
        )
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let yt_dlp = YtDlp::new().context("yt-dlp is required: install it or point YTDLP_PATH at it")?;
    tracing::debug!(binary = %yt_dlp.binary().display(), "Using yt-dlp");

    let settings = cli.settings();
    let app = App::new(
        yt_dlp,
        cli.concurrency,
        cli.item_timeout.map(Duration::from_secs),
    );
    let command = cli.command;

    let session = async move {
        match command {
            Some(command) => {
                app.acquire(command.into(), &settings).await?;
                Ok(())
            }
            None => Menu::new(app, settings).run().await,
        }
    };

    // the session is dropped as soon as Ctrl-C wins, which kills a running
    // yt-dlp and removes its staging directory
    let outcome = tokio::select! {
        result = session => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };

    match outcome {
        Some(result) => result,
        None => {
            println!("\n\nGoodbye!");
            // a prompt may still be waiting on the blocking pool, which the
            // runtime would otherwise wait for on shutdown
            std::process::exit(0);
        }
    }
}
