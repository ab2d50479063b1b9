use console::{measure_text_width, style, Term};
use spotfetch::{BatchEvent, BatchReport, Settings};
use tokio::sync::mpsc::UnboundedReceiver;

const BANNER: &str = r"
   ____              _   _____    _       _
  / ___| _ __   ___ | |_|  ___|__| |_ ___| |__
  \___ \| '_ \ / _ \| __| |_ / _ \ __/ __| '_ \
   ___) | |_) | (_) | |_|  _|  __/ || (__| | | |
  |____/| .__/ \___/ \__|_|  \___|\__\___|_| |_|
        |_|
";

/// Clears the screen when attached to a terminal and prints the banner.
pub fn banner() {
    let term = Term::stdout();
    if term.is_term() {
        let _ = term.clear_screen();
    }
    println!("{}", style(BANNER).cyan().bold());
    println!("  {}\n", style("Welcome to SpotFetch!").cyan());
}

pub fn settings_panel(settings: &Settings) {
    let rows = [
        ("Audio Format", settings.audio_format.as_str().to_uppercase()),
        ("Output Directory", settings.output_path.display().to_string()),
        (
            "Cookie File",
            settings
                .cookie_file
                .as_ref()
                .map_or("None".to_string(), |p| p.display().to_string()),
        ),
        ("Download Platform", settings.platform.display_name().to_string()),
    ];
    let width = rows
        .iter()
        .map(|(name, value)| measure_text_width(name) + measure_text_width(value) + 2)
        .max()
        .unwrap_or_default();

    println!("{}", style("Current Configuration").green().bold());
    println!("{}", style("─".repeat(width)).green());
    for (name, value) in rows {
        println!("{name}: {}", style(value).cyan());
    }
    println!("{}\n", style("─".repeat(width)).green());
}

pub fn heading(text: &str) {
    println!("\n{}", style(text).blue().bold());
}

pub fn success(text: &str) {
    println!("{}", style(text).green());
}

pub fn warning(text: &str) {
    println!("{}", style(text).yellow());
}

pub fn failure(text: &str) {
    println!("{}", style(text).red());
}

/// Prints one line per item as it starts and finishes. Returns once the
/// sending runner is gone.
pub async fn print_events(mut events: UnboundedReceiver<BatchEvent>) {
    while let Some(event) = events.recv().await {
        match event {
            BatchEvent::ItemStarted {
                index,
                total,
                label,
            } => println!(
                "{}",
                style(format!("[{index}/{total}] Downloading: {label}")).cyan()
            ),
            BatchEvent::ItemFinished {
                label,
                error: None,
                ..
            } => success(&format!("✓ Successfully downloaded: {label}")),
            BatchEvent::ItemFinished {
                label,
                error: Some(cause),
                ..
            } => failure(&format!("✗ Failed to download {label}: {cause}")),
            BatchEvent::StateChanged { .. } => {}
            BatchEvent::Completed { succeeded, failed } => println!(
                "\n{}",
                style(format!(
                    "All downloads complete! {succeeded} succeeded, {failed} failed"
                ))
                .green()
                .bold()
            ),
        }
    }
}

pub fn print_summary(report: &BatchReport) {
    if report.failed() == 0 {
        return;
    }
    heading("Failed downloads:");
    for outcome in report.failures() {
        if let Some(error) = &outcome.error {
            failure(&format!(
                "  [{}] {} ({}): {}",
                outcome.index,
                outcome.request.label(),
                error.kind(),
                error.cause()
            ));
        }
    }
}
