use std::path::PathBuf;

use spotfetch::{AudioFormat, InputKind, Platform, Settings, SettingsEditor};

use crate::{
    app::App,
    prompt::{self, PromptClosed},
    terminal,
};

const MAIN_MENU: [(&str, &str); 8] = [
    (
        "Download using Exportify CSV",
        "Export your playlist CSV at https://exportify.app/",
    ),
    (
        "Download using TuneMyMusic CSV",
        "Export your playlist to a file at https://www.tunemymusic.com/transfer",
    ),
    (
        "Download from URLs File",
        "Text file with one YouTube URL per line",
    ),
    (
        "Download from Custom CSV",
        "CSV file with name,artist as headers",
    ),
    (
        "Download from Single URL",
        "A YouTube video or playlist URL",
    ),
    ("Download from Search", "Search and download by track/artist name"),
    (
        "Settings",
        "Configure format, output directory, cookies and platform",
    ),
    ("Exit", "Exit the application"),
];

enum Choice {
    Download(InputKind),
    Settings,
    Exit,
}

fn menu_items<S: AsRef<str>>(options: &[(&str, S)]) -> Vec<String> {
    options
        .iter()
        .map(|(name, details)| format!("{name:<32} {}", details.as_ref()))
        .collect()
}

fn cookie_label(settings: &Settings) -> String {
    settings
        .cookie_file
        .as_ref()
        .map_or("None".to_string(), |p| p.display().to_string())
}

/// The interactive front end. Owns the current settings and only replaces
/// them with a validated value from the settings editor.
pub struct Menu {
    app: App,
    settings: Settings,
}

impl Menu {
    pub fn new(app: App, settings: Settings) -> Self {
        Self { app, settings }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        match self.main_loop().await {
            Err(e) => match e.downcast_ref::<PromptClosed>() {
                Some(PromptClosed::Interrupted) => {
                    println!("\n\nGoodbye!");
                    Ok(())
                }
                Some(PromptClosed::Eof) => {
                    tracing::debug!("Input closed, leaving menu");
                    Ok(())
                }
                None => Err(e),
            },
            Ok(()) => Ok(()),
        }
    }

    async fn main_loop(&mut self) -> anyhow::Result<()> {
        loop {
            terminal::banner();
            terminal::settings_panel(&self.settings);

            match Self::main_choice().await? {
                Choice::Download(input) => {
                    if let Err(e) = self.app.acquire(input, &self.settings).await {
                        terminal::failure(&format!("Error: {e}"));
                    }
                    prompt::pause().await?;
                }
                Choice::Settings => self.configure_settings().await?,
                Choice::Exit => {
                    terminal::heading("Thank you for using SpotFetch!");
                    println!("Bye Bye!!");
                    return Ok(());
                }
            }
        }
    }

    async fn main_choice() -> anyhow::Result<Choice> {
        let choice = prompt::select("SpotFetch Main Menu", menu_items(&MAIN_MENU), 0).await?;

        let input = match choice {
            0 => InputKind::ExportifyCsv(ask_path("Path to Exportify CSV file").await?),
            1 => InputKind::TuneMyMusicCsv(ask_path("Path to TuneMyMusic CSV file").await?),
            2 => InputKind::UrlFile(ask_path("Path to text file with URLs").await?),
            3 => {
                println!("Expected CSV format: name,artist");
                InputKind::GenericCsv(ask_path("Path to CSV file").await?)
            }
            4 => InputKind::SingleUrl(prompt::input("URL", None).await?),
            5 => InputKind::SearchQuery {
                track: prompt::input("Track name", None).await?,
                artist: prompt::input("Artist name", None).await?,
            },
            6 => return Ok(Choice::Settings),
            _ => return Ok(Choice::Exit),
        };
        Ok(Choice::Download(input))
    }

    /// Edits a draft until the operator goes back, then swaps it in if it
    /// validates.
    async fn configure_settings(&mut self) -> anyhow::Result<()> {
        let mut editor = SettingsEditor::new(&self.settings);

        loop {
            let draft = editor.draft();
            terminal::settings_panel(draft);
            let options = [
                (
                    "Set Audio Format",
                    format!("Currently: {}", draft.audio_format.as_str().to_uppercase()),
                ),
                (
                    "Set Output Directory",
                    format!("Currently: {}", draft.output_path.display()),
                ),
                ("Set Cookie File", format!("Currently: {}", cookie_label(draft))),
                (
                    "Set Download Platform",
                    format!("Currently: {}", draft.platform.display_name()),
                ),
                ("Reset to Defaults", "Reset all settings".to_string()),
                ("Back to Main Menu", "Return to main menu".to_string()),
            ];

            let back = options.len() - 1;
            match prompt::select("Settings Menu", menu_items(&options), back).await? {
                0 => Self::set_audio_format(&mut editor).await?,
                1 => Self::set_output_directory(&mut editor).await?,
                2 => Self::set_cookie_file(&mut editor).await?,
                3 => Self::set_platform(&mut editor).await?,
                4 => {
                    editor.reset();
                    terminal::success("All settings reset to defaults");
                }
                _ => break,
            }
        }

        match editor.commit() {
            Ok(settings) => self.settings = settings,
            Err(e) => terminal::failure(&format!("Settings not applied: {e}")),
        }
        Ok(())
    }

    async fn set_audio_format(editor: &mut SettingsEditor) -> anyhow::Result<()> {
        let options = AudioFormat::ALL.map(|f| (f.as_str(), f.description()));
        let current = AudioFormat::ALL
            .iter()
            .position(|f| *f == editor.draft().audio_format)
            .unwrap_or_default();

        let choice = prompt::select("Audio format", menu_items(&options), current).await?;
        let audio_format = AudioFormat::ALL[choice];
        editor.set_audio_format(audio_format);
        terminal::success(&format!(
            "Audio format set to: {}",
            audio_format.as_str().to_uppercase()
        ));
        Ok(())
    }

    async fn set_output_directory(editor: &mut SettingsEditor) -> anyhow::Result<()> {
        let current = editor.draft().output_path.display().to_string();
        let path = PathBuf::from(prompt::input("New output directory", Some(current)).await?);

        let create = if path.exists() {
            false
        } else {
            let question = format!("Directory '{}' doesn't exist. Create it?", path.display());
            if !prompt::confirm(&question, true).await? {
                terminal::warning("Output directory unchanged");
                return Ok(());
            }
            true
        };

        match editor.set_output_path(&path, create) {
            Ok(_) => terminal::success(&format!("Output directory set to: {}", path.display())),
            Err(e) => terminal::failure(&format!("Error: {e}")),
        }
        Ok(())
    }

    async fn set_cookie_file(editor: &mut SettingsEditor) -> anyhow::Result<()> {
        let current = editor
            .draft()
            .cookie_file
            .as_ref()
            .map(|p| p.display().to_string());

        if !prompt::confirm("Use a cookie file?", current.is_some()).await? {
            editor.set_cookie_file(None)?;
            terminal::warning("Cookie file disabled");
            return Ok(());
        }

        let path = prompt::input("Cookie file path", current).await?;
        match editor.set_cookie_file(Some(PathBuf::from(&path))) {
            Ok(_) => terminal::success(&format!("Cookie file set to: {path}")),
            Err(e) => terminal::failure(&format!("Error: {e}")),
        }
        Ok(())
    }

    async fn set_platform(editor: &mut SettingsEditor) -> anyhow::Result<()> {
        println!("YouTube works best for niche and lesser known songs and artists.");
        println!("YouTube Music works best for popular songs and avoids video clip audio.");
        let options = Platform::ALL.map(|p| (p.display_name(), p.description()));
        let current = Platform::ALL
            .iter()
            .position(|p| *p == editor.draft().platform)
            .unwrap_or_default();

        let choice = prompt::select("Download platform", menu_items(&options), current).await?;
        let platform = Platform::ALL[choice];
        editor.set_platform(platform);
        terminal::success(&format!(
            "Download platform set to: {}",
            platform.display_name()
        ));
        Ok(())
    }
}

async fn ask_path(question: &str) -> anyhow::Result<PathBuf> {
    Ok(PathBuf::from(prompt::input(question, None).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_items_align_descriptions() {
        let items = menu_items(&[("Exit", "Exit the application"), ("Settings", "Configure")]);
        assert_eq!(items[0].find("Exit the application"), Some(33));
        assert_eq!(items[1].find("Configure"), Some(33));
    }

    #[test]
    fn test_main_menu_has_eight_entries_ending_with_exit() {
        assert_eq!(MAIN_MENU.len(), 8);
        assert_eq!(MAIN_MENU[7].0, "Exit");
        assert_eq!(MAIN_MENU[6].0, "Settings");
    }
}
