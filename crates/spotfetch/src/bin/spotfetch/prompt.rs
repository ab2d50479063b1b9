//! Terminal questions. dialoguer blocks on the terminal, so every question
//! runs on the blocking pool.

use std::io;

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};

/// The operator left the prompt without answering.
#[derive(Debug, thiserror::Error)]
pub enum PromptClosed {
    #[error("standard input closed")]
    Eof,
    #[error("interrupted")]
    Interrupted,
}

async fn blocking<T, F>(question: F) -> anyhow::Result<T>
where
    T: Send + 'static,
    F: FnOnce(&ColorfulTheme) -> dialoguer::Result<T> + Send + 'static,
{
    let answer = tokio::task::spawn_blocking(move || question(&ColorfulTheme::default())).await?;

    answer.map_err(unanswered)
}

fn unanswered(e: dialoguer::Error) -> anyhow::Error {
    let dialoguer::Error::IO(e) = e;
    match e.kind() {
        io::ErrorKind::Interrupted => PromptClosed::Interrupted.into(),
        io::ErrorKind::UnexpectedEof | io::ErrorKind::NotConnected => PromptClosed::Eof.into(),
        _ => anyhow::Error::new(e).context("Failed to read answer"),
    }
}

/// Returns the 0-based index of the chosen item.
pub async fn select(prompt: &str, items: Vec<String>, default: usize) -> anyhow::Result<usize> {
    let prompt = prompt.to_string();
    blocking(move |theme| {
        Select::with_theme(theme)
            .with_prompt(prompt)
            .items(&items)
            .default(default)
            .interact()
    })
    .await
}

/// Free text; an empty answer yields `default` when there is one.
pub async fn input(prompt: &str, default: Option<String>) -> anyhow::Result<String> {
    let prompt = prompt.to_string();
    let answer = blocking(move |theme| {
        let mut input = Input::<String>::with_theme(theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(default) = default.filter(|d| !d.is_empty()) {
            input = input.default(default);
        }
        input.interact_text()
    })
    .await?;

    Ok(answer.trim().to_string())
}

pub async fn confirm(prompt: &str, default: bool) -> anyhow::Result<bool> {
    let prompt = prompt.to_string();
    blocking(move |theme| {
        Confirm::with_theme(theme)
            .with_prompt(prompt)
            .default(default)
            .interact()
    })
    .await
}

pub async fn pause() -> anyhow::Result<()> {
    input("Press Enter to continue", None).await?;
    Ok(())
}
