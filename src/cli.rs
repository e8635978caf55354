use crate::error::{PortfolioError, Result};
use crate::project::ProjectDraft;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Input};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Prints a short banner at the start of the CLI.
pub fn print_banner() {
    println!(
        "{} {}",
        "portfolio-gen".bold().green(),
        format!("v{}", env!("CARGO_PKG_VERSION")).bright_black()
    );
}

/// Helper to print an info message.
pub fn print_info(message: &str) {
    println!("{}", message.cyan());
}

/// Helper to print a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "[OK]".bright_green(), message.bright_white());
}

/// Helper to print a warning message.
pub fn print_warning(message: &str) {
    println!("{} {}", "[WARN]".yellow(), message.yellow());
}

/// Helper to print an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "[ERROR]".bright_red(), message.bright_red());
}

/// Spinner shown while talking to the network
pub fn create_progress_bar(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style.tick_strings(&["-", "\\", "|", "/", "-", "\\", "|", "/"]));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Whether prompts may be shown: not disabled by the user and a person is at the terminal
pub fn should_prompt(assume_yes: bool) -> bool {
    !assume_yes && console::user_attended()
}

/// Asks the operator for whatever the repository could not tell us
///
/// The title is always offered for confirmation; tagline, demo and social
/// URLs are asked for only when still unknown. Empty answers leave a field
/// unset.
pub fn collect_missing(draft: &mut ProjectDraft) -> Result<()> {
    let theme = ColorfulTheme::default();

    let title: String = Input::with_theme(&theme)
        .with_prompt("Project title")
        .with_initial_text(draft.title.clone().unwrap_or_default())
        .interact_text()
        .map_err(prompt_error)?;
    draft.title = Some(title);

    if draft.tagline.is_none() {
        draft.tagline = prompt_optional(&theme, "Tagline (one sentence)")?;
    }
    if draft.demo_url.is_none() {
        draft.demo_url = prompt_optional(&theme, "Demo video URL (optional)")?;
    }
    if draft.social_url.is_none() {
        draft.social_url = prompt_optional(&theme, "Social post URL (optional)")?;
    }
    Ok(())
}

fn prompt_optional(theme: &ColorfulTheme, prompt: &str) -> Result<Option<String>> {
    let answer: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_error)?;
    let answer = answer.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}

fn prompt_error(e: std::io::Error) -> PortfolioError {
    PortfolioError::Prompt(e.to_string())
}
