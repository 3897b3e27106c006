//! Terminal output and prompt helpers for the setup wizard
//!
//! All colored output goes through termcolor so the wizard renders the same
//! on every platform. Prompt wrappers translate inquire cancellation into
//! `SetupError::Interrupted` so Ctrl-C anywhere aborts the run cleanly.

use std::io::Write;

use anyhow::Result;
use inquire::{Confirm, InquireError, Select, Text};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::error::SetupError;

/// Display the wizard welcome banner
pub fn show_banner() {
    let mut stdout = StandardStream::stdout(ColorChoice::Always);

    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)));
    let _ = writeln!(
        stdout,
        "\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━"
    );
    let _ = stdout.reset();

    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true));
    let _ = writeln!(stdout, "\n              F O R G E   D E V   C O N T A I N E R");
    let _ = stdout.reset();

    let _ = writeln!(stdout, "\n        One container for web, mobile, backend, ML, DevOps");
    let _ = writeln!(stdout, "\nThis wizard will set up:");
    let _ = writeln!(stdout, "  • Prerequisite tool checks (docker, node, npm, git)");
    let _ = writeln!(stdout, "  • IDE integration for the container");
    let _ = writeln!(stdout, "  • MCP add-on selection and credentials");
    let _ = writeln!(stdout, "  • Desktop client configuration file");

    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)));
    let _ = writeln!(
        stdout,
        "\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n"
    );
    let _ = stdout.reset();
}

/// Print a numbered step header
pub fn print_step(step_num: u32, title: &str, description: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Always);

    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Blue)).set_bold(true));
    let _ = writeln!(stdout, "\n{}", "=".repeat(62));
    let _ = stdout.reset();

    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
    let _ = writeln!(stdout, "STEP {step_num}: {title}");
    let _ = stdout.reset();

    if !description.is_empty() {
        let _ = writeln!(stdout, "{description}");
    }

    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Blue)).set_bold(true));
    let _ = writeln!(stdout, "{}\n", "=".repeat(62));
    let _ = stdout.reset();
}

pub fn print_success(message: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Always);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
    let _ = writeln!(stdout, "✓ {message}");
    let _ = stdout.reset();
}

pub fn print_warning(message: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Always);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)));
    let _ = writeln!(stdout, "⚠ {message}");
    let _ = stdout.reset();
}

pub fn print_error(message: &str) {
    let mut stderr = StandardStream::stderr(ColorChoice::Always);
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
    let _ = writeln!(stderr, "❌ {message}");
    let _ = stderr.reset();
}

pub fn print_info(message: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Always);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)));
    let _ = writeln!(stdout, "ℹ {message}");
    let _ = stdout.reset();
}

/// Map inquire cancellation to a clean interrupt; keep other errors as-is
fn prompt_error(err: InquireError) -> anyhow::Error {
    match err {
        InquireError::OperationCanceled | InquireError::OperationInterrupted => {
            SetupError::Interrupted.into()
        }
        other => other.into(),
    }
}

/// Ask a yes/no question
pub fn ask_yes_no(question: &str, default: bool) -> Result<bool> {
    Confirm::new(question)
        .with_default(default)
        .prompt()
        .map_err(prompt_error)
}

/// Let the user pick one option from a list, returning its index
pub fn select_option(question: &str, options: Vec<&'static str>) -> Result<usize> {
    Select::new(question, options)
        .raw_prompt()
        .map(|choice| choice.index)
        .map_err(prompt_error)
}

/// Free-form text input; empty string means "skip"
pub fn ask_text(question: &str) -> Result<String> {
    Text::new(question)
        .prompt()
        .map(|s| s.trim().to_string())
        .map_err(prompt_error)
}

/// Pause until the user presses Enter
pub fn wait_for_enter(message: &str) -> Result<()> {
    Text::new(message).prompt().map_err(prompt_error)?;
    Ok(())
}
