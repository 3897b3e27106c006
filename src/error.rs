//! Typed failures the top level cares about
//!
//! Most errors flow through `anyhow` untyped; these two are matched on in
//! `main` to pick the exit message. Everything else is "setup failed".

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    /// User hit Ctrl-C (or Esc) inside a prompt. Clean abort, not a crash.
    #[error("setup interrupted by user")]
    Interrupted,

    /// One or more required tools are not installed. Halts the wizard early.
    #[error("missing required tools: {0}")]
    MissingPrerequisites(String),
}
