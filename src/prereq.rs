//! Prerequisite tool detection
//!
//! Verifies the external tools the container workflow depends on by running
//! `<tool> --version` with a wall-clock bound. A tool that is missing from
//! PATH, exits non-zero, or exceeds the bound counts as missing; the whole
//! run halts only after every tool has been probed so the user sees the full
//! list at once.

use std::time::Duration;

use anyhow::Result;
use tokio::process::Command;
use tokio::time::timeout;

use crate::error::SetupError;
use crate::ui;

/// One required external tool
pub struct RequiredTool {
    /// Executable name probed on PATH
    pub tool: &'static str,
    /// Display name used in reports
    pub name: &'static str,
    /// Where to get it
    pub install_url: &'static str,
}

pub const REQUIRED_TOOLS: &[RequiredTool] = &[
    RequiredTool {
        tool: "docker",
        name: "Docker",
        install_url: "https://docs.docker.com/get-docker/",
    },
    RequiredTool {
        tool: "node",
        name: "Node.js",
        install_url: "https://nodejs.org/",
    },
    RequiredTool {
        tool: "npm",
        name: "npm",
        install_url: "https://nodejs.org/",
    },
    RequiredTool {
        tool: "git",
        name: "Git",
        install_url: "https://git-scm.com/downloads",
    },
];

const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Probe one tool; `Some(version)` on success, `None` when missing/broken
pub async fn probe_version(tool: &str) -> Option<String> {
    // Resolve on PATH first so a missing executable fails fast
    let executable = which::which(tool).ok()?;

    let result = timeout(
        VERSION_PROBE_TIMEOUT,
        Command::new(&executable).arg("--version").output(),
    )
    .await;

    let output = match result {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            log::warn!("Failed to run {tool} --version: {e}");
            return None;
        }
        Err(_) => {
            log::warn!("{tool} --version timed out after {VERSION_PROBE_TIMEOUT:?}");
            return None;
        }
    };

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|line| line.trim().to_string())
}

/// Check every required tool, reporting versions as they are found.
///
/// Returns `SetupError::MissingPrerequisites` listing every absent tool.
pub async fn check_prerequisites() -> Result<()> {
    let mut missing: Vec<&RequiredTool> = Vec::new();

    for required in REQUIRED_TOOLS {
        match probe_version(required.tool).await {
            Some(version) => ui::print_success(&format!("{}: {version}", required.name)),
            None => missing.push(required),
        }
    }

    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|t| t.name).collect();
        ui::print_error(&format!("Missing required tools: {}", names.join(", ")));
        println!("\nPlease install the missing tools and run this wizard again.");
        ui::print_info("Installation guides:");
        for tool in &missing {
            println!("• {}: {}", tool.name, tool.install_url);
        }
        return Err(SetupError::MissingPrerequisites(names.join(", ")).into());
    }

    ui::print_success("All prerequisites are installed!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_tool_names_are_unique() {
        let mut seen = std::collections::BTreeSet::new();
        for tool in REQUIRED_TOOLS {
            assert!(seen.insert(tool.tool));
        }
        assert_eq!(REQUIRED_TOOLS.len(), 4);
    }

    #[tokio::test]
    async fn probe_missing_executable_is_none() {
        assert!(probe_version("definitely-not-a-real-tool-9f2c").await.is_none());
    }
}
