//! Global npm installation of the selected add-on packages
//!
//! Every install here is best effort: a failed or timed-out install is
//! downgraded to a warning and the remaining packages still run. The
//! filesystem add-on has no package (it is built inside the container) and
//! is skipped.

use std::collections::BTreeSet;
use std::time::Duration;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::process::Command;
use tokio::time::timeout;

use crate::registry::AddOnDescriptor;
use crate::ui;

const NPM_INSTALL_TIMEOUT: Duration = Duration::from_secs(120);
const COMPOSIO_SETUP_TIMEOUT: Duration = Duration::from_secs(60);

/// Unique npm packages behind a selection, in deterministic order
pub fn packages_for(selected: &[&'static AddOnDescriptor]) -> Vec<&'static str> {
    let unique: BTreeSet<&'static str> =
        selected.iter().filter_map(|d| d.package).collect();
    unique.into_iter().collect()
}

/// Install the npm packages for the selected add-ons, then run Composio
/// client setup for any Composio-backed selections
pub async fn install_packages(selected: &[&'static AddOnDescriptor]) -> Result<()> {
    if selected.is_empty() {
        ui::print_warning("No add-ons selected for installation.");
        return Ok(());
    }

    let packages = packages_for(selected);
    if packages.is_empty() {
        ui::print_success("Selected add-ons don't require npm package installation!");
        return Ok(());
    }

    ui::print_info("Installing packages for selected add-ons...");

    for package in &packages {
        install_one_package(package).await?;
    }

    let composio: Vec<&&AddOnDescriptor> = selected
        .iter()
        .filter(|d| matches!(d.id, "notion" | "figma" | "zapier"))
        .collect();

    if !composio.is_empty() && packages.contains(&"@composio/mcp") {
        ui::print_info("Setting up Composio integrations...");
        for descriptor in composio {
            setup_composio_client(descriptor.id, descriptor.name).await;
        }
    }

    Ok(())
}

async fn install_one_package(package: &str) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("Invalid progress bar template")?,
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Installing {package}..."));

    let result = timeout(
        NPM_INSTALL_TIMEOUT,
        Command::new("npm")
            .args(["install", "-g", package])
            .output(),
    )
    .await;

    spinner.finish_and_clear();

    match result {
        Ok(Ok(output)) if output.status.success() => {
            ui::print_success(&format!("Installed {package}"));
        }
        Ok(Ok(output)) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            ui::print_warning(&format!(
                "Could not install {package}: {}",
                stderr.trim()
            ));
        }
        Ok(Err(e)) => {
            ui::print_warning(&format!("Error installing {package}: {e}"));
        }
        Err(_) => {
            ui::print_warning(&format!("Timeout installing {package}"));
        }
    }

    Ok(())
}

async fn setup_composio_client(id: &str, name: &str) {
    println!("Setting up {name}...");

    let result = timeout(
        COMPOSIO_SETUP_TIMEOUT,
        Command::new("npx")
            .args(["@composio/mcp@latest", "setup", id, "--client", "claude"])
            .output(),
    )
    .await;

    match result {
        Ok(Ok(output)) if output.status.success() => {
            ui::print_success(&format!("Set up {name} integration"));
        }
        Ok(Ok(output)) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            ui::print_warning(&format!("Could not set up {id}: {}", stderr.trim()));
        }
        Ok(Err(e)) => {
            ui::print_warning(&format!("Error setting up {id}: {e}"));
        }
        Err(_) => {
            ui::print_warning(&format!("Timeout setting up {id}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry;

    #[test]
    fn composio_package_is_deduplicated() {
        let selected = vec![
            registry::get("notion").unwrap(),
            registry::get("figma").unwrap(),
            registry::get("zapier").unwrap(),
        ];
        assert_eq!(packages_for(&selected), ["@composio/mcp"]);
    }

    #[test]
    fn filesystem_contributes_no_package() {
        let selected = vec![
            registry::get("filesystem").unwrap(),
            registry::get("memory").unwrap(),
        ];
        assert_eq!(
            packages_for(&selected),
            ["@modelcontextprotocol/server-memory"]
        );
    }

    #[test]
    fn empty_selection_has_no_packages() {
        assert!(packages_for(&[]).is_empty());
    }
}
