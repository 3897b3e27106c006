//! Container build and project template handling
//!
//! The wizard does not manage containers itself; it shells out to the docker
//! CLI for the one-off image build and copies the bundled `.devcontainer`
//! template into a sample project the user can clone from.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use walkdir::WalkDir;

use crate::ide::Ide;
use crate::ui;

pub const IMAGE_TAG: &str = "forge-dev-container";

/// Universal template files renamed into place after the copy
const TEMPLATE_RENAMES: &[(&str, &str)] = &[
    ("Dockerfile.universal", "Dockerfile"),
    ("devcontainer.universal.json", "devcontainer.json"),
    ("post-create-universal.sh", "post-create.sh"),
];

/// Directory holding the bundled `.devcontainer` template.
///
/// Prefers the current working directory (running from a checkout), then the
/// directory next to the executable (installed layout).
pub fn template_root() -> PathBuf {
    if let Ok(cwd) = std::env::current_dir() {
        if cwd.join(".devcontainer").exists() {
            return cwd;
        }
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Container setup step: build now (non-VS Code IDEs) and lay down the
/// sample project template
pub async fn setup_container(ide: Ide, template_root: &Path) -> Result<()> {
    ui::print_info(&format!("Container setup for {}...", ide.display_name()));

    if ide == Ide::VsCode {
        println!("VS Code will automatically build the container when you open the project.");
        println!("Make sure the .devcontainer folder is in your project root.");
    } else {
        println!("Building the container manually...");
        if ui::ask_yes_no("Would you like to build the container now?", true)? {
            // Build failure is reported but does not stop the wizard
            if let Err(e) = build_container(template_root).await {
                ui::print_error(&format!("Error building container: {e:#}"));
            }
        }
    }

    create_project_template(template_root, &std::env::current_dir()?)?;
    Ok(())
}

/// Run `docker build`, streaming build output as it arrives
pub async fn build_container(template_root: &Path) -> Result<()> {
    ui::print_info("Building the Forge dev container...");
    println!("This may take 10-15 minutes the first time...");

    let mut dockerfile = template_root.join(".devcontainer").join("Dockerfile");
    if !dockerfile.exists() {
        dockerfile = template_root
            .join(".devcontainer")
            .join("Dockerfile.universal");
    }

    let mut child = Command::new("docker")
        .arg("build")
        .args(["-t", IMAGE_TAG])
        .arg("-f")
        .arg(&dockerfile)
        .arg(template_root)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .context("Failed to launch docker build")?;

    // docker writes build progress to stderr; pump it alongside stdout so
    // neither pipe backs up
    let stderr_task = child.stderr.take().map(|stderr| {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                println!("   {line}");
            }
        })
    });

    if let Some(stdout) = child.stdout.take() {
        let mut lines = BufReader::new(stdout).lines();
        while let Some(line) = lines.next_line().await? {
            println!("   {line}");
        }
    }

    if let Some(task) = stderr_task {
        task.await.ok();
    }

    let status = child.wait().await.context("docker build did not finish")?;
    if status.success() {
        ui::print_success("Container built successfully!");
        Ok(())
    } else {
        anyhow::bail!("Container build failed (exit status {status})")
    }
}

/// Copy the `.devcontainer` template into `<dest_root>/sample-project` and
/// rename the universal variants into place
pub fn create_project_template(template_root: &Path, dest_root: &Path) -> Result<()> {
    ui::print_info("Creating project template...");

    let source = template_root.join(".devcontainer");
    if !source.exists() {
        ui::print_warning(&format!(
            "No .devcontainer template found at {}",
            source.display()
        ));
        return Ok(());
    }

    let project_dir = dest_root.join("sample-project");
    let destination = project_dir.join(".devcontainer");
    copy_dir(&source, &destination)?;

    for (old_name, new_name) in TEMPLATE_RENAMES {
        let old_path = destination.join(old_name);
        let new_path = destination.join(new_name);
        if old_path.exists() && !new_path.exists() {
            fs::rename(&old_path, &new_path).with_context(|| {
                format!("Failed to rename {} to {}", old_path.display(), new_name)
            })?;
        }
    }

    ui::print_success(&format!(
        "Sample project created at: {}",
        project_dir.display()
    ));
    println!("   You can copy the .devcontainer folder to any project");
    Ok(())
}

/// Recursive copy, overwriting files that already exist at the destination
fn copy_dir(source: &Path, destination: &Path) -> Result<()> {
    for entry in WalkDir::new(source) {
        let entry = entry.context("Failed to walk template directory")?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .context("Walked entry outside template root")?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {}", target.display()))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)
                .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_copy_applies_renames() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("checkout");
        let devcontainer = root.join(".devcontainer");
        fs::create_dir_all(devcontainer.join("mcp-servers")).unwrap();
        fs::write(devcontainer.join("Dockerfile.universal"), "FROM debian").unwrap();
        fs::write(devcontainer.join("devcontainer.universal.json"), "{}").unwrap();
        fs::write(devcontainer.join("mcp-servers/readme.txt"), "servers").unwrap();

        let dest = tmp.path().join("out");
        fs::create_dir_all(&dest).unwrap();
        create_project_template(&root, &dest).unwrap();

        let copied = dest.join("sample-project/.devcontainer");
        assert!(copied.join("Dockerfile").exists());
        assert!(!copied.join("Dockerfile.universal").exists());
        assert!(copied.join("devcontainer.json").exists());
        assert!(copied.join("mcp-servers/readme.txt").exists());
    }

    #[test]
    fn rename_keeps_existing_target() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("checkout");
        let devcontainer = root.join(".devcontainer");
        fs::create_dir_all(&devcontainer).unwrap();
        fs::write(devcontainer.join("Dockerfile"), "FROM alpine").unwrap();
        fs::write(devcontainer.join("Dockerfile.universal"), "FROM debian").unwrap();

        let dest = tmp.path().join("out");
        fs::create_dir_all(&dest).unwrap();
        create_project_template(&root, &dest).unwrap();

        let copied = dest.join("sample-project/.devcontainer");
        assert_eq!(
            fs::read_to_string(copied.join("Dockerfile")).unwrap(),
            "FROM alpine"
        );
        assert!(copied.join("Dockerfile.universal").exists());
    }

    #[test]
    fn missing_template_is_not_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        create_project_template(&tmp.path().join("nowhere"), tmp.path()).unwrap();
        assert!(!tmp.path().join("sample-project").exists());
    }
}
