//! IDE selection and container integration guidance
//!
//! The wizard supports a fixed menu of editors. VS Code gets an automated
//! extension install (best effort); everything else gets printed instructions
//! for pointing the IDE at the built container.

use anyhow::Result;
use tokio::process::Command;

use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ide {
    VsCode,
    AndroidStudio,
    Intellij,
    Clion,
    VisualStudio,
    Pycharm,
    Webstorm,
    Rider,
    Goland,
    Rustrover,
    Eclipse,
    Neovim,
    Emacs,
    Sublime,
    Atom,
    Other,
}

impl Ide {
    pub const ALL: &'static [Ide] = &[
        Ide::VsCode,
        Ide::AndroidStudio,
        Ide::Intellij,
        Ide::Clion,
        Ide::VisualStudio,
        Ide::Pycharm,
        Ide::Webstorm,
        Ide::Rider,
        Ide::Goland,
        Ide::Rustrover,
        Ide::Eclipse,
        Ide::Neovim,
        Ide::Emacs,
        Ide::Sublime,
        Ide::Atom,
        Ide::Other,
    ];

    /// Menu label shown during selection
    pub fn label(self) -> &'static str {
        match self {
            Ide::VsCode => "VS Code (Recommended - Full container support)",
            Ide::AndroidStudio => "Android Studio (Mobile development)",
            Ide::Intellij => "IntelliJ IDEA (Java/Kotlin/Scala projects)",
            Ide::Clion => "CLion (C/C++ projects)",
            Ide::VisualStudio => "Visual Studio (Windows C++/.NET projects)",
            Ide::Pycharm => "PyCharm (Python development)",
            Ide::Webstorm => "WebStorm (Web development)",
            Ide::Rider => "Rider (C#/.NET development)",
            Ide::Goland => "GoLand (Go development)",
            Ide::Rustrover => "RustRover (Rust development)",
            Ide::Eclipse => "Eclipse (Java/C++ development)",
            Ide::Neovim => "Neovim/Vim (Terminal-based)",
            Ide::Emacs => "Emacs (Terminal/GUI-based)",
            Ide::Sublime => "Sublime Text (Lightweight editor)",
            Ide::Atom => "Atom (GitHub's editor)",
            Ide::Other => "Other IDE (Manual setup required)",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Ide::VsCode => "VS Code",
            Ide::AndroidStudio => "Android Studio",
            Ide::Intellij => "IntelliJ IDEA",
            Ide::Clion => "CLion",
            Ide::VisualStudio => "Visual Studio",
            Ide::Pycharm => "PyCharm",
            Ide::Webstorm => "WebStorm",
            Ide::Rider => "Rider",
            Ide::Goland => "GoLand",
            Ide::Rustrover => "RustRover",
            Ide::Eclipse => "Eclipse",
            Ide::Neovim => "Neovim",
            Ide::Emacs => "Emacs",
            Ide::Sublime => "Sublime Text",
            Ide::Atom => "Atom",
            Ide::Other => "Other IDE",
        }
    }

    pub fn is_jetbrains(self) -> bool {
        matches!(
            self,
            Ide::AndroidStudio
                | Ide::Intellij
                | Ide::Clion
                | Ide::Pycharm
                | Ide::Webstorm
                | Ide::Rider
                | Ide::Goland
                | Ide::Rustrover
        )
    }

    pub fn is_terminal_based(self) -> bool {
        matches!(self, Ide::Neovim | Ide::Emacs)
    }

    pub fn is_lightweight(self) -> bool {
        matches!(self, Ide::Sublime | Ide::Atom)
    }
}

/// Ask which IDE the user primarily works in
pub fn select_ide() -> Result<Ide> {
    let labels: Vec<&'static str> = Ide::ALL.iter().map(|ide| ide.label()).collect();
    let choice = ui::select_option("Which IDE do you primarily use?", labels)?;
    Ok(Ide::ALL[choice])
}

/// Extensions VS Code needs for container development
const VSCODE_EXTENSIONS: &[&str] = &[
    "ms-vscode-remote.remote-containers",
    "ms-vscode.remote-explorer",
    "GitHub.copilot",
    "GitHub.copilot-chat",
];

/// Run IDE-specific setup; everything in here is best effort
pub async fn run_ide_setup(ide: Ide) -> Result<()> {
    match ide {
        Ide::VsCode => setup_vscode().await,
        _ if ide.is_jetbrains() => {
            setup_jetbrains(ide);
            Ok(())
        }
        Ide::VisualStudio => {
            setup_visual_studio();
            Ok(())
        }
        Ide::Eclipse => {
            setup_eclipse();
            Ok(())
        }
        _ if ide.is_terminal_based() => {
            setup_terminal_based(ide);
            Ok(())
        }
        _ if ide.is_lightweight() => {
            setup_lightweight(ide);
            Ok(())
        }
        _ => {
            ui::print_warning("Manual setup required for your IDE.");
            println!("Please refer to the documentation for container integration.");
            Ok(())
        }
    }
}

async fn setup_vscode() -> Result<()> {
    println!("\nSetting up VS Code with Dev Containers...");
    println!("Required VS Code extensions:");
    for extension in VSCODE_EXTENSIONS {
        println!("  • {extension}");
    }

    if ui::ask_yes_no("Would you like to install these extensions automatically?", true)? {
        for extension in VSCODE_EXTENSIONS {
            match Command::new("code")
                .args(["--install-extension", extension])
                .output()
                .await
            {
                Ok(output) if output.status.success() => {
                    ui::print_success(&format!("Installed {extension}"));
                }
                Ok(_) | Err(_) => {
                    ui::print_warning(&format!("Could not install {extension} (install manually)"));
                }
            }
        }
    }

    ui::print_info("VS Code Setup Instructions:");
    println!("1. Open your project folder in VS Code");
    println!("2. Copy the .devcontainer folder to your project root");
    println!("3. When prompted, click 'Reopen in Container'");
    println!("4. VS Code will build and start the container automatically");
    Ok(())
}

fn setup_jetbrains(ide: Ide) {
    let name = ide.display_name();
    println!("\nSetting up {name} with Docker integration...");
    ui::print_info(&format!("{name} Setup Instructions:"));
    println!("1. Install the Docker plugin in your IDE");
    println!("2. Configure Docker connection (Settings → Docker)");
    println!("3. Build the container: docker build -t forge-dev-container .");
    println!("4. Run container with volume mounts for your project");
    println!("5. Configure remote toolchain to use the container");

    let extra: &[&str] = match ide {
        Ide::Clion => &[
            "6. Set toolchain to Docker (Settings → Toolchains)",
            "7. Configure CMake to use the Docker toolchain",
            "8. Set CMake options: -G Ninja -DCMAKE_BUILD_TYPE=Debug",
        ],
        Ide::AndroidStudio => &[
            "6. Configure Android SDK path: /opt/android-sdk",
            "7. Set up Flutter SDK path: /opt/flutter",
            "8. Configure Docker as build environment",
        ],
        Ide::Intellij => &[
            "6. Set Project SDK to container's Java installation",
            "7. Configure Maven/Gradle to use container environment",
            "8. Set up remote debugging if needed",
        ],
        Ide::Pycharm => &[
            "6. Configure Python interpreter in container",
            "7. Set up remote development server",
            "8. Configure package management with pip/poetry in container",
        ],
        Ide::Webstorm => &[
            "6. Configure Node.js interpreter in container",
            "7. Set up npm/yarn/pnpm to use container environment",
            "8. Configure debugging and testing frameworks",
        ],
        Ide::Rider => &[
            "6. Configure .NET SDK in container",
            "7. Set up NuGet package sources",
            "8. Configure debugging and testing",
        ],
        Ide::Goland => &[
            "6. Configure Go SDK in container",
            "7. Set GOPATH and GOROOT to container paths",
            "8. Configure module proxy and testing",
        ],
        Ide::Rustrover => &[
            "6. Configure Rust toolchain in container",
            "7. Set up Cargo and rustup paths",
            "8. Configure clippy and rustfmt",
        ],
        _ => &[],
    };

    if !extra.is_empty() {
        println!("\n{name}-specific steps:");
        for line in extra {
            println!("{line}");
        }
    }
}

fn setup_visual_studio() {
    println!("\nSetting up Visual Studio with Docker integration...");
    ui::print_info("Visual Studio Setup Instructions:");
    println!("1. Install 'Container Development Tools' workload");
    println!("2. Install Docker Desktop for Windows");
    println!("3. Add .devcontainer folder to your project");
    println!("4. Use 'Open Folder in Container' feature");
    println!("5. Configure CMake settings for C++ projects");
    println!("\nVisual Studio-specific notes:");
    println!("• Enable WSL2 integration in Docker Desktop");
    println!("• Use 'Remote - Containers' extension if available");
    println!("• Configure debugging for containerized applications");
}

fn setup_eclipse() {
    println!("\nSetting up Eclipse with Docker integration...");
    ui::print_info("Eclipse Setup Instructions:");
    println!("1. Install Docker Tooling from Eclipse Marketplace");
    println!("2. Install Remote Development Tools (if available)");
    println!("3. Build container: docker build -t forge-dev-container .");
    println!("4. Run container with workspace mounted");
    println!("5. Configure remote projects and build tools");
}

fn setup_terminal_based(ide: Ide) {
    let name = ide.display_name();
    println!("\nSetting up {name} with container development...");
    ui::print_info(&format!("{name} Setup Instructions:"));
    println!("1. Build the container: docker build -t forge-dev-container .");
    println!("2. Run container interactively:");
    println!("   docker run -it --rm -v $(pwd):/workspace forge-dev-container");
    println!("3. Use your editor inside the container environment");
    println!("4. Install language servers and plugins in container");

    match ide {
        Ide::Neovim => {
            println!("\nNeovim-specific setup:");
            println!("• Configure LSP servers for all languages");
            println!("• Install plugins: nvim-lspconfig, telescope, treesitter");
            println!("• Set up debugging with nvim-dap");
        }
        Ide::Emacs => {
            println!("\nEmacs-specific setup:");
            println!("• Install language modes for all languages");
            println!("• Configure company-mode for completions");
            println!("• Set up projectile for project management");
        }
        _ => {}
    }
}

fn setup_lightweight(ide: Ide) {
    let name = ide.display_name();
    println!("\nSetting up {name} with container development...");
    ui::print_info(&format!("{name} Setup Instructions:"));
    println!("1. Install Docker/container-related packages");
    println!("2. Build container: docker build -t forge-dev-container .");
    println!("3. Use integrated terminal to run container commands");
    println!("4. Configure build systems for containerized development");

    match ide {
        Ide::Sublime => {
            println!("\nSublime Text packages to install:");
            println!("• Docker");
            println!("• LSP (Language Server Protocol)");
            println!("• Terminus (integrated terminal)");
            println!("• GitGutter");
        }
        Ide::Atom => {
            println!("\nAtom packages to install:");
            println!("• docker");
            println!("• atom-ide-ui");
            println!("• platformio-ide-terminal");
            println!("• git-plus");
        }
        _ => {}
    }
}

/// Print the post-setup checklist for the chosen IDE
pub fn print_next_steps(ide: Ide) {
    let steps: &[&str] = if ide == Ide::VsCode {
        &[
            "1. Open VS Code in your project directory",
            "2. Copy the .devcontainer folder to your project root",
            "3. Press Ctrl+Shift+P and select 'Dev Containers: Reopen in Container'",
            "4. VS Code will build and start the container automatically",
        ]
    } else if ide.is_jetbrains() {
        &[
            "1. Copy the .devcontainer folder to your project root",
            "2. Install Docker plugin in your JetBrains IDE",
            "3. Build the container: docker build -t my-project .",
            "4. Configure remote toolchain to use the container",
            "5. Set up project SDK/interpreter to use container environment",
        ]
    } else if ide == Ide::VisualStudio {
        &[
            "1. Install 'Container Development Tools' workload",
            "2. Copy the .devcontainer folder to your project root",
            "3. Use 'Open Folder in Container' feature",
            "4. Configure build and debugging for container",
        ]
    } else if ide == Ide::Eclipse {
        &[
            "1. Install Docker Tooling from Eclipse Marketplace",
            "2. Copy the .devcontainer folder to your project root",
            "3. Build the container: docker build -t my-project .",
            "4. Configure remote projects and launch configurations",
        ]
    } else if ide.is_terminal_based() {
        &[
            "1. Build the container: docker build -t my-project .",
            "2. Run container: docker run -it --rm -v $(pwd):/workspace my-project",
            "3. Use your editor inside the container environment",
            "4. Configure language servers and plugins",
        ]
    } else if ide.is_lightweight() {
        &[
            "1. Install Docker/container packages in your editor",
            "2. Build the container: docker build -t my-project .",
            "3. Use integrated terminal for container commands",
            "4. Configure build systems for containerized development",
        ]
    } else {
        &[
            "1. Copy the .devcontainer folder to your project root",
            "2. Build the container: docker build -t my-project .",
            "3. Run the container with your project mounted",
            "4. Configure your IDE to use the container",
        ]
    };

    for step in steps {
        println!("{step}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_covers_all_ides() {
        assert_eq!(Ide::ALL.len(), 16);
        assert_eq!(Ide::ALL.first(), Some(&Ide::VsCode));
        assert_eq!(Ide::ALL.last(), Some(&Ide::Other));
    }

    // select_ide maps the chosen menu index straight back into ALL, so the
    // labels must stay distinct and aligned with the variants
    #[test]
    fn menu_labels_are_unique() {
        let mut seen = std::collections::BTreeSet::new();
        for ide in Ide::ALL {
            assert!(seen.insert(ide.label()), "duplicate label {}", ide.label());
        }
    }

    #[test]
    fn ide_families_are_disjoint() {
        for ide in Ide::ALL {
            let families = [
                ide.is_jetbrains(),
                ide.is_terminal_based(),
                ide.is_lightweight(),
            ];
            assert!(families.iter().filter(|f| **f).count() <= 1);
        }
        assert!(Ide::Rustrover.is_jetbrains());
        assert!(!Ide::VsCode.is_jetbrains());
    }
}
