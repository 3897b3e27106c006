//! CLI argument parsing for the setup wizard

use clap::Parser;

/// Command-line arguments for forge-setup.
///
/// The wizard is fully interactive and takes no flags of its own; clap
/// supplies `--help` and `--version`.
#[derive(Parser, Clone, Debug)]
#[command(name = "forge-setup")]
#[command(
    version,
    about = "Set up the Forge universal dev container and its MCP add-ons",
    long_about = "Interactive wizard that checks prerequisites, configures your IDE,\n\
                  selects MCP add-ons, collects their credentials, writes the desktop\n\
                  client configuration, and prepares the dev container."
)]
pub struct Cli {}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
