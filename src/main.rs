mod cli;
mod config;
mod container;
mod credentials;
mod error;
mod ide;
mod packages;
mod prereq;
mod registry;
mod ui;
mod wizard;

use anyhow::Result;
use error::SetupError;

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("FATAL: Failed to create Tokio runtime: {e}");
            std::process::exit(1);
        }
    };

    match rt.block_on(real_main()) {
        Ok(()) => {}
        Err(e) => {
            match e.downcast_ref::<SetupError>() {
                Some(SetupError::Interrupted) => {
                    ui::print_warning("\nSetup interrupted by user.");
                }
                Some(SetupError::MissingPrerequisites(_)) => {
                    // Details were already printed by the prerequisite step
                    log::error!("{e:#}");
                }
                None => {
                    ui::print_error(&format!("Setup failed with error: {e:#}"));
                }
            }
            std::process::exit(1);
        }
    }
}

async fn real_main() -> Result<()> {
    let _args = cli::Cli::parse_args();
    wizard::run().await
}
