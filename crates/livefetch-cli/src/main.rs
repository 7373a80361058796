//! livefetch CLI
//!
//! Loads JSON record files into a results controller and prints the
//! sectioned view or the edit script between two batches.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use livefetch_core::logging_facility::{init, Profile};
use livefetch_engine::ControllerConfig;

mod commands;
mod record;

#[derive(Debug, Parser)]
#[command(name = "livefetch")]
#[command(about = "Live fetched results over JSON record files", long_about = None)]
struct Cli {
    /// Controller configuration (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Logging profile: development, production or test
    #[arg(long, global = true, default_value = "development")]
    log_profile: Profile,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the sectioned view of one record file
    Show(commands::show::ShowArgs),
    /// Print the edit script that turns one record file into another
    Diff(commands::diff::DiffArgs),
}

fn load_config(path: Option<&PathBuf>) -> Result<ControllerConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(ControllerConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    Ok(ControllerConfig::from_toml_str(&text)?)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init(cli.log_profile);

    let result = match load_config(cli.config.as_ref()) {
        Ok(config) => match cli.command {
            Commands::Show(args) => commands::show::execute(args, &config).await,
            Commands::Diff(args) => commands::diff::execute(args, &config).await,
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
