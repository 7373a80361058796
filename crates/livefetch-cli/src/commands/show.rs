//! `livefetch show`

use std::path::PathBuf;

use clap::Args;
use livefetch_engine::ControllerConfig;

use super::{render_snapshot, QueryArgs};
use crate::record::load_records;

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// JSON array of records
    #[arg(long)]
    pub input: PathBuf,

    #[command(flatten)]
    pub query: QueryArgs,
}

pub async fn execute(
    args: ShowArgs,
    config: &ControllerConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let rows = load_records(&args.input)?;
    let (_store, controller) = args.query.controller(config, rows)?;
    controller.perform_fetch(args.query.request()).await?;

    let snapshot = controller.snapshot()?;
    if args.query.json {
        println!("{}", serde_json::to_string_pretty(&snapshot.list_view())?);
    } else {
        print!("{}", render_snapshot(&snapshot));
    }
    Ok(())
}
