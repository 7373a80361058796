//! `livefetch diff`

use std::path::PathBuf;

use clap::Args;
use livefetch_core::diff::render_human_summary;
use livefetch_engine::ControllerConfig;

use super::QueryArgs;
use crate::record::load_records;

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Records as first fetched
    #[arg(long)]
    pub before: PathBuf,

    /// Records as the store holds them at refresh time
    #[arg(long)]
    pub after: PathBuf,

    #[command(flatten)]
    pub query: QueryArgs,
}

pub async fn execute(
    args: DiffArgs,
    config: &ControllerConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let before = load_records(&args.before)?;
    let after = load_records(&args.after)?;

    let (store, controller) = args.query.controller(config, before)?;
    controller.perform_fetch(args.query.request()).await?;
    store.replace_all(after).await;

    let outcome = controller.refresh().await?;
    let script = outcome
        .script()
        .ok_or("refresh was superseded by a concurrent refresh")?;

    if args.query.json {
        println!("{}", serde_json::to_string_pretty(script)?);
    } else {
        print!("{}", render_human_summary(script));
    }
    Ok(())
}
