//! Import-lookup command - load a lookup CSV into the staging database.

use std::path::PathBuf;

use clap::Args;
use console::style;

use posmap_core::{tables, Store};

use super::load_config;

/// Arguments for the import-lookup command.
#[derive(Args)]
pub struct ImportLookupArgs {
    /// Lookup CSV (default: from configuration)
    input: Option<PathBuf>,

    /// Target database (default: the configured store path)
    #[arg(long)]
    db: Option<PathBuf>,
}

pub fn run(args: ImportLookupArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let input = args.input.unwrap_or(config.sources.lookup_table);
    let Some(db) = args.db.or(config.store.path) else {
        anyhow::bail!("No database given. Pass --db or set store.path in the configuration.");
    };

    let records = tables::read_lookup_table(&input)?;

    if let Some(parent) = db.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut store = Store::open(&db)?;
    store.replace_lookup(&records)?;

    println!(
        "{} Imported {} lookup rows into {}",
        style("✓").green(),
        records.len(),
        db.display()
    );

    Ok(())
}
