//! Lookup command - query the lookup table in either direction.

use std::path::PathBuf;

use clap::{ArgGroup, Args};
use tracing::info;

use posmap_core::{tables, LookupTable, Store};

use super::load_config;

/// Arguments for the lookup command.
#[derive(Args)]
#[command(group(ArgGroup::new("query").required(true).args(["assigned_integer", "document"])))]
pub struct LookupArgs {
    /// Find the document number carrying this assigned integer
    #[arg(short, long)]
    assigned_integer: Option<i64>,

    /// Find the assigned integer of this document number
    #[arg(short, long)]
    document: Option<i64>,

    /// Lookup CSV (default: from configuration)
    #[arg(short, long)]
    table: Option<PathBuf>,

    /// Read the lookup table from a staging database instead
    #[arg(long, conflicts_with = "table")]
    db: Option<PathBuf>,
}

pub fn run(args: LookupArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let lookup = load_lookup(&args, config_path)?;
    info!("Lookup table has {} rows", lookup.len());

    if let Some(belegnummer) = args.document {
        let assigned_integer = lookup.assigned_integer_for(belegnummer)?;
        println!("{}", assigned_integer);
    } else if let Some(assigned_integer) = args.assigned_integer {
        match lookup.belegnummer_for(assigned_integer) {
            Some(belegnummer) => println!("{}", belegnummer),
            None => anyhow::bail!("No document with assigned integer {}", assigned_integer),
        }
    }

    Ok(())
}

fn load_lookup(args: &LookupArgs, config_path: Option<&str>) -> anyhow::Result<LookupTable> {
    if let Some(db) = &args.db {
        if !db.exists() {
            anyhow::bail!("Database not found: {}", db.display());
        }
        return Ok(LookupTable::new(Store::open(db)?.load_lookup()?));
    }

    let path = match &args.table {
        Some(path) => path.clone(),
        None => load_config(config_path)?.sources.lookup_table,
    };
    Ok(LookupTable::new(tables::read_lookup_table(&path)?))
}
