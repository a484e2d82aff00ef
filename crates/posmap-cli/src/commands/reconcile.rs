//! Reconcile command - map one document's entries to product numbers.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use posmap_core::Pipeline;

use super::{document_number_from, ensure_input_kept, load_config, run_document};

/// Arguments for the reconcile command.
#[derive(Args)]
pub struct ReconcileArgs {
    /// Input file (PDF, text, or segmented entries CSV)
    #[arg(required = true)]
    input: PathBuf,

    /// Document number (default: taken from the file name)
    #[arg(short, long)]
    document: Option<i64>,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also write the aggregated product groups
    #[arg(long)]
    groups: bool,

    /// Also write the segmented entries
    #[arg(long)]
    entries: bool,

    /// SQLite database used to stage entries and keyed comments
    #[arg(long)]
    db: Option<PathBuf>,

    /// Print the reconciled records as JSON instead of writing files
    #[arg(long)]
    json: bool,
}

pub fn run(args: ReconcileArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let belegnummer = match args.document.or_else(|| document_number_from(&args.input)) {
        Some(n) => n,
        None => anyhow::bail!(
            "Cannot derive a document number from {}. Pass --document.",
            args.input.display()
        ),
    };

    if let Some(dir) = args.output_dir {
        config.output.directory = dir;
    }
    if args.db.is_some() {
        config.store.path = args.db;
    }
    config.output.write_groups |= args.groups;
    config.output.write_entries |= args.entries;

    info!("Reconciling {} as document {}", args.input.display(), belegnummer);

    let pipeline = Pipeline::new(config);
    if !args.json {
        ensure_input_kept(&pipeline, &args.input, belegnummer)?;
    }
    let reconciler = pipeline.load_sources()?;
    let output = run_document(&pipeline, &reconciler, &args.input, belegnummer)?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&output.reconciliation.records)?
        );
        return Ok(());
    }

    let written = pipeline.write_outputs(&output)?;
    let unmatched = output
        .entries
        .len()
        .saturating_sub(output.reconciliation.records.len());

    println!(
        "{} Document {}: {} entries, {} with products (assigned integer {})",
        style("✓").green(),
        belegnummer,
        output.entries.len(),
        output.reconciliation.records.len(),
        output.reconciliation.assigned_integer
    );
    if unmatched > 0 {
        println!(
            "{} {} entries have no product mapping",
            style("ℹ").blue(),
            unmatched
        );
    }
    for path in &written {
        println!("  {}", path.display());
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
