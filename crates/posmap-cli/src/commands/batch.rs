//! Batch reconciliation of multiple document files.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use posmap_core::{Pipeline, Reconciler};

use super::{
    document_number_from, ensure_input_kept, extension_of, is_written_output, load_config,
    run_document, DOCUMENT_EXTENSIONS, SUMMARY_FILE,
};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input files, e.g. "docs/*.pdf"
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also write the aggregated product groups
    #[arg(long)]
    groups: bool,

    /// Also write a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct BatchResult {
    path: PathBuf,
    belegnummer: Option<i64>,
    entries: usize,
    records: usize,
    error: Option<String>,
    processing_time_ms: u64,
}

pub fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = load_config(config_path)?;

    if let Some(dir) = args.output_dir.clone() {
        config.output.directory = dir;
    }
    config.output.write_groups |= args.groups;

    let pipeline = Pipeline::new(config);

    let (previous, files): (Vec<PathBuf>, Vec<PathBuf>) = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| DOCUMENT_EXTENSIONS.contains(&extension_of(p).as_str()))
        .partition(|p| is_written_output(&pipeline, p));

    for path in &previous {
        debug!("Skipping earlier output {}", path.display());
    }

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );
    if !previous.is_empty() {
        println!(
            "{} Skipping {} files written by earlier runs",
            style("ℹ").blue(),
            previous.len()
        );
    }

    let reconciler = pipeline.load_sources()?;

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files",
            )?
            .progress_chars("=>-"),
    );

    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let belegnummer = document_number_from(&path);
        let result = process_single_file(&pipeline, &reconciler, &path, belegnummer);
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match result {
            Ok((entries, records)) => results.push(BatchResult {
                path,
                belegnummer,
                entries,
                records,
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push(BatchResult {
                        path,
                        belegnummer,
                        entries: 0,
                        records: 0,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    if args.summary {
        let summary_path = pipeline.config().output.directory.join(SUMMARY_FILE);
        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(results.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Reconcile one file and write its outputs. Returns entry and record counts.
fn process_single_file(
    pipeline: &Pipeline,
    reconciler: &Reconciler,
    path: &PathBuf,
    belegnummer: Option<i64>,
) -> anyhow::Result<(usize, usize)> {
    let Some(belegnummer) = belegnummer else {
        anyhow::bail!("File name is not a document number");
    };

    ensure_input_kept(pipeline, path, belegnummer)?;
    let output = run_document(pipeline, reconciler, path, belegnummer)?;
    pipeline.write_outputs(&output)?;

    Ok((output.entries.len(), output.reconciliation.records.len()))
}

fn write_summary(path: &PathBuf, results: &[BatchResult]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "belegnummer",
        "status",
        "entries",
        "records",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name().and_then(|s| s.to_str()).unwrap_or("");
        let status = match result.error {
            Some(_) => "error",
            None => "success",
        };

        wtr.write_record([
            filename,
            &result.belegnummer.map(|n| n.to_string()).unwrap_or_default(),
            status,
            &result.entries.to_string(),
            &result.records.to_string(),
            &result.processing_time_ms.to_string(),
            result.error.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
