//! Segment command - split a document into numbered entries.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use posmap_core::{tables, DocumentEntry};

use super::{read_entries, OutputFormat};

/// Arguments for the segment command.
#[derive(Args)]
pub struct SegmentArgs {
    /// Input file (PDF or text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,
}

pub fn run(args: SegmentArgs) -> anyhow::Result<()> {
    let start = Instant::now();

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Segmenting file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Reading document...");

    let entries = read_entries(&args.input)?;

    pb.finish_and_clear();
    debug!("Found {} entries", entries.len());

    let output = format_entries(&entries, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} {} entries written to {}",
            style("✓").green(),
            entries.len(),
            output_path.display()
        );
    } else {
        print!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn format_entries(entries: &[DocumentEntry], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(entries)?)),
        OutputFormat::Csv => {
            let mut buf = Vec::new();
            tables::write_document_entries_to(&mut buf, entries)?;
            Ok(String::from_utf8(buf)?)
        }
        OutputFormat::Text => Ok(format_text(entries)),
    }
}

fn format_text(entries: &[DocumentEntry]) -> String {
    let mut output = String::new();

    for entry in entries {
        let quantity = match entry.quantity.value() {
            Some(value) => format!("{} {}", value, entry.quantity.unit),
            None => entry.quantity.to_string(),
        };
        output.push_str(&format!("{}  {}\n", entry.entry_number, quantity));
        for line in entry.entry_body.lines() {
            output.push_str(&format!("    {}\n", line));
        }
    }
    output.push_str(&format!("\n{} entries\n", entries.len()));

    output
}
