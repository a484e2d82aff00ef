//! CLI subcommands and their shared helpers.

pub mod batch;
pub mod config;
pub mod import_lookup;
pub mod lookup;
pub mod reconcile;
pub mod segment;

use std::path::{Path, PathBuf};

use posmap_core::document::PlainText;
use posmap_core::models::config::PosmapConfig;
use posmap_core::{
    is_output_file_name, tables, DocumentEntry, PdfExtractor, Pipeline, Reconciler, RunOutput,
    TextSource,
};

/// Extensions accepted as document input.
pub const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "txt", "csv"];

/// Name of the batch summary written into the output directory.
pub const SUMMARY_FILE: &str = "summary.csv";

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// Default location of the user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("posmap")
        .join("config.json")
}

/// Load the configuration named by `-c`, else the user file, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PosmapConfig> {
    if let Some(path) = config_path {
        return Ok(PosmapConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        Ok(PosmapConfig::from_file(&default_path)?)
    } else {
        Ok(PosmapConfig::default())
    }
}

/// Lower-cased extension of a path, empty when absent.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Document number taken from a file stem such as `29386.pdf`.
pub fn document_number_from(path: &Path) -> Option<i64> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.trim().parse().ok())
}

/// Read a document's entries. PDF and text files are segmented, CSV files
/// are read as already segmented entries.
pub fn read_entries(path: &Path) -> anyhow::Result<Vec<DocumentEntry>> {
    match extension_of(path).as_str() {
        "csv" => Ok(tables::read_document_entries(path)?),
        _ => Ok(posmap_core::segment(&read_lines(path)?)),
    }
}

/// Read a document's text lines.
pub fn read_lines(path: &Path) -> anyhow::Result<Vec<String>> {
    let lines = match extension_of(path).as_str() {
        "pdf" => PdfExtractor::open(path)?.read_lines()?,
        "txt" => PlainText::from_file(path)?.read_lines()?,
        other => anyhow::bail!("Unsupported file format: {}", other),
    };
    Ok(lines)
}

/// Run the pipeline for one document file.
pub fn run_document(
    pipeline: &Pipeline,
    reconciler: &Reconciler,
    path: &Path,
    belegnummer: i64,
) -> anyhow::Result<RunOutput> {
    let output = match extension_of(path).as_str() {
        "csv" => pipeline.run_entries(reconciler, belegnummer, read_entries(path)?)?,
        _ => pipeline.run(reconciler, belegnummer, &read_lines(path)?)?,
    };
    Ok(output)
}

/// Directory holding `path`, resolved to an absolute path.
fn resolved_parent(path: &Path) -> Option<PathBuf> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    parent.canonicalize().ok()
}

/// Absolute form of a path whose file may not exist yet.
fn resolve(path: &Path) -> Option<PathBuf> {
    match path.canonicalize() {
        Ok(resolved) => Some(resolved),
        Err(_) => Some(resolved_parent(path)?.join(path.file_name()?)),
    }
}

/// Fail when writing a document's outputs would replace the input file.
pub fn ensure_input_kept(
    pipeline: &Pipeline,
    input: &Path,
    belegnummer: i64,
) -> anyhow::Result<()> {
    let Some(input_path) = resolve(input) else {
        return Ok(());
    };
    for output in pipeline.output_paths(belegnummer) {
        if resolve(&output).as_ref() == Some(&input_path) {
            anyhow::bail!(
                "Output {} would overwrite the input file. Pass a different --output-dir.",
                output.display()
            );
        }
    }
    Ok(())
}

/// Whether `path` is a file written by an earlier run into the output directory.
pub fn is_written_output(pipeline: &Pipeline, path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
    if name != SUMMARY_FILE && !is_output_file_name(name) {
        return false;
    }
    let output_dir = pipeline.config().output.directory.canonicalize().ok();
    output_dir.is_some() && resolved_parent(path) == output_dir
}
