//! End-to-end processing of one document.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::document::{segment, TextSource};
use crate::error::Result;
use crate::models::config::PosmapConfig;
use crate::models::entry::DocumentEntry;
use crate::reconcile::{LookupTable, Reconciler, Reconciliation};
use crate::store::Store;
use crate::tables;

const GROUPS_SUFFIX: &str = "_groups";
const ENTRIES_SUFFIX: &str = "_entries";

/// Output of one pipeline run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Entries segmented from the document text.
    pub entries: Vec<DocumentEntry>,
    /// Reconciliation of those entries with the reference tables.
    pub reconciliation: Reconciliation,
}

/// Runs segmentation and reconciliation with a fixed configuration.
pub struct Pipeline {
    config: PosmapConfig,
}

impl Pipeline {
    pub fn new(config: PosmapConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PosmapConfig {
        &self.config
    }

    /// Load the configured reference tables into a reconciler.
    pub fn load_sources(&self) -> Result<Reconciler> {
        let lookup = tables::read_lookup_table(&self.config.sources.lookup_table)?;
        let product_map = tables::read_product_map(&self.config.sources.product_map)?;
        info!(
            "Loaded {} lookup rows and {} product rows",
            lookup.len(),
            product_map.len()
        );
        Reconciler::new(LookupTable::new(lookup), product_map, &self.config.extraction)
    }

    /// Process a document given as text lines.
    pub fn run<S: AsRef<str>>(
        &self,
        reconciler: &Reconciler,
        belegnummer: i64,
        lines: &[S],
    ) -> Result<RunOutput> {
        info!("Processing document {} ({} lines)", belegnummer, lines.len());
        self.run_entries(reconciler, belegnummer, segment(lines))
    }

    /// Process a document whose entries were already segmented.
    pub fn run_entries(
        &self,
        reconciler: &Reconciler,
        belegnummer: i64,
        entries: Vec<DocumentEntry>,
    ) -> Result<RunOutput> {
        let (assigned_integer, keyed_comments) = reconciler.keyed_comments(belegnummer)?;

        let (entries, keyed_comments) = match &self.config.store.path {
            Some(path) => {
                let mut store = Store::open(path)?;
                store.replace_entries(&entries)?;
                store.replace_keyed_comments(&keyed_comments)?;
                debug!("Staged document {} in {}", belegnummer, path.display());
                (store.load_entries()?, store.load_keyed_comments()?)
            }
            None => (entries, keyed_comments),
        };

        let reconciliation =
            reconciler.finish(belegnummer, assigned_integer, keyed_comments, &entries);

        Ok(RunOutput {
            entries,
            reconciliation,
        })
    }

    /// Process a document read from a text source.
    pub fn run_source(
        &self,
        reconciler: &Reconciler,
        belegnummer: i64,
        source: &dyn TextSource,
    ) -> Result<RunOutput> {
        let lines = source.read_lines()?;
        self.run(reconciler, belegnummer, &lines)
    }

    /// Paths `write_outputs` writes for a document, given the enabled outputs.
    pub fn output_paths(&self, belegnummer: i64) -> Vec<PathBuf> {
        let output = &self.config.output;
        let mut paths = vec![self.output_path(belegnummer, "")];
        if output.write_groups {
            paths.push(self.output_path(belegnummer, GROUPS_SUFFIX));
        }
        if output.write_entries {
            paths.push(self.output_path(belegnummer, ENTRIES_SUFFIX));
        }
        paths
    }

    /// Write the run's files into the output directory. Returns their paths.
    pub fn write_outputs(&self, output: &RunOutput) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.config.output.directory)?;
        let belegnummer = output.reconciliation.belegnummer;
        let mut written = Vec::new();

        let path = self.output_path(belegnummer, "");
        tables::write_unified(&path, &output.reconciliation.records)?;
        written.push(path);

        if self.config.output.write_groups {
            let path = self.output_path(belegnummer, GROUPS_SUFFIX);
            tables::write_groups(&path, &output.reconciliation.groups)?;
            written.push(path);
        }

        if self.config.output.write_entries {
            let path = self.output_path(belegnummer, ENTRIES_SUFFIX);
            tables::write_document_entries(&path, &output.entries)?;
            written.push(path);
        }

        Ok(written)
    }

    fn output_path(&self, belegnummer: i64, suffix: &str) -> PathBuf {
        self.config
            .output
            .directory
            .join(format!("{}{}.csv", belegnummer, suffix))
    }
}

/// Whether a file name has the shape of a file `write_outputs` produces.
pub fn is_output_file_name(name: &str) -> bool {
    let Some(stem) = name.strip_suffix(".csv") else {
        return false;
    };
    let stem = stem
        .strip_suffix(GROUPS_SUFFIX)
        .or_else(|| stem.strip_suffix(ENTRIES_SUFFIX))
        .unwrap_or(stem);
    stem.parse::<i64>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PlainText;
    use crate::error::PosmapError;
    use crate::models::config::ExtractionConfig;
    use crate::models::records::{LookupRecord, ProductMapRow};

    const DOCUMENT: &str = "\
Leistungsverzeichnis
1.1. Rohr
PE-HD DN100
m12,50
1.2. Bogen
St4,0
1.3. Schacht
";

    fn reconciler() -> Reconciler {
        Reconciler::new(
            LookupTable::new(vec![LookupRecord::new(42, 7)]),
            vec![
                ProductMapRow::new(42, "A100", None),
                ProductMapRow::new(42, "A200", Some("Pos. 1.1. Rohr")),
                ProductMapRow::new(42, "B100", Some("Pos. 1.2. Bogen")),
            ],
            &ExtractionConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_run_without_store() {
        let pipeline = Pipeline::new(PosmapConfig::default());
        let output = pipeline
            .run_source(&reconciler(), 42, &PlainText::new(DOCUMENT))
            .unwrap();

        assert_eq!(output.entries.len(), 2);
        let records = &output.reconciliation.records;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].product_numbers, vec!["A100", "A200"]);
        assert_eq!(records[0].entry_body, "PE-HD DN100");
        assert_eq!(records[1].product_numbers, vec!["B100"]);
    }

    #[test]
    fn test_run_with_store_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PosmapConfig::default();
        config.store.path = Some(dir.path().join("staging.db"));
        let pipeline = Pipeline::new(config);
        let reconciler = reconciler();
        let lines: Vec<&str> = DOCUMENT.lines().collect();

        let first = pipeline.run(&reconciler, 42, &lines).unwrap();
        let second = pipeline.run(&reconciler, 42, &lines).unwrap();

        assert_eq!(first.reconciliation.records, second.reconciliation.records);
        assert_eq!(second.reconciliation.keyed_comments.len(), 3);
    }

    #[test]
    fn test_run_unknown_document() {
        let pipeline = Pipeline::new(PosmapConfig::default());
        let result = pipeline.run(&reconciler(), 1, &["1.1.", "m1,0"]);
        assert!(matches!(result, Err(PosmapError::NoLookupMatch(1))));
    }

    #[test]
    fn test_write_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PosmapConfig::default();
        config.output.directory = dir.path().join("out");
        config.output.write_groups = true;
        let pipeline = Pipeline::new(config);

        let output = pipeline.run(&reconciler(), 42, &["1.2.", "St1,0"]).unwrap();
        let written = pipeline.write_outputs(&output).unwrap();

        assert_eq!(written, pipeline.output_paths(42));
        assert_eq!(written.len(), 2);
        let unified = std::fs::read_to_string(&written[0]).unwrap();
        assert!(unified.contains("1.2,,\"1,0 St\",7,42,B100"));
        let groups = std::fs::read_to_string(&written[1]).unwrap();
        assert!(groups.starts_with("assigned_integer,belegnummer,product_number,entry_number\n"));
    }

    #[test]
    fn test_output_paths_follow_config() {
        let mut config = PosmapConfig::default();
        config.output.directory = PathBuf::from("out");
        assert_eq!(
            Pipeline::new(config.clone()).output_paths(42),
            vec![PathBuf::from("out/42.csv")]
        );

        config.output.write_groups = true;
        config.output.write_entries = true;
        assert_eq!(
            Pipeline::new(config).output_paths(42),
            vec![
                PathBuf::from("out/42.csv"),
                PathBuf::from("out/42_groups.csv"),
                PathBuf::from("out/42_entries.csv"),
            ]
        );
    }

    #[test]
    fn test_is_output_file_name() {
        assert!(is_output_file_name("29386.csv"));
        assert!(is_output_file_name("29386_groups.csv"));
        assert!(is_output_file_name("29386_entries.csv"));
        assert!(!is_output_file_name("29386.txt"));
        assert!(!is_output_file_name("summary.csv"));
        assert!(!is_output_file_name("leistungen_groups.csv"));
    }
}
