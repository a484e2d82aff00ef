use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;

use posmap_core::{
    reconcile, segment, DocumentEntry, KeyedComment, Pipeline, PlainText, PosmapConfig,
    PosmapError, Quantity, Unit,
};

const LOOKUP_CSV: &str = "\
belegnummer,assigned_integer
29385,3
29386,7
";

const PRODUCT_MAP_CSV: &str = "\
belegnummer,artikelnummer,comments
29386,R-100,
29386,R-101,Pos. 01.01. PE-HD Rohr
29385,X-1,Pos. 01.01. anderer Beleg
29386,B-200,Pos. 01.02. Bogen
29386,Z-900,Zubehör ohne Position
";

const DOCUMENT: &str = "\
Leistungsverzeichnis Beleg 29386
01.01. Rohrleitung
PE-HD Rohr DN100 liefern
und verlegen
m125,50
01.02. Bogen
Bogen 45 Grad
St4,000
01.03. Schacht ohne Menge
";

fn write_sources(dir: &Path) -> PosmapConfig {
    fs::write(dir.join("lookup.csv"), LOOKUP_CSV).unwrap();
    fs::write(dir.join("mapToProducts.csv"), PRODUCT_MAP_CSV).unwrap();

    let mut config = PosmapConfig::default();
    config.sources.lookup_table = dir.join("lookup.csv");
    config.sources.product_map = dir.join("mapToProducts.csv");
    config.output.directory = dir.join("out");
    config
}

#[test]
fn test_document_to_unified_csv() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = write_sources(dir.path());
    config.output.write_groups = true;
    config.output.write_entries = true;
    config.store.path = Some(dir.path().join("staging.db"));

    let pipeline = Pipeline::new(config);
    let reconciler = pipeline.load_sources().unwrap();
    let output = pipeline
        .run_source(&reconciler, 29386, &PlainText::new(DOCUMENT))
        .unwrap();

    assert_eq!(output.entries.len(), 2);
    assert_eq!(output.reconciliation.assigned_integer, 7);

    let written = pipeline.write_outputs(&output).unwrap();
    assert_eq!(written.len(), 3);

    let unified = fs::read_to_string(dir.path().join("out/29386.csv")).unwrap();
    assert_eq!(
        unified,
        "entry_number,entry_body,quantity,assigned_integer,belegnummer,product_numbers\n\
         01.01,\"PE-HD Rohr DN100 liefern\nund verlegen\",\"125,50 m\",7,29386,\"R-100, R-101\"\n\
         01.02,Bogen 45 Grad,\"4,000 St\",7,29386,B-200\n"
    );

    let groups = fs::read_to_string(dir.path().join("out/29386_groups.csv")).unwrap();
    assert_eq!(
        groups,
        "assigned_integer,belegnummer,product_number,entry_number\n\
         7,29386,\"R-100, R-101\",01.01\n\
         7,29386,B-200,01.02\n"
    );
}

#[test]
fn test_rerun_replaces_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = write_sources(dir.path());
    config.store.path = Some(dir.path().join("staging.db"));

    let pipeline = Pipeline::new(config);
    let reconciler = pipeline.load_sources().unwrap();
    let source = PlainText::new(DOCUMENT);

    let first = pipeline.run_source(&reconciler, 29386, &source).unwrap();
    pipeline.write_outputs(&first).unwrap();
    let first_csv = fs::read_to_string(dir.path().join("out/29386.csv")).unwrap();

    let second = pipeline.run_source(&reconciler, 29386, &source).unwrap();
    pipeline.write_outputs(&second).unwrap();
    let second_csv = fs::read_to_string(dir.path().join("out/29386.csv")).unwrap();

    assert_eq!(first_csv, second_csv);
    assert_eq!(second.reconciliation.keyed_comments.len(), 3);
}

#[test]
fn test_unknown_document_fails() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(write_sources(dir.path()));
    let reconciler = pipeline.load_sources().unwrap();

    let result = pipeline.run_source(&reconciler, 11111, &PlainText::new(DOCUMENT));
    assert!(matches!(result, Err(PosmapError::NoLookupMatch(11111))));
}

#[test]
fn test_missing_source_table() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = write_sources(dir.path());
    config.sources.product_map = dir.path().join("missing.csv");

    let result = Pipeline::new(config).load_sources();
    assert!(matches!(result, Err(PosmapError::SourceNotFound(_))));
}

#[test]
fn test_segment_counts_well_formed_pairs() {
    let mut lines = Vec::new();
    for i in 1..=5 {
        lines.push(format!("2.{}. Position {}", i, i));
        lines.push(format!("Beschreibung {}", i));
        lines.push(format!("St{},0", i));
    }

    let entries = segment(&lines);

    let numbers: Vec<&str> = entries.iter().map(|e| e.entry_number.as_str()).collect();
    assert_eq!(numbers, vec!["2.1", "2.2", "2.3", "2.4", "2.5"]);
}

#[test]
fn test_reconcile_two_products_for_one_entry() {
    let entries = vec![DocumentEntry {
        entry_number: "1.1".to_string(),
        quantity: Quantity::new("5,0", Unit::Metre),
        entry_body: "desc".to_string(),
    }];
    let keyed: Vec<KeyedComment> = ["A100", "A200"]
        .iter()
        .map(|a| KeyedComment {
            belegnummer: 42,
            artikelnummer: a.to_string(),
            comments: "Pos. 1.1.".to_string(),
            entry_number: Some("1.1".to_string()),
            assigned_integer: 7,
        })
        .collect();

    let records = reconcile(&entries, &keyed);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].product_numbers, vec!["A100", "A200"]);
    assert_eq!(records[0].quantity.to_string(), "5,0 m");
    assert_eq!(records[0].belegnummer, 42);
    assert_eq!(records[0].assigned_integer, 7);
}
