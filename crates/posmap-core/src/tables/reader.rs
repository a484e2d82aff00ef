//! CSV ingestion of the reference tables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::{PosmapError, Result};
use crate::models::entry::{DocumentEntry, Quantity};
use crate::models::records::{LookupRecord, ProductMapRow};

/// Header positions of the required columns of one table.
struct Columns<'a> {
    table: &'a str,
    indices: Vec<usize>,
}

impl<'a> Columns<'a> {
    fn locate(table: &'a str, headers: &StringRecord, names: &[&str]) -> Result<Self> {
        let indices = names
            .iter()
            .map(|name| {
                headers
                    .iter()
                    .position(|h| h.trim() == *name)
                    .ok_or_else(|| PosmapError::MissingRequiredColumn {
                        table: table.to_string(),
                        column: name.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { table, indices })
    }

    /// Raw field of column `column` (position in `names`).
    fn field<'r>(&self, record: &'r StringRecord, column: usize) -> Option<&'r str> {
        record.get(self.indices[column])
    }

    fn integer(&self, record: &StringRecord, column: usize, name: &str, row: usize) -> Result<i64> {
        let raw = self.field(record, column).unwrap_or_default().trim();
        raw.parse().map_err(|_| PosmapError::MalformedRow {
            table: self.table.to_string(),
            row,
            reason: format!("{} '{}' is not an integer", name, raw),
        })
    }

    fn text(&self, record: &StringRecord, column: usize, name: &str, row: usize) -> Result<String> {
        self.field(record, column)
            .map(str::to_string)
            .ok_or_else(|| PosmapError::MalformedRow {
                table: self.table.to_string(),
                row,
                reason: format!("missing {}", name),
            })
    }
}

fn open(path: &Path) -> Result<File> {
    if !path.exists() {
        return Err(PosmapError::SourceNotFound(path.to_path_buf()));
    }
    Ok(File::open(path)?)
}

fn table_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Read the lookup table (`belegnummer, assigned_integer`).
pub fn read_lookup_table(path: &Path) -> Result<Vec<LookupRecord>> {
    read_lookup_table_from(open(path)?, &table_name(path))
}

/// Read the lookup table from any reader. `table` names it in errors.
pub fn read_lookup_table_from<R: Read>(reader: R, table: &str) -> Result<Vec<LookupRecord>> {
    const NAMES: [&str; 2] = ["belegnummer", "assigned_integer"];

    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = Columns::locate(table, rdr.headers()?, &NAMES)?;

    let mut records = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let row = i + 1;
        records.push(LookupRecord {
            belegnummer: columns.integer(&record, 0, NAMES[0], row)?,
            assigned_integer: columns.integer(&record, 1, NAMES[1], row)?,
        });
    }

    debug!("Read {} lookup rows from {}", records.len(), table);
    Ok(records)
}

/// Read the product mapping table (`belegnummer, artikelnummer, comments`).
pub fn read_product_map(path: &Path) -> Result<Vec<ProductMapRow>> {
    read_product_map_from(open(path)?, &table_name(path))
}

/// Read the product mapping table from any reader.
///
/// Empty comment cells become `None`. Columns other than the three
/// required ones are ignored.
pub fn read_product_map_from<R: Read>(reader: R, table: &str) -> Result<Vec<ProductMapRow>> {
    const NAMES: [&str; 3] = ["belegnummer", "artikelnummer", "comments"];

    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = Columns::locate(table, rdr.headers()?, &NAMES)?;

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let row = i + 1;
        let comments = columns
            .field(&record, 2)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        rows.push(ProductMapRow {
            belegnummer: columns.integer(&record, 0, NAMES[0], row)?,
            artikelnummer: columns.text(&record, 1, NAMES[1], row)?,
            comments,
        });
    }

    debug!("Read {} product rows from {}", rows.len(), table);
    Ok(rows)
}

/// Read previously written document entries (`entry_number, quantity, entry_body`).
pub fn read_document_entries(path: &Path) -> Result<Vec<DocumentEntry>> {
    read_document_entries_from(open(path)?, &table_name(path))
}

/// Read document entries from any reader.
pub fn read_document_entries_from<R: Read>(reader: R, table: &str) -> Result<Vec<DocumentEntry>> {
    const NAMES: [&str; 3] = ["entry_number", "quantity", "entry_body"];

    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let columns = Columns::locate(table, rdr.headers()?, &NAMES)?;

    let mut entries = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let row = i + 1;
        let quantity = columns
            .text(&record, 1, NAMES[1], row)?
            .parse::<Quantity>()
            .map_err(|reason| PosmapError::MalformedRow {
                table: table.to_string(),
                row,
                reason,
            })?;
        entries.push(DocumentEntry {
            entry_number: columns.text(&record, 0, NAMES[0], row)?,
            quantity,
            entry_body: columns.text(&record, 2, NAMES[2], row)?,
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::Unit;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_lookup_table() {
        let csv = "belegnummer,assigned_integer\n29386,7\n29387, 8\n";
        let records = read_lookup_table_from(csv.as_bytes(), "lookup.csv").unwrap();

        assert_eq!(
            records,
            vec![LookupRecord::new(29386, 7), LookupRecord::new(29387, 8)]
        );
    }

    #[test]
    fn test_read_lookup_table_missing_column() {
        let csv = "belegnummer,integer\n29386,7\n";
        let err = read_lookup_table_from(csv.as_bytes(), "lookup.csv").unwrap_err();

        match err {
            PosmapError::MissingRequiredColumn { table, column } => {
                assert_eq!(table, "lookup.csv");
                assert_eq!(column, "assigned_integer");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_lookup_table_malformed_row() {
        let csv = "belegnummer,assigned_integer\n29386,7\nabc,8\n";
        let err = read_lookup_table_from(csv.as_bytes(), "lookup.csv").unwrap_err();

        assert!(matches!(err, PosmapError::MalformedRow { row: 2, .. }));
    }

    #[test]
    fn test_read_product_map() {
        let csv = "\
id,belegnummer,artikelnummer,comments
1,42,A100,
2,42,A200,\"Pos. 1.1. Rohr, verzinkt\"
3,42,A300
";
        let rows = read_product_map_from(csv.as_bytes(), "mapToProducts.csv").unwrap();

        assert_eq!(
            rows,
            vec![
                ProductMapRow::new(42, "A100", None),
                ProductMapRow::new(42, "A200", Some("Pos. 1.1. Rohr, verzinkt")),
                ProductMapRow::new(42, "A300", None),
            ]
        );
    }

    #[test]
    fn test_read_product_map_missing_comments_column() {
        let csv = "belegnummer,artikelnummer\n42,A100\n";
        let err = read_product_map_from(csv.as_bytes(), "map.csv").unwrap_err();

        assert!(matches!(
            err,
            PosmapError::MissingRequiredColumn { ref column, .. } if column == "comments"
        ));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_lookup_table(Path::new("/nonexistent/lookup.csv")).unwrap_err();
        assert!(matches!(err, PosmapError::SourceNotFound(_)));
    }

    #[test]
    fn test_read_document_entries() {
        let csv = "entry_number,quantity,entry_body\n1.1,\"5,0 m\",\"Rohr\nDN100\"\n";
        let entries = read_document_entries_from(csv.as_bytes(), "entries.csv").unwrap();

        assert_eq!(
            entries,
            vec![DocumentEntry {
                entry_number: "1.1".to_string(),
                quantity: Quantity::new("5,0", Unit::Metre),
                entry_body: "Rohr\nDN100".to_string(),
            }]
        );

        let csv = "entry_number,quantity,entry_body\n1.1,5,x\n";
        let err = read_document_entries_from(csv.as_bytes(), "entries.csv").unwrap_err();
        assert!(matches!(err, PosmapError::MalformedRow { row: 1, .. }));
    }
}
