//! CSV output of entries, groups, and reconciled records.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;
use tracing::debug;

use crate::error::Result;
use crate::models::entry::DocumentEntry;
use crate::models::records::{AggregatedGroup, UnifiedRecord};

/// Separator for product numbers in a single cell.
pub const PRODUCT_SEPARATOR: &str = ", ";

/// Write document entries (`entry_number, quantity, entry_body`).
pub fn write_document_entries(path: &Path, entries: &[DocumentEntry]) -> Result<()> {
    write_document_entries_to(File::create(path)?, entries)?;
    debug!("Wrote {} entries to {}", entries.len(), path.display());
    Ok(())
}

pub fn write_document_entries_to<W: Write>(writer: W, entries: &[DocumentEntry]) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(["entry_number", "quantity", "entry_body"])?;
    for entry in entries {
        wtr.write_record([
            entry.entry_number.as_str(),
            entry.quantity.to_string().as_str(),
            entry.entry_body.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write aggregated groups (`assigned_integer, belegnummer, product_number, entry_number`).
pub fn write_groups(path: &Path, groups: &[AggregatedGroup]) -> Result<()> {
    write_groups_to(File::create(path)?, groups)?;
    debug!("Wrote {} groups to {}", groups.len(), path.display());
    Ok(())
}

pub fn write_groups_to<W: Write>(writer: W, groups: &[AggregatedGroup]) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(["assigned_integer", "belegnummer", "product_number", "entry_number"])?;
    for group in groups {
        wtr.write_record([
            group.assigned_integer.to_string(),
            group.belegnummer.to_string(),
            group.product_numbers.join(PRODUCT_SEPARATOR),
            group.entry_number.clone(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write reconciled records in output column order.
pub fn write_unified(path: &Path, records: &[UnifiedRecord]) -> Result<()> {
    write_unified_to(File::create(path)?, records)?;
    debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

pub fn write_unified_to<W: Write>(writer: W, records: &[UnifiedRecord]) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record([
        "entry_number",
        "entry_body",
        "quantity",
        "assigned_integer",
        "belegnummer",
        "product_numbers",
    ])?;
    for record in records {
        wtr.write_record([
            record.entry_number.clone(),
            record.entry_body.clone(),
            record.quantity.to_string(),
            record.assigned_integer.to_string(),
            record.belegnummer.to_string(),
            record.product_numbers.join(PRODUCT_SEPARATOR),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
