//! Reconciliation of document entries with the reference tables.

mod join;
mod lookup;

pub use join::{aggregate, join, reconcile};
pub use lookup::LookupTable;

use tracing::{debug, info};

use crate::comments::{backfill, extract_keys, filter_commented};
use crate::error::Result;
use crate::models::config::{ExtractionConfig, Patterns};
use crate::models::entry::DocumentEntry;
use crate::models::records::{AggregatedGroup, KeyedComment, ProductMapRow, UnifiedRecord};

/// Every intermediate of one document's reconciliation.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub belegnummer: i64,
    pub assigned_integer: i64,
    pub keyed_comments: Vec<KeyedComment>,
    pub groups: Vec<AggregatedGroup>,
    pub records: Vec<UnifiedRecord>,
}

/// Reconciles one document at a time against the loaded reference tables.
pub struct Reconciler {
    lookup: LookupTable,
    product_map: Vec<ProductMapRow>,
    patterns: Patterns,
}

impl Reconciler {
    /// Create a reconciler. Fails if the configured patterns do not compile.
    pub fn new(
        lookup: LookupTable,
        product_map: Vec<ProductMapRow>,
        config: &ExtractionConfig,
    ) -> Result<Self> {
        Ok(Self {
            lookup,
            product_map,
            patterns: config.compile()?,
        })
    }

    pub fn lookup(&self) -> &LookupTable {
        &self.lookup
    }

    /// Keyed comments of one document, before grouping.
    ///
    /// Fails with `NoLookupMatch` when the document is not in the lookup
    /// table. Product rows keep their table order through backfill.
    pub fn keyed_comments(&self, belegnummer: i64) -> Result<(i64, Vec<KeyedComment>)> {
        let assigned_integer = self.lookup.assigned_integer_for(belegnummer)?;

        let rows: Vec<ProductMapRow> = self
            .product_map
            .iter()
            .filter(|row| row.belegnummer == belegnummer)
            .cloned()
            .collect();
        debug!("Document {} has {} product rows", belegnummer, rows.len());

        let filled = backfill(&rows);
        let commented = filter_commented(&filled, &self.patterns.comment_filter);
        let keyed = extract_keys(&commented, &self.patterns.key, assigned_integer);

        Ok((assigned_integer, keyed))
    }

    /// Reconcile a document's entries with its product rows.
    pub fn reconcile_document(
        &self,
        belegnummer: i64,
        entries: &[DocumentEntry],
    ) -> Result<Reconciliation> {
        let (assigned_integer, keyed_comments) = self.keyed_comments(belegnummer)?;
        Ok(self.finish(belegnummer, assigned_integer, keyed_comments, entries))
    }

    /// Group already keyed comments and join them with the entries.
    pub fn finish(
        &self,
        belegnummer: i64,
        assigned_integer: i64,
        keyed_comments: Vec<KeyedComment>,
        entries: &[DocumentEntry],
    ) -> Reconciliation {
        let groups = aggregate(&keyed_comments);
        let records = join(entries, &groups);

        info!(
            "Document {}: {} entries, {} groups, {} reconciled records",
            belegnummer,
            entries.len(),
            groups.len(),
            records.len()
        );

        Reconciliation {
            belegnummer,
            assigned_integer,
            keyed_comments,
            groups,
            records,
        }
    }
}
