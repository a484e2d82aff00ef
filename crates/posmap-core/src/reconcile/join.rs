//! Grouping of keyed comments and the final join with document entries.

use std::collections::HashMap;

use tracing::debug;

use crate::models::entry::DocumentEntry;
use crate::models::records::{AggregatedGroup, KeyedComment, UnifiedRecord};

/// Group keyed comments by entry number.
///
/// Rows without an entry number form no group. Groups come out in order of
/// first appearance; product numbers keep row order.
pub fn aggregate(keyed: &[KeyedComment]) -> Vec<AggregatedGroup> {
    let mut groups: Vec<AggregatedGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for row in keyed {
        let Some(entry_number) = row.entry_number.as_deref() else {
            continue;
        };

        match index.get(entry_number) {
            Some(&i) => groups[i].product_numbers.push(row.artikelnummer.clone()),
            None => {
                index.insert(entry_number, groups.len());
                groups.push(AggregatedGroup {
                    entry_number: entry_number.to_string(),
                    belegnummer: row.belegnummer,
                    assigned_integer: row.assigned_integer,
                    product_numbers: vec![row.artikelnummer.clone()],
                });
            }
        }
    }

    debug!("Aggregated {} keyed comments into {} groups", keyed.len(), groups.len());
    groups
}

/// Inner join of document entries and groups on the entry number.
///
/// Output follows document entry order. Entries without a group and groups
/// without an entry are dropped.
pub fn join(entries: &[DocumentEntry], groups: &[AggregatedGroup]) -> Vec<UnifiedRecord> {
    let by_key: HashMap<&str, &AggregatedGroup> = groups
        .iter()
        .map(|g| (g.entry_number.as_str(), g))
        .collect();

    let records: Vec<UnifiedRecord> = entries
        .iter()
        .filter_map(|entry| {
            let group = by_key.get(entry.entry_number.as_str())?;
            Some(UnifiedRecord {
                entry_number: entry.entry_number.clone(),
                entry_body: entry.entry_body.clone(),
                quantity: entry.quantity.clone(),
                assigned_integer: group.assigned_integer,
                belegnummer: group.belegnummer,
                product_numbers: group.product_numbers.clone(),
            })
        })
        .collect();

    debug!(
        "Joined {} entries with {} groups into {} records",
        entries.len(),
        groups.len(),
        records.len()
    );
    records
}

/// Aggregate keyed comments and join them with document entries.
///
/// An empty result is valid. Lookup failures are reported earlier, by
/// [`super::Reconciler::reconcile_document`].
pub fn reconcile(entries: &[DocumentEntry], keyed: &[KeyedComment]) -> Vec<UnifiedRecord> {
    join(entries, &aggregate(keyed))
}
