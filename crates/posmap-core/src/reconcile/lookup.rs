//! Lookup table between document numbers and assigned integers.

use tracing::debug;

use crate::error::{PosmapError, Result};
use crate::models::records::LookupRecord;

/// Lookup table loaded once per run.
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    records: Vec<LookupRecord>,
}

impl LookupTable {
    pub fn new(records: Vec<LookupRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[LookupRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Assigned integer of a document. The first matching row wins.
    pub fn assigned_integer_for(&self, belegnummer: i64) -> Result<i64> {
        let mut matches = self.records.iter().filter(|r| r.belegnummer == belegnummer);
        let record = matches
            .next()
            .ok_or(PosmapError::NoLookupMatch(belegnummer))?;

        let extra = matches.count();
        if extra > 0 {
            debug!(
                "Document {} has {} additional lookup rows, using the first",
                belegnummer, extra
            );
        }
        Ok(record.assigned_integer)
    }

    /// Document number for an assigned integer, if any row carries it.
    pub fn belegnummer_for(&self, assigned_integer: i64) -> Option<i64> {
        self.records
            .iter()
            .find(|r| r.assigned_integer == assigned_integer)
            .map(|r| r.belegnummer)
    }
}

impl From<Vec<LookupRecord>> for LookupTable {
    fn from(records: Vec<LookupRecord>) -> Self {
        Self::new(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> LookupTable {
        LookupTable::new(vec![
            LookupRecord::new(29386, 7),
            LookupRecord::new(29387, 7),
            LookupRecord::new(29386, 9),
        ])
    }

    #[test]
    fn test_assigned_integer_first_match() {
        assert_eq!(table().assigned_integer_for(29386).unwrap(), 7);
        assert_eq!(table().assigned_integer_for(29387).unwrap(), 7);
    }

    #[test]
    fn test_assigned_integer_missing() {
        let err = table().assigned_integer_for(1).unwrap_err();
        assert!(matches!(err, PosmapError::NoLookupMatch(1)));
    }

    #[test]
    fn test_belegnummer_for() {
        assert_eq!(table().belegnummer_for(7), Some(29386));
        assert_eq!(table().belegnummer_for(9), Some(29386));
        assert_eq!(table().belegnummer_for(8), None);
    }
}
