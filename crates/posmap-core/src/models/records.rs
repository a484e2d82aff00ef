//! Reference table rows and the records derived from them.

use serde::{Deserialize, Serialize};

use super::entry::Quantity;

/// Row of the lookup table correlating a document with its assigned integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRecord {
    /// Document number.
    pub belegnummer: i64,

    /// Integer assigned to the document. Not unique across documents.
    pub assigned_integer: i64,
}

impl LookupRecord {
    pub fn new(belegnummer: i64, assigned_integer: i64) -> Self {
        Self {
            belegnummer,
            assigned_integer,
        }
    }
}

/// Row of the product mapping table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMapRow {
    /// Document number.
    pub belegnummer: i64,

    /// Article identifier.
    pub artikelnummer: String,

    /// Free-text comment, often blank on continuation rows.
    #[serde(default)]
    pub comments: Option<String>,
}

impl ProductMapRow {
    pub fn new(belegnummer: i64, artikelnummer: impl Into<String>, comments: Option<&str>) -> Self {
        Self {
            belegnummer,
            artikelnummer: artikelnummer.into(),
            comments: comments.map(str::to_string),
        }
    }
}

/// A product mapping row after backfill and key extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedComment {
    pub belegnummer: i64,
    pub artikelnummer: String,
    pub comments: String,

    /// Entry number recovered from the comment, if the pattern matched.
    pub entry_number: Option<String>,

    pub assigned_integer: i64,
}

/// Product numbers collected under one entry number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedGroup {
    pub entry_number: String,
    pub belegnummer: i64,
    pub assigned_integer: i64,

    /// Article numbers in input row order.
    pub product_numbers: Vec<String>,
}

/// Final reconciled record: a document entry with its product numbers.
///
/// Field order matches the output column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnifiedRecord {
    pub entry_number: String,
    pub entry_body: String,
    pub quantity: Quantity,
    pub assigned_integer: i64,
    pub belegnummer: i64,
    pub product_numbers: Vec<String>,
}

impl UnifiedRecord {
    /// Product numbers as written to flat text.
    pub fn product_numbers_joined(&self) -> String {
        self.product_numbers.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::entry::Unit;

    #[test]
    fn test_product_numbers_joined() {
        let record = UnifiedRecord {
            entry_number: "1.1".to_string(),
            entry_body: "desc".to_string(),
            quantity: Quantity::new("5,0", Unit::Metre),
            assigned_integer: 7,
            belegnummer: 42,
            product_numbers: vec!["A100".to_string(), "A200".to_string()],
        };
        assert_eq!(record.product_numbers_joined(), "A100, A200");
    }

    #[test]
    fn test_unified_record_json_field_order() {
        let record = UnifiedRecord {
            entry_number: "1.1".to_string(),
            entry_body: String::new(),
            quantity: Quantity::new("5,0", Unit::Metre),
            assigned_integer: 7,
            belegnummer: 42,
            product_numbers: vec![],
        };
        let json = serde_json::to_string(&record).unwrap();
        let entry = json.find("entry_number").unwrap();
        let body = json.find("entry_body").unwrap();
        let products = json.find("product_numbers").unwrap();
        assert!(entry < body && body < products);
    }
}
