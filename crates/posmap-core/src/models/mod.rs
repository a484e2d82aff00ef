//! Data models for documents, reference tables, and configuration.

pub mod config;
pub mod entry;
pub mod records;

pub use entry::{DocumentEntry, Quantity, Unit};
pub use records::{AggregatedGroup, KeyedComment, LookupRecord, ProductMapRow, UnifiedRecord};
