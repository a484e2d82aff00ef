//! Core library for mapping document positions to product numbers.
//!
//! This crate provides:
//! - Line segmentation of document text into numbered entries with quantities
//! - Backfill and entry key extraction for product mapping comments
//! - Reconciliation of entries against the lookup and product mapping tables
//! - PDF text extraction, CSV table I/O, and a SQLite staging store

pub mod comments;
pub mod document;
pub mod error;
pub mod models;
pub mod patterns;
pub mod pdf;
pub mod pipeline;
pub mod reconcile;
pub mod store;
pub mod tables;

pub use comments::{backfill, extract_keys, filter_commented, CommentField};
pub use document::{segment, PlainText, Segmenter, SegmenterState, TextSource};
pub use error::{PdfError, PosmapError, Result};
pub use models::config::PosmapConfig;
pub use models::entry::{DocumentEntry, Quantity, Unit};
pub use models::records::{
    AggregatedGroup, KeyedComment, LookupRecord, ProductMapRow, UnifiedRecord,
};
pub use pdf::{PdfExtractor, PdfProcessor};
pub use pipeline::{is_output_file_name, Pipeline, RunOutput};
pub use reconcile::{aggregate, join, reconcile, LookupTable, Reconciler, Reconciliation};
pub use store::Store;
