//! Error types for the posmap-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the posmap library.
#[derive(Error, Debug)]
pub enum PosmapError {
    /// An input document or table does not exist.
    #[error("source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// A table lacks one of its expected columns.
    #[error("{table} is missing required column '{column}'")]
    MissingRequiredColumn { table: String, column: String },

    /// The target document number is absent from the lookup table.
    #[error("no lookup entry for document number {0}")]
    NoLookupMatch(i64),

    /// A table row could not be coerced to the expected types.
    #[error("malformed row {row} in {table}: {reason}")]
    MalformedRow {
        table: String,
        row: usize,
        reason: String,
    },

    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// CSV reading or writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Staging store error.
    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// Invalid extraction pattern.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Result type for the posmap library.
pub type Result<T> = std::result::Result<T, PosmapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PosmapError::MissingRequiredColumn {
            table: "lookup.csv".to_string(),
            column: "belegnummer".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "lookup.csv is missing required column 'belegnummer'"
        );

        let err = PosmapError::NoLookupMatch(29386);
        assert_eq!(err.to_string(), "no lookup entry for document number 29386");

        let err: PosmapError = PdfError::NoPages.into();
        assert_eq!(err.to_string(), "PDF error: PDF has no pages");
    }
}
