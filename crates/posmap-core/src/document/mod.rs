//! Document text sources and line segmentation.

mod segmenter;

pub use segmenter::{segment, Segmenter, SegmenterState};

use std::path::Path;

use crate::error::{PosmapError, Result};

/// Anything that yields a document's text as ordered lines.
pub trait TextSource {
    /// Read the document text as lines, in reading order.
    fn read_lines(&self) -> Result<Vec<String>>;
}

/// Already-extracted document text.
#[derive(Debug, Clone, Default)]
pub struct PlainText {
    text: String,
}

impl PlainText {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Load text from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PosmapError::SourceNotFound(path.to_path_buf()));
        }
        Ok(Self::new(std::fs::read_to_string(path)?))
    }
}

impl TextSource for PlainText {
    fn read_lines(&self) -> Result<Vec<String>> {
        Ok(split_lines(&self.text))
    }
}

/// Trim the text and split it on newlines.
///
/// Blank lines inside the text are kept so entry bodies stay intact.
pub fn split_lines(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split('\n').map(|l| l.trim_end_matches('\r').to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines() {
        let lines = split_lines("\n  1.1. Titel\nText\n\nm1,0\n\n");
        assert_eq!(lines, vec!["1.1. Titel", "Text", "", "m1,0"]);

        assert!(split_lines("   \n").is_empty());
        assert_eq!(split_lines("a\r\nb"), vec!["a", "b"]);
    }

    #[test]
    fn test_plain_text_missing_file() {
        let err = PlainText::from_file(Path::new("/nonexistent/doc.txt")).unwrap_err();
        assert!(matches!(err, PosmapError::SourceNotFound(_)));
    }
}
