//! Configuration structures for the mapping pipeline.

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{PosmapError, Result};
use crate::patterns::POSITION_KEY_PATTERN;

/// Main configuration for the posmap pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PosmapConfig {
    /// Reference table locations.
    pub sources: SourceConfig,

    /// Comment key extraction configuration.
    pub extraction: ExtractionConfig,

    /// Staging store configuration.
    pub store: StoreConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Reference table locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// CSV with `belegnummer, assigned_integer`.
    pub lookup_table: PathBuf,

    /// CSV with `belegnummer, artikelnummer, comments`.
    pub product_map: PathBuf,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            lookup_table: PathBuf::from("lookup.csv"),
            product_map: PathBuf::from("mapToProducts.csv"),
        }
    }
}

/// Comment key extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Pattern whose group 1 is the entry number.
    pub key_pattern: String,

    /// Only comments matching this pattern are keyed. Defaults to the key
    /// pattern, so every kept comment yields a key.
    pub comment_filter: Option<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            key_pattern: POSITION_KEY_PATTERN.to_string(),
            comment_filter: None,
        }
    }
}

/// Compiled extraction patterns.
#[derive(Debug, Clone)]
pub struct Patterns {
    pub comment_filter: Regex,
    pub key: Regex,
}

impl ExtractionConfig {
    /// Compile the configured patterns.
    pub fn compile(&self) -> Result<Patterns> {
        let key = Regex::new(&self.key_pattern)?;
        if key.captures_len() < 2 {
            return Err(PosmapError::Config(format!(
                "key pattern '{}' has no capture group",
                self.key_pattern
            )));
        }
        let comment_filter = match &self.comment_filter {
            Some(pattern) => Regex::new(pattern)?,
            None => key.clone(),
        };
        Ok(Patterns { comment_filter, key })
    }
}

/// Staging store configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database for staging keyed comments. No staging when unset.
    pub path: Option<PathBuf>,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for written files.
    pub directory: PathBuf,

    /// Also write the aggregated product groups.
    pub write_groups: bool,

    /// Also write the segmented document entries.
    pub write_entries: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            write_groups: false,
            write_entries: false,
        }
    }
}

impl PosmapConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PosmapError::SourceNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| PosmapError::Config(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| PosmapError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
