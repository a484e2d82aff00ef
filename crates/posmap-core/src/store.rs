//! SQLite staging store for lookup rows, keyed comments, and entries.
//!
//! Every `replace_*` call drops and recreates its table in one transaction,
//! so a rerun with the same input leaves the same rows behind. Loads return
//! rows in insertion order.

use std::path::Path;

use rusqlite::{params, Connection};
use tracing::debug;

use crate::error::{PosmapError, Result};
use crate::models::entry::{DocumentEntry, Quantity};
use crate::models::records::{KeyedComment, LookupRecord};

const LOOKUP_TABLE: &str = "lookup";
const KEYED_COMMENTS_TABLE: &str = "map_to_products";
const ENTRIES_TABLE: &str = "document_entries";

/// Staging store backed by a SQLite database.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) a database file.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        debug!("Opened staging store at {}", path.display());
        Ok(Self { conn })
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Replace the lookup table.
    pub fn replace_lookup(&mut self, records: &[LookupRecord]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {LOOKUP_TABLE};
             CREATE TABLE {LOOKUP_TABLE} (
                 belegnummer INTEGER NOT NULL,
                 assigned_integer INTEGER NOT NULL
             );"
        ))?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {LOOKUP_TABLE} (belegnummer, assigned_integer) VALUES (?1, ?2)"
            ))?;
            for record in records {
                stmt.execute(params![record.belegnummer, record.assigned_integer])?;
            }
        }
        tx.commit()?;

        debug!("Stored {} lookup rows", records.len());
        Ok(())
    }

    /// Load the lookup table. Empty when it was never stored.
    pub fn load_lookup(&self) -> Result<Vec<LookupRecord>> {
        if !self.has_table(LOOKUP_TABLE)? {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(&format!(
            "SELECT belegnummer, assigned_integer FROM {LOOKUP_TABLE} ORDER BY rowid"
        ))?;
        let records = stmt
            .query_map([], |row| {
                Ok(LookupRecord {
                    belegnummer: row.get(0)?,
                    assigned_integer: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    /// Replace the staged keyed comments.
    pub fn replace_keyed_comments(&mut self, rows: &[KeyedComment]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {KEYED_COMMENTS_TABLE};
             CREATE TABLE {KEYED_COMMENTS_TABLE} (
                 belegnummer INTEGER NOT NULL,
                 artikelnummer TEXT NOT NULL,
                 comments TEXT NOT NULL,
                 entry_number TEXT,
                 assigned_integer INTEGER NOT NULL
             );"
        ))?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {KEYED_COMMENTS_TABLE}
                     (belegnummer, artikelnummer, comments, entry_number, assigned_integer)
                 VALUES (?1, ?2, ?3, ?4, ?5)"
            ))?;
            for row in rows {
                stmt.execute(params![
                    row.belegnummer,
                    row.artikelnummer,
                    row.comments,
                    row.entry_number,
                    row.assigned_integer,
                ])?;
            }
        }
        tx.commit()?;

        debug!("Staged {} keyed comments", rows.len());
        Ok(())
    }

    /// Load the staged keyed comments.
    pub fn load_keyed_comments(&self) -> Result<Vec<KeyedComment>> {
        if !self.has_table(KEYED_COMMENTS_TABLE)? {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(&format!(
            "SELECT belegnummer, artikelnummer, comments, entry_number, assigned_integer
             FROM {KEYED_COMMENTS_TABLE} ORDER BY rowid"
        ))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(KeyedComment {
                    belegnummer: row.get(0)?,
                    artikelnummer: row.get(1)?,
                    comments: row.get(2)?,
                    entry_number: row.get(3)?,
                    assigned_integer: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Replace the staged document entries.
    pub fn replace_entries(&mut self, entries: &[DocumentEntry]) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {ENTRIES_TABLE};
             CREATE TABLE {ENTRIES_TABLE} (
                 entry_number TEXT NOT NULL,
                 quantity TEXT NOT NULL,
                 entry_body TEXT NOT NULL
             );"
        ))?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {ENTRIES_TABLE} (entry_number, quantity, entry_body)
                 VALUES (?1, ?2, ?3)"
            ))?;
            for entry in entries {
                stmt.execute(params![
                    entry.entry_number,
                    entry.quantity.to_string(),
                    entry.entry_body,
                ])?;
            }
        }
        tx.commit()?;

        debug!("Staged {} document entries", entries.len());
        Ok(())
    }

    /// Load the staged document entries.
    pub fn load_entries(&self) -> Result<Vec<DocumentEntry>> {
        if !self.has_table(ENTRIES_TABLE)? {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(&format!(
            "SELECT entry_number, quantity, entry_body FROM {ENTRIES_TABLE} ORDER BY rowid"
        ))?;
        let raw = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        raw.into_iter()
            .enumerate()
            .map(|(i, (entry_number, quantity, entry_body))| {
                let quantity = quantity
                    .parse::<Quantity>()
                    .map_err(|reason| PosmapError::MalformedRow {
                        table: ENTRIES_TABLE.to_string(),
                        row: i + 1,
                        reason,
                    })?;
                Ok(DocumentEntry {
                    entry_number,
                    quantity,
                    entry_body,
                })
            })
            .collect()
    }

    fn has_table(&self, name: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}
