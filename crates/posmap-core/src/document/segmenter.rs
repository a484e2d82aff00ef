//! State machine that cuts document lines into entries.

use tracing::{debug, trace};

use crate::models::entry::{DocumentEntry, Quantity, Unit};
use crate::patterns::{ENTRY_NUMBER, QUANTITY, QUANTITY_MAGNITUDE, QUANTITY_UNIT};

/// Segmenter state between two lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmenterState {
    /// Looking for the line that opens an entry.
    SeekEntryNumber,
    /// Entry opened; looking for the quantity that closes it.
    SeekQuantity {
        entry_number: String,
        /// Index of the first body line. Locates the entry in the input for
        /// logging; the body text itself is buffered by the segmenter.
        body_start: usize,
    },
}

/// Streaming segmenter. Feed lines in order with [`Segmenter::push`].
///
/// Lines are buffered from the start of the current entry only, so an entry
/// body can be produced when its quantity line arrives.
#[derive(Debug)]
pub struct Segmenter {
    state: SegmenterState,
    index: usize,
    body: Vec<String>,
}

impl Segmenter {
    pub fn new() -> Self {
        Self {
            state: SegmenterState::SeekEntryNumber,
            index: 0,
            body: Vec::new(),
        }
    }

    /// Current state.
    pub fn state(&self) -> &SegmenterState {
        &self.state
    }

    /// Consume the next line. Returns an entry when this line closes one.
    pub fn push(&mut self, line: &str) -> Option<DocumentEntry> {
        let index = self.index;
        self.index += 1;

        let state = std::mem::replace(&mut self.state, SegmenterState::SeekEntryNumber);
        match state {
            SegmenterState::SeekEntryNumber => {
                if let Some(caps) = ENTRY_NUMBER.captures(line) {
                    let entry_number = caps[1].to_string();
                    trace!("Entry {} opened at line {}", entry_number, index);
                    self.body.clear();
                    self.state = SegmenterState::SeekQuantity {
                        entry_number,
                        body_start: index + 1,
                    };
                }
                None
            }
            SegmenterState::SeekQuantity {
                entry_number,
                body_start,
            } => match parse_quantity(line) {
                Some(quantity) => {
                    trace!(
                        "Entry {} closed at line {} (body lines {}..{})",
                        entry_number, index, body_start, index
                    );
                    let entry_body = self.body.join("\n");
                    self.body.clear();
                    Some(DocumentEntry {
                        entry_number,
                        quantity,
                        entry_body,
                    })
                }
                None => {
                    self.body.push(line.to_string());
                    self.state = SegmenterState::SeekQuantity {
                        entry_number,
                        body_start,
                    };
                    None
                }
            },
        }
    }

    /// End the input. Returns the entry number of an unfinished entry,
    /// which is dropped.
    pub fn finish(mut self) -> Option<String> {
        match std::mem::replace(&mut self.state, SegmenterState::SeekEntryNumber) {
            SegmenterState::SeekEntryNumber => None,
            SegmenterState::SeekQuantity {
                entry_number,
                body_start,
            } => {
                debug!(
                    "No quantity for entry {} (body from line {}), discarding it",
                    entry_number, body_start
                );
                Some(entry_number)
            }
        }
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

/// Split document lines into entries, in document order.
///
/// An entry opens on the first line matching the entry number pattern and
/// closes on the next line carrying a quantity. The body is every line in
/// between. An entry still open at the end of input is not emitted.
pub fn segment<S: AsRef<str>>(lines: &[S]) -> Vec<DocumentEntry> {
    let mut segmenter = Segmenter::new();
    let entries: Vec<DocumentEntry> = lines
        .iter()
        .filter_map(|line| segmenter.push(line.as_ref()))
        .collect();
    segmenter.finish();

    debug!("Segmented {} lines into {} entries", lines.len(), entries.len());
    entries
}

/// Read a quantity such as `m12,50` from a line.
fn parse_quantity(line: &str) -> Option<Quantity> {
    let token = QUANTITY.captures(line)?.get(1)?.as_str();
    let magnitude = QUANTITY_MAGNITUDE.find(token)?.as_str();
    let unit: Unit = QUANTITY_UNIT.find(token)?.as_str().parse().ok()?;
    Some(Quantity::new(magnitude, unit))
}
