//! Regex patterns for entry numbers, quantities, and comment keys.

use lazy_static::lazy_static;
use regex::Regex;

/// Entry number such as `1.2.` that is not the start of a longer number.
///
/// Group 1 holds the number without its trailing dot. The trailing dot must
/// be followed by a non-digit or the end of the line (`1.2.3` is not an
/// entry number `1.2`).
pub const ENTRY_NUMBER_PATTERN: &str = r"\b(\d+\.\d+)\.(?:\D|$)";

/// Position reference inside a product mapping comment, e.g. `Pos. 3.4.`.
///
/// Group 1 has the same shape as an entry number, so keys taken from
/// comments join with segmented entries. Numbers outside a `Pos.` reference,
/// such as dates, are never captured.
pub const POSITION_KEY_PATTERN: &str = r"Pos\.\s(\d+\.\d+)\.(?:\D|$)";

lazy_static! {
    pub static ref ENTRY_NUMBER: Regex = Regex::new(ENTRY_NUMBER_PATTERN).unwrap();

    // Unit prefix glued to a comma-decimal magnitude (e.g. "m12,50")
    pub static ref QUANTITY: Regex = Regex::new(
        r"(St\d+,\d+|m\d+,\d+|psch\d+,\d+)"
    ).unwrap();

    pub static ref QUANTITY_MAGNITUDE: Regex = Regex::new(
        r"\d+,\d+"
    ).unwrap();

    pub static ref QUANTITY_UNIT: Regex = Regex::new(
        r"(m|St|psch|Stck)"
    ).unwrap();

    pub static ref POSITION_KEY: Regex = Regex::new(POSITION_KEY_PATTERN).unwrap();
}
