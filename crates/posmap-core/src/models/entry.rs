//! Line items segmented from document text.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single line item found in the document text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentEntry {
    /// Entry number without its trailing dot (e.g. `1.2`).
    pub entry_number: String,

    /// Quantity closing the entry.
    pub quantity: Quantity,

    /// Lines between the entry number line and the quantity line.
    pub entry_body: String,
}

/// Unit of measure attached to a quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    /// Metres.
    #[serde(rename = "m")]
    Metre,
    /// Pieces (Stück).
    #[serde(rename = "St")]
    Piece,
    /// Lump sum (pauschal).
    #[serde(rename = "psch")]
    LumpSum,
    /// Pieces, long form (Stck).
    #[serde(rename = "Stck")]
    PieceLong,
}

impl Unit {
    /// Token as it appears in document text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Metre => "m",
            Unit::Piece => "St",
            Unit::LumpSum => "psch",
            Unit::PieceLong => "Stck",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "m" => Ok(Unit::Metre),
            "St" => Ok(Unit::Piece),
            "psch" => Ok(Unit::LumpSum),
            "Stck" => Ok(Unit::PieceLong),
            other => Err(format!("unknown unit: {}", other)),
        }
    }
}

/// Quantity with a comma-decimal magnitude kept verbatim from the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quantity {
    /// Magnitude exactly as written, e.g. `12,50`.
    pub magnitude: String,

    /// Unit of measure.
    pub unit: Unit,
}

impl Quantity {
    pub fn new(magnitude: impl Into<String>, unit: Unit) -> Self {
        Self {
            magnitude: magnitude.into(),
            unit,
        }
    }

    /// Numeric value of the magnitude.
    pub fn value(&self) -> Option<Decimal> {
        Decimal::from_str(&self.magnitude.replace(',', ".")).ok()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.magnitude, self.unit)
    }
}

impl FromStr for Quantity {
    type Err = String;

    /// Parse the `"<magnitude> <unit>"` form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (magnitude, unit) = s
            .trim()
            .split_once(' ')
            .ok_or_else(|| format!("invalid quantity: {}", s))?;
        Ok(Self::new(magnitude, unit.trim().parse()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_display() {
        let quantity = Quantity::new("5,0", Unit::Metre);
        assert_eq!(quantity.to_string(), "5,0 m");

        let quantity = Quantity::new("1,000", Unit::LumpSum);
        assert_eq!(quantity.to_string(), "1,000 psch");
    }

    #[test]
    fn test_quantity_parse() {
        let quantity: Quantity = "12,50 St".parse().unwrap();
        assert_eq!(quantity, Quantity::new("12,50", Unit::Piece));

        assert!("12,50".parse::<Quantity>().is_err());
        assert!("12,50 kg".parse::<Quantity>().is_err());
    }

    #[test]
    fn test_quantity_value() {
        let quantity = Quantity::new("12,50", Unit::Metre);
        assert_eq!(quantity.value(), Some(Decimal::from_str("12.50").unwrap()));

        // Verbatim magnitude survives even when it is not a number we can read
        let quantity = Quantity::new("1,2,3", Unit::Metre);
        assert_eq!(quantity.value(), None);
        assert_eq!(quantity.magnitude, "1,2,3");
    }

    #[test]
    fn test_unit_tokens() {
        for unit in [Unit::Metre, Unit::Piece, Unit::LumpSum, Unit::PieceLong] {
            assert_eq!(unit.as_str().parse::<Unit>(), Ok(unit));
        }
    }
}
