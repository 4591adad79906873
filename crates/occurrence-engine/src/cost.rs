//! Parsing free-text cost strings ("Gratis", "Vanaf €2", "€ 2,50 p.p.").

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

/// A whole word meaning the event costs nothing, in any case.
static FREE_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:gratis|free)\b").expect("free word pattern is valid")
});

static NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+(?:[.,]\d+)?").expect("cost number pattern is valid")
});

/// Numeric value of a cost string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CostValue {
    Known(f64),
    /// No number could be found. Fails every finite cost ceiling.
    Unknown,
}

impl CostValue {
    /// `Unknown` maps to `f64::INFINITY`.
    pub fn as_f64(self) -> f64 {
        match self {
            CostValue::Known(v) => v,
            CostValue::Unknown => f64::INFINITY,
        }
    }

    /// Whether the cost fits under `max`. `None` is an unbounded ceiling.
    pub fn within(self, max: Option<f64>) -> bool {
        match max {
            None => true,
            Some(max) => self.as_f64() <= max,
        }
    }
}

impl fmt::Display for CostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CostValue::Known(v) => write!(f, "{v:.2}"),
            CostValue::Unknown => f.write_str("onbekend"),
        }
    }
}

impl Serialize for CostValue {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        match self {
            CostValue::Known(v) => s.serialize_some(v),
            CostValue::Unknown => s.serialize_none(),
        }
    }
}

/// Parse a free-text cost.
///
/// Empty strings and any text containing "gratis" or "free" as a word give
/// `Known(0.0)`. Otherwise the first decimal number is taken, with `,` or `.`
/// as the decimal separator.
pub fn parse_cost(text: &str) -> CostValue {
    let trimmed = text.trim();
    if trimmed.is_empty() || FREE_WORD.is_match(trimmed) {
        return CostValue::Known(0.0);
    }

    NUMBER
        .find(trimmed)
        .and_then(|m| m.as_str().replace(',', ".").parse::<f64>().ok())
        .map_or(CostValue::Unknown, CostValue::Known)
}
