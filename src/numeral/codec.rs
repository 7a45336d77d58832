//! Numeral codec
//!
//! Conversions between numeral-style labels and ordinal positions.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================
// Constants
// ============================================================

/// Largest value expressible with standard Roman numerals
pub const MAX_ROMAN_VALUE: u32 = 3999;

/// Length of the longest canonical numeral ("mmmdccclxxxviii")
const MAX_ROMAN_LEN: usize = 15;

/// Greedy conversion table, largest value first
const ROMAN_TABLE: [(&str, u32); 13] = [
    ("m", 1000),
    ("cm", 900),
    ("d", 500),
    ("cd", 400),
    ("c", 100),
    ("xc", 90),
    ("l", 50),
    ("xl", 40),
    ("x", 10),
    ("ix", 9),
    ("v", 5),
    ("iv", 4),
    ("i", 1),
];

// ============================================================
// Numeral Type
// ============================================================

/// Numbering style of a label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumeralType {
    /// Decimal digits only ("12")
    Arabic,
    /// Well-formed Roman numeral, any case ("vii", "XIV")
    Roman,
    /// Anything else; not generable as a sequence
    Arbitrary,
}

impl NumeralType {
    /// Lowercase name as used in snapshots and CLI output
    pub fn as_str(&self) -> &'static str {
        match self {
            NumeralType::Arabic => "arabic",
            NumeralType::Roman => "roman",
            NumeralType::Arbitrary => "arbitrary",
        }
    }
}

impl fmt::Display for NumeralType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================
// Conversions
// ============================================================

/// Classify a literal label
pub fn detect_numeral_type(label: &str) -> NumeralType {
    if is_arabic_numeral(label) {
        NumeralType::Arabic
    } else if roman_to_int(label).is_some() {
        NumeralType::Roman
    } else {
        NumeralType::Arbitrary
    }
}

/// True for a non-empty run of ASCII digits
pub fn is_arabic_numeral(label: &str) -> bool {
    !label.is_empty() && label.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a Roman numeral (case-insensitive)
///
/// Only the canonical subtractive form is accepted: "IIII", "VX" or "IC"
/// return `None` rather than being coerced to a value.
pub fn roman_to_int(text: &str) -> Option<u32> {
    if text.is_empty() || text.len() > MAX_ROMAN_LEN || !text.is_ascii() {
        return None;
    }

    let lower = text.to_ascii_lowercase();
    let mut result = 0u32;
    let mut remaining = lower.as_str();

    for (numeral, value) in &ROMAN_TABLE {
        while remaining.starts_with(numeral) {
            result += value;
            remaining = &remaining[numeral.len()..];
        }
    }

    if !remaining.is_empty() || result == 0 || result > MAX_ROMAN_VALUE {
        return None;
    }

    // Greedy parsing accepts repeated symbols; the canonical form does not
    match int_to_roman(result) {
        Some(canonical) if canonical == lower => Some(result),
        _ => None,
    }
}

/// Render a value as a lowercase Roman numeral (1..=3999)
pub fn int_to_roman(value: u32) -> Option<String> {
    if value == 0 || value > MAX_ROMAN_VALUE {
        return None;
    }

    let mut result = String::new();
    let mut remaining = value;

    for (numeral, numeral_value) in &ROMAN_TABLE {
        while remaining >= *numeral_value {
            result.push_str(numeral);
            remaining -= numeral_value;
        }
    }

    Some(result)
}

/// Validate raw OCR text read from a page-number region
///
/// Returns the trimmed label when it looks like a page number (digits,
/// Roman letters or a purely alphabetic marker), otherwise `None`.
pub fn accept_detected_label(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let plausible = is_arabic_numeral(trimmed)
        || trimmed.chars().all(|c| c.is_ascii_alphabetic());

    plausible.then(|| trimmed.to_string())
}
