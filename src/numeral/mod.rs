//! Numeral module
//!
//! Label classification, Roman numeral conversion and sequence generation.
//!
//! # Features
//!
//! - Arabic / Roman / arbitrary label classification
//! - Strict Roman numeral parsing (canonical subtractive form only)
//! - Arabic and Roman sequence generation
//! - Comma-separated arbitrary label lists
//! - Continuity checks over label runs
//!
//! # Example
//!
//! ```rust
//! use canonical_pages::{detect_numeral_type, generate_roman_numerals, NumeralType};
//!
//! assert_eq!(detect_numeral_type("xiv"), NumeralType::Roman);
//! assert_eq!(
//!     generate_roman_numerals("vii", 3).unwrap(),
//!     vec!["vii", "viii", "ix"]
//! );
//! ```

mod codec;
mod sequence;

pub use codec::{
    accept_detected_label, detect_numeral_type, int_to_roman, is_arabic_numeral, roman_to_int,
    NumeralType, MAX_ROMAN_VALUE,
};
pub use sequence::{
    detect_sequence_continuity, generate_arabic_numerals, generate_roman_numerals,
    parse_arbitrary_sequence, MAX_SEQUENCE_LENGTH,
};
