//! Validation error types shared by every module
//!
//! All variants describe recoverable input problems. Conflicts between rules
//! or regions are not errors; they are reported as data (see
//! [`crate::Resolution`] and [`crate::RuleConflict`]).

use thiserror::Error;

/// Input validation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    #[error("Page range must contain at least one page")]
    EmptyPageRange,

    #[error("Pages out of range: {} (max: {max})", join_pages(.pages))]
    PagesOutOfRange { pages: Vec<u32>, max: u32 },

    #[error("Invalid count: {0} (must be >= 0)")]
    NegativeCount(i64),

    #[error("Count too large: {count} (max: {max})")]
    CountTooLarge { count: i64, max: i64 },

    #[error("Invalid Roman numeral: {0}")]
    InvalidRomanNumeral(String),

    #[error("Number out of range for Roman numerals: {0}")]
    RomanOutOfRange(i64),

    #[error("Invalid Arabic numeral: {0}")]
    InvalidArabicNumeral(String),

    #[error("Arabic sequence starting at {start} overflows after {count} pages")]
    SequenceOverflow { start: i64, count: i64 },

    #[error("documentPageStart ({start}) must be <= documentPageEnd ({end})")]
    InvertedRuleRange { start: u32, end: u32 },

    #[error("Rule {rule_id}: arbitrarySequence has {actual} labels but the range covers {expected} pages")]
    SequenceLengthMismatch {
        rule_id: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid every-other configuration: {0}")]
    InvalidEveryOther(String),

    #[error("Page number reading references unknown region: {0}")]
    UnknownRegion(String),
}

pub type Result<T> = std::result::Result<T, ValidationError>;

fn join_pages(pages: &[u32]) -> String {
    pages
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
