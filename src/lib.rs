//! canonical-pages - Canonical page label resolution for scanned books
//!
//! Maps every physical page of a scanned document to the label a reader
//! would cite in a back-of-book index: Roman front matter, Arabic body
//! numbering, custom labels, or "excluded" / "unaccounted".
//!
//! # Modules
//!
//! - [`numeral`]: label classification, Roman conversion, sequence generation
//! - [`page_config`]: page range grammar and region page-set expansion
//! - [`region`]: regions, OCR readings and page-number conflicts
//! - [`rules`]: user rules, save-time conflict checks, stores and auto-join
//! - [`canonical`]: the page map computation, statistics and display segments
//!
//! # Example
//!
//! ```rust
//! use canonical_pages::{
//!     compute_canonical_pages, format_canonical_pages_display, CanonicalPageRule,
//!     PageMapInput, RuleKind,
//! };
//!
//! let input = PageMapInput::new(7).with_rules(vec![
//!     CanonicalPageRule::new("front", 1, 2, RuleKind::roman("i")),
//!     CanonicalPageRule::new("blank", 3, 3, RuleKind::Negative),
//!     CanonicalPageRule::new("body", 4, 6, RuleKind::arabic("1")),
//! ]);
//! let map = compute_canonical_pages(&input).unwrap().into_map();
//!
//! assert_eq!(
//!     format_canonical_pages_display(&map),
//!     "i-ii [blue]  3 [gray] (ignored)  1-3 [blue]  7 [red]"
//! );
//! ```

pub mod canonical;
pub mod cli;
pub mod config;
pub mod error;
pub mod numeral;
pub mod page_config;
pub mod region;
pub mod rules;

// Re-exports for convenience
pub use canonical::{
    canonical_pages_statistics, canonical_range_string, compute_canonical_pages,
    format_canonical_pages_display, format_canonical_pages_with_metadata, CanonicalPage,
    CanonicalPageSegment, CanonicalPagesMap, CanonicalPagesStatistics, PageMapInput, PageSource,
    Resolution, RuleOverlap,
};
pub use cli::{Cli, Commands};
pub use config::{CliOverrides, Config, ConfigError, OutputFormat, Settings};
pub use error::{Result, ValidationError};
pub use numeral::{
    accept_detected_label, detect_numeral_type, detect_sequence_continuity,
    generate_arabic_numerals, generate_roman_numerals, int_to_roman, parse_arbitrary_sequence,
    roman_to_int, NumeralType,
};
pub use page_config::{
    page_config_summary, parse_page_range, validate_page_range, EveryOther, PageConfig,
};
pub use region::{
    detect_page_number_conflicts, PageNumberConflict, Region, RegionDerivedPageNumber, RegionRef,
    RegionType,
};
pub use rules::{
    detect_rule_conflicts, CanonicalPageRule, JsonRuleStore, MemoryRuleStore, RuleConflict,
    RuleDraft, RuleKind, RuleService, RuleStore, RuleUpdate, StoreError,
};

/// Process exit codes
pub mod exit_codes {
    /// Success
    pub const SUCCESS: i32 = 0;
    /// General error
    pub const GENERAL_ERROR: i32 = 1;
    /// Invalid arguments or input data
    pub const INVALID_ARGS: i32 = 2;
    /// Input file not found
    pub const INPUT_NOT_FOUND: i32 = 3;
    /// Conflicting rules or regions; nothing was resolved or saved
    pub const UNRESOLVED: i32 = 4;
}
