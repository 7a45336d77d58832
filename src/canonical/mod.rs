//! Canonical page computation module
//!
//! Resolves every physical page of a document to the label a reader would
//! cite, from user rules and OCR readings of page-number regions.
//!
//! # Features
//!
//! - Full recompute with strict precedence (rules, readings, unaccounted)
//! - Tagged resolution distinguishing rule overlaps and region conflicts
//! - Per-source statistics
//! - Display segments and compact one-line rendering
//! - Physical range strings rewritten in canonical labels
//!
//! # Example
//!
//! ```rust
//! use canonical_pages::{
//!     compute_canonical_pages, CanonicalPageRule, PageMapInput, Resolution, RuleKind,
//! };
//!
//! let input = PageMapInput::new(10).with_rules(vec![
//!     CanonicalPageRule::new("front", 1, 2, RuleKind::roman("i")),
//!     CanonicalPageRule::new("blank", 3, 3, RuleKind::Negative),
//! ]);
//!
//! let map = match compute_canonical_pages(&input).unwrap() {
//!     Resolution::Resolved(map) => map,
//!     other => panic!("unexpected conflict: {:?}", other),
//! };
//! assert_eq!(map.label_for(2), Some("ii"));
//! assert_eq!(map.statistics().unaccounted_pages, 7);
//! ```

mod compute;
mod range_string;
mod segments;
mod stats;
mod types;

pub use compute::{compute_canonical_pages, PageMapInput};
pub use range_string::canonical_range_string;
pub use segments::{
    format_canonical_pages_display, format_canonical_pages_with_metadata, CanonicalPageSegment,
};
pub use stats::{canonical_pages_statistics, CanonicalPagesStatistics};
pub use types::{CanonicalPage, CanonicalPagesMap, PageSource, Resolution, RuleOverlap};
