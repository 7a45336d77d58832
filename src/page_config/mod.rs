//! Page configuration module
//!
//! Range-string grammar and expansion of region page configurations into
//! concrete physical page sets.
//!
//! # Example
//!
//! ```rust
//! use canonical_pages::{EveryOther, PageConfig};
//!
//! let config = PageConfig::all_pages()
//!     .with_every_other(EveryOther::between(3, 11))
//!     .with_except_pages(vec![7]);
//!
//! assert_eq!(config.applicable_pages(20).unwrap(), vec![3, 5, 9, 11]);
//! ```

mod expand;
mod range;
mod summary;
mod types;

pub use range::{parse_page_range, parse_page_range_within, validate_page_range};
pub use summary::page_config_summary;
pub use types::{EveryOther, PageConfig};
