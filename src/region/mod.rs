//! Region module
//!
//! User-drawn regions, OCR readings attributed to them, and detection of
//! pages where several page-number regions disagree.

mod conflict;
mod types;

pub use conflict::detect_page_number_conflicts;
pub use types::{
    BoundingBox, PageNumberConflict, Region, RegionDerivedPageNumber, RegionRef, RegionType,
};
