//! Page configuration types
//!
//! Describes which physical pages a region applies to.

use serde::{Deserialize, Serialize};

/// Every-other-page filter for multi-page modes
///
/// Keeps `start_page, start_page + 2, ...` up to `end_page` (default: the
/// last page of the document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EveryOther {
    pub start_page: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_page: Option<u32>,
}

impl EveryOther {
    /// Every other page from `start_page` to the end of the document
    pub fn starting_at(start_page: u32) -> Self {
        Self {
            start_page,
            end_page: None,
        }
    }

    /// Every other page within `start_page..=end_page`
    pub fn between(start_page: u32, end_page: u32) -> Self {
        Self {
            start_page,
            end_page: Some(end_page),
        }
    }
}

/// Page configuration of a region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PageConfig {
    /// A single physical page
    ThisPage { page_number: u32 },
    /// Every page of the document
    AllPages {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        every_other: Option<EveryOther>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        except_pages: Vec<u32>,
    },
    /// Pages named by a range string ("1-2,5-6,8")
    #[serde(alias = "custom")]
    PageRange {
        page_range: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        every_other: Option<EveryOther>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        except_pages: Vec<u32>,
    },
}

impl PageConfig {
    /// Single-page configuration
    pub fn this_page(page_number: u32) -> Self {
        PageConfig::ThisPage { page_number }
    }

    /// All pages, no filters
    pub fn all_pages() -> Self {
        PageConfig::AllPages {
            every_other: None,
            except_pages: Vec::new(),
        }
    }

    /// Range-string configuration, no filters
    pub fn page_range(range: impl Into<String>) -> Self {
        PageConfig::PageRange {
            page_range: range.into(),
            every_other: None,
            except_pages: Vec::new(),
        }
    }

    /// Add an every-other filter (ignored for `ThisPage`)
    #[must_use]
    pub fn with_every_other(mut self, filter: EveryOther) -> Self {
        match &mut self {
            PageConfig::ThisPage { .. } => {}
            PageConfig::AllPages { every_other, .. } | PageConfig::PageRange { every_other, .. } => {
                *every_other = Some(filter);
            }
        }
        self
    }

    /// Set the exception list (ignored for `ThisPage`)
    #[must_use]
    pub fn with_except_pages(mut self, pages: impl Into<Vec<u32>>) -> Self {
        match &mut self {
            PageConfig::ThisPage { .. } => {}
            PageConfig::AllPages { except_pages, .. } | PageConfig::PageRange { except_pages, .. } => {
                *except_pages = pages.into();
            }
        }
        self
    }

    /// Every-other filter, if any
    pub fn every_other(&self) -> Option<&EveryOther> {
        match self {
            PageConfig::ThisPage { .. } => None,
            PageConfig::AllPages { every_other, .. } | PageConfig::PageRange { every_other, .. } => {
                every_other.as_ref()
            }
        }
    }

    /// Exception list (empty for `ThisPage`)
    pub fn except_pages(&self) -> &[u32] {
        match self {
            PageConfig::ThisPage { .. } => &[],
            PageConfig::AllPages { except_pages, .. } | PageConfig::PageRange { except_pages, .. } => {
                except_pages
            }
        }
    }
}
