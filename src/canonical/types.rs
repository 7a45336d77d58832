//! Canonical page map types

use crate::region::PageNumberConflict;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================
// Per-page Result
// ============================================================

/// Where a page's canonical label came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSource {
    /// No rule and no OCR reading
    Unaccounted,
    /// OCR reading from a page-number region
    Context,
    /// Positive user rule
    RulePositive,
    /// Negative user rule
    RuleNegative,
}

impl PageSource {
    /// Colour marker used by compact displays
    pub fn color(self) -> &'static str {
        match self {
            PageSource::Unaccounted => "red",
            PageSource::Context => "green",
            PageSource::RulePositive => "blue",
            PageSource::RuleNegative => "gray",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PageSource::Unaccounted => "unaccounted",
            PageSource::Context => "context",
            PageSource::RulePositive => "rule_positive",
            PageSource::RuleNegative => "rule_negative",
        }
    }
}

impl fmt::Display for PageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical value of one physical page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum CanonicalPage {
    Unaccounted,
    Excluded { rule_id: String },
    Rule { label: String, rule_id: String },
    Context { label: String, region_id: String },
}

impl CanonicalPage {
    pub fn source(&self) -> PageSource {
        match self {
            CanonicalPage::Unaccounted => PageSource::Unaccounted,
            CanonicalPage::Excluded { .. } => PageSource::RuleNegative,
            CanonicalPage::Rule { .. } => PageSource::RulePositive,
            CanonicalPage::Context { .. } => PageSource::Context,
        }
    }

    /// Assigned label, if the page has one
    pub fn label(&self) -> Option<&str> {
        match self {
            CanonicalPage::Rule { label, .. } | CanonicalPage::Context { label, .. } => {
                Some(label)
            }
            CanonicalPage::Unaccounted | CanonicalPage::Excluded { .. } => None,
        }
    }

    /// Label, `"excluded"` or `"unaccounted"`
    pub fn display_label(&self) -> &str {
        match self {
            CanonicalPage::Unaccounted => "unaccounted",
            CanonicalPage::Excluded { .. } => "excluded",
            CanonicalPage::Rule { label, .. } | CanonicalPage::Context { label, .. } => label,
        }
    }

    /// Rule or region that produced the value
    pub fn source_id(&self) -> Option<&str> {
        match self {
            CanonicalPage::Unaccounted => None,
            CanonicalPage::Excluded { rule_id } | CanonicalPage::Rule { rule_id, .. } => {
                Some(rule_id)
            }
            CanonicalPage::Context { region_id, .. } => Some(region_id),
        }
    }
}

// ============================================================
// Map
// ============================================================

/// Physical page to canonical value, ascending by page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalPagesMap {
    pages: BTreeMap<u32, CanonicalPage>,
}

impl CanonicalPagesMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, page: u32, value: CanonicalPage) {
        self.pages.insert(page, value);
    }

    /// Canonical value for a physical page
    pub fn get(&self, page: u32) -> Option<&CanonicalPage> {
        self.pages.get(&page)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Highest physical page in the map
    pub fn last_page(&self) -> Option<u32> {
        self.pages.keys().next_back().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &CanonicalPage)> {
        self.pages.iter().map(|(&page, value)| (page, value))
    }

    /// Assigned label for a page (`None` when excluded, unaccounted or absent)
    pub fn label_for(&self, page: u32) -> Option<&str> {
        self.get(page).and_then(CanonicalPage::label)
    }

    /// Flatten to page → label / `"excluded"` / `"unaccounted"`
    pub fn to_label_map(&self) -> BTreeMap<u32, String> {
        self.iter()
            .map(|(page, value)| (page, value.display_label().to_string()))
            .collect()
    }

    pub fn statistics(&self) -> super::CanonicalPagesStatistics {
        super::canonical_pages_statistics(self)
    }
}

impl FromIterator<(u32, CanonicalPage)> for CanonicalPagesMap {
    fn from_iter<I: IntoIterator<Item = (u32, CanonicalPage)>>(iter: I) -> Self {
        Self {
            pages: iter.into_iter().collect(),
        }
    }
}

// ============================================================
// Resolution
// ============================================================

/// Two active rules claiming the same physical pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOverlap {
    pub first_rule_id: String,
    pub second_rule_id: String,
    /// Shared physical pages, ascending
    pub pages: Vec<u32>,
}

/// Outcome of a full recompute
///
/// Conflicts are expected editing states, not errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum Resolution {
    Resolved(CanonicalPagesMap),
    RuleConflict(Vec<RuleOverlap>),
    RegionConflict(Vec<PageNumberConflict>),
}

impl Resolution {
    pub fn is_conflict(&self) -> bool {
        !matches!(self, Resolution::Resolved(_))
    }

    /// Resolved map, if any
    pub fn map(&self) -> Option<&CanonicalPagesMap> {
        match self {
            Resolution::Resolved(map) => Some(map),
            _ => None,
        }
    }

    /// Collapse to a map; any conflict yields an empty map
    pub fn into_map(self) -> CanonicalPagesMap {
        match self {
            Resolution::Resolved(map) => map,
            Resolution::RuleConflict(_) | Resolution::RegionConflict(_) => {
                CanonicalPagesMap::new()
            }
        }
    }
}
