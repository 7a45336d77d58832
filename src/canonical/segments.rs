//! Display segments
//!
//! Runs of consecutive physical pages that share a label source, for
//! compact rendering of a canonical page map.

use super::types::{CanonicalPage, CanonicalPagesMap, PageSource};
use crate::region::Region;
use crate::rules::CanonicalPageRule;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A maximal run of pages with one label source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalPageSegment {
    pub source: PageSource,
    pub document_page_start: u32,
    pub document_page_end: u32,
    /// First label (physical page number when unaccounted, `None` when excluded)
    pub canonical_start: Option<String>,
    pub canonical_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    /// Label of the originating rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Regions whose readings make up a context segment
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub region_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub region_names: Vec<String>,
}

impl CanonicalPageSegment {
    fn start(page: u32, value: &CanonicalPage) -> Self {
        let label = canonical_value(page, value);
        Self {
            source: value.source(),
            document_page_start: page,
            document_page_end: page,
            canonical_start: label.clone(),
            canonical_end: label,
            rule_id: None,
            label: None,
            region_ids: Vec::new(),
            region_names: Vec::new(),
        }
    }

    fn extend(&mut self, page: u32, value: &CanonicalPage) {
        self.document_page_end = page;
        self.canonical_end = canonical_value(page, value);
    }

    pub fn page_count(&self) -> u32 {
        self.document_page_end - self.document_page_start + 1
    }

    /// `"start-end"` over labels, or the physical range for excluded pages
    pub fn range_text(&self) -> String {
        let (start, end) = match self.source {
            PageSource::RuleNegative => (
                self.document_page_start.to_string(),
                self.document_page_end.to_string(),
            ),
            _ => (
                self.canonical_start.clone().unwrap_or_default(),
                self.canonical_end.clone().unwrap_or_default(),
            ),
        };
        if start == end {
            start
        } else {
            format!("{}-{}", start, end)
        }
    }
}

/// Value shown for a page: its label, its physical number when
/// unaccounted, nothing when excluded
fn canonical_value(page: u32, value: &CanonicalPage) -> Option<String> {
    match value {
        CanonicalPage::Unaccounted => Some(page.to_string()),
        CanonicalPage::Excluded { .. } => None,
        CanonicalPage::Rule { label, .. } | CanonicalPage::Context { label, .. } => {
            Some(label.clone())
        }
    }
}

/// Whether `value` on the page after `segment` continues that segment
///
/// Context pages merge across regions; rule pages only within one rule.
fn continues(segment: &CanonicalPageSegment, page: u32, value: &CanonicalPage) -> bool {
    if segment.document_page_end.checked_add(1) != Some(page) {
        return false;
    }
    match value {
        CanonicalPage::Context { .. } => segment.source == PageSource::Context,
        CanonicalPage::Unaccounted => segment.source == PageSource::Unaccounted,
        CanonicalPage::Excluded { rule_id } | CanonicalPage::Rule { rule_id, .. } => {
            segment.source == value.source() && segment.rule_id.as_deref() == Some(rule_id.as_str())
        }
    }
}

/// Segments carrying the rule or regions behind each run
pub fn format_canonical_pages_with_metadata(
    map: &CanonicalPagesMap,
    rules: &[CanonicalPageRule],
    regions: &[Region],
) -> Vec<CanonicalPageSegment> {
    let rules_by_id: HashMap<&str, &CanonicalPageRule> =
        rules.iter().map(|r| (r.id.as_str(), r)).collect();
    let regions_by_id: HashMap<&str, &Region> =
        regions.iter().map(|r| (r.id.as_str(), r)).collect();

    let mut segments: Vec<CanonicalPageSegment> = Vec::new();

    for (page, value) in map.iter() {
        let extend = segments
            .last()
            .is_some_and(|segment| continues(segment, page, value));

        if extend {
            if let Some(segment) = segments.last_mut() {
                segment.extend(page, value);
                if let CanonicalPage::Context { region_id, .. } = value {
                    add_region(segment, region_id, &regions_by_id);
                }
            }
            continue;
        }

        let mut segment = CanonicalPageSegment::start(page, value);
        match value {
            CanonicalPage::Rule { rule_id, .. } | CanonicalPage::Excluded { rule_id } => {
                segment.rule_id = Some(rule_id.clone());
                segment.label = rules_by_id
                    .get(rule_id.as_str())
                    .and_then(|rule| rule.label.clone())
                    .filter(|label| !label.is_empty());
            }
            CanonicalPage::Context { region_id, .. } => {
                add_region(&mut segment, region_id, &regions_by_id);
            }
            CanonicalPage::Unaccounted => {}
        }
        segments.push(segment);
    }

    segments
}

fn add_region(
    segment: &mut CanonicalPageSegment,
    region_id: &str,
    regions_by_id: &HashMap<&str, &Region>,
) {
    if segment.region_ids.iter().any(|id| id == region_id) {
        return;
    }
    segment.region_ids.push(region_id.to_string());
    if let Some(region) = regions_by_id.get(region_id) {
        if !region.name.is_empty() {
            segment.region_names.push(region.name.clone());
        }
    }
}

/// One-line rendering, e.g. `"1-19 [red]  i-x [blue]  20 [gray] (ignored)"`
///
/// Runs here merge by source alone, so adjacent rules of the same kind
/// share one entry.
pub fn format_canonical_pages_display(map: &CanonicalPagesMap) -> String {
    if map.is_empty() {
        return "(No pages)".to_string();
    }

    let mut segments: Vec<CanonicalPageSegment> = Vec::new();
    for (page, value) in map.iter() {
        let extend = segments.last().is_some_and(|segment| {
            segment.source == value.source()
                && segment.document_page_end.checked_add(1) == Some(page)
        });
        if !extend {
            segments.push(CanonicalPageSegment::start(page, value));
        } else if let Some(segment) = segments.last_mut() {
            segment.extend(page, value);
        }
    }

    segments
        .iter()
        .map(|segment| {
            let marker = format!("[{}]", segment.source.color());
            match segment.source {
                PageSource::RuleNegative => {
                    format!("{} {} (ignored)", segment.range_text(), marker)
                }
                _ => format!("{} {}", segment.range_text(), marker),
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}
