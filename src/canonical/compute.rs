//! Canonical page computation
//!
//! Precedence, highest first: user rules (positive or negative), OCR
//! readings from page-number regions, unaccounted. The map is rebuilt from
//! scratch on every call.

use super::types::{CanonicalPage, CanonicalPagesMap, Resolution, RuleOverlap};
use crate::error::{Result, ValidationError};
use crate::region::{detect_page_number_conflicts, Region, RegionDerivedPageNumber};
use crate::rules::{CanonicalPageRule, RuleKind};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Everything a recompute needs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMapInput {
    pub document_page_count: u32,
    /// Regions of every type; only page-number regions contribute labels
    #[serde(default)]
    pub regions: Vec<Region>,
    #[serde(default)]
    pub rules: Vec<CanonicalPageRule>,
    /// OCR readings, one per (page, region)
    #[serde(default)]
    pub context_derived_page_numbers: Vec<RegionDerivedPageNumber>,
}

impl PageMapInput {
    pub fn new(document_page_count: u32) -> Self {
        Self {
            document_page_count,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_regions(mut self, regions: Vec<Region>) -> Self {
        self.regions = regions;
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: Vec<CanonicalPageRule>) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn with_readings(mut self, readings: Vec<RegionDerivedPageNumber>) -> Self {
        self.context_derived_page_numbers = readings;
        self
    }

    /// Rules that are not soft-deleted
    pub fn active_rules(&self) -> impl Iterator<Item = &CanonicalPageRule> {
        self.rules.iter().filter(|r| r.is_active())
    }
}

/// Compute the canonical page map
///
/// Checks run in order: input validation, rule overlap, region conflicts.
/// The first check that fails decides the outcome.
pub fn compute_canonical_pages(input: &PageMapInput) -> Result<Resolution> {
    let page_count = input.document_page_count;
    let rules: Vec<&CanonicalPageRule> = input.active_rules().collect();

    for rule in &rules {
        rule.validate(Some(page_count))?;
    }
    validate_readings(input)?;

    let overlaps = find_rule_overlaps(&rules);
    if !overlaps.is_empty() {
        tracing::debug!(overlaps = overlaps.len(), "rules overlap, map not resolved");
        return Ok(Resolution::RuleConflict(overlaps));
    }

    let conflicts = detect_page_number_conflicts(
        &input.regions,
        page_count,
        &input.context_derived_page_numbers,
    )?;
    if !conflicts.is_empty() {
        return Ok(Resolution::RegionConflict(conflicts));
    }

    let mut map: CanonicalPagesMap = (1..=page_count)
        .map(|page| (page, CanonicalPage::Unaccounted))
        .collect();

    apply_readings(input, &mut map)?;

    for rule in &rules {
        match &rule.kind {
            RuleKind::Negative => {
                for page in rule.pages() {
                    map.insert(
                        page,
                        CanonicalPage::Excluded {
                            rule_id: rule.id.clone(),
                        },
                    );
                }
            }
            RuleKind::Positive(numbering) => {
                let labels = numbering.labels(rule.page_count())?;
                for (page, label) in rule.pages().zip(labels) {
                    map.insert(
                        page,
                        CanonicalPage::Rule {
                            label,
                            rule_id: rule.id.clone(),
                        },
                    );
                }
            }
        }
    }

    tracing::debug!(
        pages = page_count,
        rules = rules.len(),
        readings = input.context_derived_page_numbers.len(),
        "computed canonical pages"
    );

    Ok(Resolution::Resolved(map))
}

/// Readings must land inside the document and name a known region
fn validate_readings(input: &PageMapInput) -> Result<()> {
    let known: HashSet<&str> = input.regions.iter().map(|r| r.id.as_str()).collect();
    let page_count = input.document_page_count;

    let mut out_of_range: Vec<u32> = input
        .context_derived_page_numbers
        .iter()
        .map(|reading| reading.document_page)
        .filter(|&page| page < 1 || page > page_count)
        .collect();
    if !out_of_range.is_empty() {
        out_of_range.sort_unstable();
        out_of_range.dedup();
        return Err(ValidationError::PagesOutOfRange {
            pages: out_of_range,
            max: page_count,
        });
    }

    match input
        .context_derived_page_numbers
        .iter()
        .find(|reading| !known.contains(reading.region_id.as_str()))
    {
        Some(reading) => Err(ValidationError::UnknownRegion(reading.region_id.clone())),
        None => Ok(()),
    }
}

/// Assign OCR readings to the pages their region covers
fn apply_readings(input: &PageMapInput, map: &mut CanonicalPagesMap) -> Result<()> {
    let mut coverage: HashMap<&str, HashSet<u32>> = HashMap::new();
    for region in input.regions.iter().filter(|r| r.is_page_number()) {
        if coverage.contains_key(region.id.as_str()) {
            continue;
        }
        let pages = region
            .page_config
            .applicable_pages(input.document_page_count)?;
        coverage.insert(region.id.as_str(), pages.into_iter().collect());
    }

    for reading in &input.context_derived_page_numbers {
        let covered = coverage
            .get(reading.region_id.as_str())
            .is_some_and(|pages| pages.contains(&reading.document_page));
        if !covered {
            tracing::debug!(
                page = reading.document_page,
                region_id = %reading.region_id,
                "skipping reading outside its region's pages"
            );
            continue;
        }

        if matches!(map.get(reading.document_page), Some(CanonicalPage::Unaccounted)) {
            map.insert(
                reading.document_page,
                CanonicalPage::Context {
                    label: reading.canonical_page.clone(),
                    region_id: reading.region_id.clone(),
                },
            );
        }
    }

    Ok(())
}

/// Every pair of active rules sharing at least one page
fn find_rule_overlaps(rules: &[&CanonicalPageRule]) -> Vec<RuleOverlap> {
    let mut sorted: Vec<&CanonicalPageRule> = rules.to_vec();
    sorted.sort_by_key(|r| (r.document_page_start, r.document_page_end));

    let mut overlaps = Vec::new();
    for (i, first) in sorted.iter().enumerate() {
        for second in &sorted[i + 1..] {
            if second.document_page_start > first.document_page_end {
                break;
            }
            let start = second.document_page_start;
            let end = first.document_page_end.min(second.document_page_end);
            overlaps.push(RuleOverlap {
                first_rule_id: first.id.clone(),
                second_rule_id: second.id.clone(),
                pages: (start..=end).collect(),
            });
        }
    }
    overlaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_config::PageConfig;
    use crate::region::RegionType;
    use chrono::Utc;

    fn page_number_region(id: &str, config: PageConfig) -> Region {
        Region::new(id, format!("Region {}", id), RegionType::PageNumber, config)
    }

    fn reading(page: u32, label: &str, region_id: &str) -> RegionDerivedPageNumber {
        RegionDerivedPageNumber::new(page, label, region_id, format!("Region {}", region_id))
    }

    fn resolved(input: &PageMapInput) -> CanonicalPagesMap {
        match compute_canonical_pages(input).unwrap() {
            Resolution::Resolved(map) => map,
            other => panic!("expected resolved map, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_document() {
        let map = resolved(&PageMapInput::new(0));
        assert!(map.is_empty());
    }

    #[test]
    fn test_all_unaccounted() {
        let map = resolved(&PageMapInput::new(3));
        assert_eq!(map.len(), 3);
        assert!(map.iter().all(|(_, v)| *v == CanonicalPage::Unaccounted));
    }

    #[test]
    fn test_rules_assign_labels() {
        let input = PageMapInput::new(10).with_rules(vec![
            CanonicalPageRule::new("front", 1, 2, RuleKind::roman("i")),
            CanonicalPageRule::new("blank", 3, 3, RuleKind::Negative),
            CanonicalPageRule::new("body", 4, 6, RuleKind::arabic("1")),
        ]);
        let labels = resolved(&input).to_label_map();
        assert_eq!(labels[&1], "i");
        assert_eq!(labels[&2], "ii");
        assert_eq!(labels[&3], "excluded");
        assert_eq!(labels[&4], "1");
        assert_eq!(labels[&6], "3");
        assert_eq!(labels[&7], "unaccounted");
    }

    #[test]
    fn test_arbitrary_rule() {
        let input = PageMapInput::new(3).with_rules(vec![CanonicalPageRule::new(
            "a",
            2,
            3,
            RuleKind::arbitrary(["10a", "10b"]),
        )]);
        let map = resolved(&input);
        assert_eq!(map.label_for(2), Some("10a"));
        assert_eq!(map.label_for(3), Some("10b"));
    }

    #[test]
    fn test_arbitrary_length_mismatch_is_error() {
        let input = PageMapInput::new(5).with_rules(vec![CanonicalPageRule::new(
            "a",
            1,
            3,
            RuleKind::arbitrary(["a", "b"]),
        )]);
        assert!(matches!(
            compute_canonical_pages(&input),
            Err(ValidationError::SequenceLengthMismatch { .. })
        ));
    }

    #[test]
    fn test_rule_outside_document_is_error() {
        let input = PageMapInput::new(5)
            .with_rules(vec![CanonicalPageRule::new("a", 4, 6, RuleKind::Negative)]);
        assert!(compute_canonical_pages(&input).is_err());
    }

    #[test]
    fn test_overlapping_rules_conflict() {
        let input = PageMapInput::new(10).with_rules(vec![
            CanonicalPageRule::new("b", 4, 8, RuleKind::arabic("1")),
            CanonicalPageRule::new("a", 1, 5, RuleKind::arabic("1")),
        ]);
        let resolution = compute_canonical_pages(&input).unwrap();
        assert_eq!(
            resolution,
            Resolution::RuleConflict(vec![RuleOverlap {
                first_rule_id: "a".to_string(),
                second_rule_id: "b".to_string(),
                pages: vec![4, 5],
            }])
        );
        assert!(resolution.into_map().is_empty());
    }

    #[test]
    fn test_deleted_rules_ignored() {
        let mut deleted = CanonicalPageRule::new("old", 1, 5, RuleKind::Negative);
        deleted.deleted_at = Some(Utc::now());
        let input = PageMapInput::new(5).with_rules(vec![
            deleted,
            CanonicalPageRule::new("new", 1, 2, RuleKind::arabic("1")),
        ]);
        let map = resolved(&input);
        assert_eq!(map.label_for(1), Some("1"));
        assert_eq!(map.get(3), Some(&CanonicalPage::Unaccounted));
    }

    #[test]
    fn test_readings_fill_uncovered_pages() {
        let input = PageMapInput::new(4)
            .with_regions(vec![page_number_region("c", PageConfig::all_pages())])
            .with_readings(vec![reading(2, "12", "c"), reading(3, "13", "c")]);
        let map = resolved(&input);
        assert_eq!(
            map.get(2),
            Some(&CanonicalPage::Context {
                label: "12".to_string(),
                region_id: "c".to_string()
            })
        );
        assert_eq!(map.get(1), Some(&CanonicalPage::Unaccounted));
    }

    #[test]
    fn test_rules_override_readings() {
        let input = PageMapInput::new(4)
            .with_regions(vec![page_number_region("c", PageConfig::all_pages())])
            .with_rules(vec![CanonicalPageRule::new("r", 2, 2, RuleKind::roman("x"))])
            .with_readings(vec![reading(2, "12", "c")]);
        let map = resolved(&input);
        assert_eq!(map.label_for(2), Some("x"));
        assert_eq!(map.statistics().context_derived_pages, 0);
    }

    #[test]
    fn test_region_conflict() {
        let input = PageMapInput::new(4)
            .with_regions(vec![
                page_number_region("a", PageConfig::all_pages()),
                page_number_region("b", PageConfig::this_page(2)),
            ])
            .with_readings(vec![reading(2, "2", "a"), reading(2, "ii", "b")]);
        let resolution = compute_canonical_pages(&input).unwrap();
        match resolution {
            Resolution::RegionConflict(conflicts) => {
                assert_eq!(conflicts.len(), 1);
                assert_eq!(conflicts[0].page_number, 2);
            }
            other => panic!("expected region conflict, got {other:?}"),
        }
    }

    #[test]
    fn test_rule_conflict_checked_before_region_conflict() {
        let input = PageMapInput::new(4)
            .with_regions(vec![
                page_number_region("a", PageConfig::all_pages()),
                page_number_region("b", PageConfig::all_pages()),
            ])
            .with_rules(vec![
                CanonicalPageRule::new("r1", 1, 2, RuleKind::Negative),
                CanonicalPageRule::new("r2", 2, 3, RuleKind::Negative),
            ])
            .with_readings(vec![reading(1, "1", "a"), reading(1, "1", "b")]);
        assert!(matches!(
            compute_canonical_pages(&input).unwrap(),
            Resolution::RuleConflict(_)
        ));
    }

    #[test]
    fn test_reading_from_unknown_region_is_error() {
        let input = PageMapInput::new(4).with_readings(vec![reading(1, "1", "ghost")]);
        assert_eq!(
            compute_canonical_pages(&input),
            Err(ValidationError::UnknownRegion("ghost".to_string()))
        );
    }

    #[test]
    fn test_reading_outside_document_is_error() {
        let input = PageMapInput::new(4)
            .with_regions(vec![page_number_region("c", PageConfig::all_pages())])
            .with_readings(vec![reading(9, "9", "c")]);
        assert!(matches!(
            compute_canonical_pages(&input),
            Err(ValidationError::PagesOutOfRange { .. })
        ));
    }

    #[test]
    fn test_reading_outside_region_pages_dropped() {
        let input = PageMapInput::new(4)
            .with_regions(vec![page_number_region("c", PageConfig::this_page(1))])
            .with_readings(vec![reading(3, "3", "c")]);
        let map = resolved(&input);
        assert_eq!(map.get(3), Some(&CanonicalPage::Unaccounted));
    }

    #[test]
    fn test_every_other_region_past_document_end() {
        use crate::page_config::EveryOther;

        // Region drawn on a longer scan; the document now ends at page 10
        let config = PageConfig::all_pages().with_every_other(EveryOther::starting_at(12));
        let input = PageMapInput::new(10).with_regions(vec![page_number_region("c", config)]);
        let map = resolved(&input);
        assert_eq!(map.len(), 10);
        assert!(map.iter().all(|(_, v)| *v == CanonicalPage::Unaccounted));
    }

    #[test]
    fn test_exclude_region_readings_dropped() {
        let input = PageMapInput::new(2)
            .with_regions(vec![Region::new(
                "x",
                "Header",
                RegionType::Exclude,
                PageConfig::all_pages(),
            )])
            .with_readings(vec![reading(1, "1", "x")]);
        assert_eq!(resolved(&input).get(1), Some(&CanonicalPage::Unaccounted));
    }
}
