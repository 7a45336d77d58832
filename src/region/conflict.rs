//! Page-number region conflict detection
//!
//! A page is in conflict when two or more distinct page-number regions
//! produced a reading for it. The detector never picks a winner.

use super::types::{PageNumberConflict, Region, RegionDerivedPageNumber, RegionRef};
use crate::error::Result;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Find pages claimed by more than one page-number region
///
/// A region only counts on a page when its page configuration covers the
/// page and a derived reading exists for that (page, region) pair. Results
/// are ordered by page; regions keep their input order.
pub fn detect_page_number_conflicts(
    regions: &[Region],
    max_page: u32,
    derived: &[RegionDerivedPageNumber],
) -> Result<Vec<PageNumberConflict>> {
    let mut readings: HashMap<u32, HashSet<&str>> = HashMap::new();
    for reading in derived {
        readings
            .entry(reading.document_page)
            .or_default()
            .insert(reading.region_id.as_str());
    }

    let mut claims: BTreeMap<u32, Vec<RegionRef>> = BTreeMap::new();
    let mut seen_ids: HashSet<&str> = HashSet::new();

    for region in regions.iter().filter(|r| r.is_page_number()) {
        if !seen_ids.insert(region.id.as_str()) {
            continue;
        }

        for page in region.page_config.applicable_pages(max_page)? {
            let has_reading = readings
                .get(&page)
                .is_some_and(|ids| ids.contains(region.id.as_str()));
            if has_reading {
                claims.entry(page).or_default().push(region.to_ref());
            }
        }
    }

    let conflicts: Vec<PageNumberConflict> = claims
        .into_iter()
        .filter(|(_, regions)| regions.len() > 1)
        .map(|(page_number, regions)| PageNumberConflict {
            page_number,
            regions,
        })
        .collect();

    if !conflicts.is_empty() {
        tracing::debug!(
            conflicting_pages = conflicts.len(),
            "page-number regions disagree"
        );
    }

    Ok(conflicts)
}
