//! Per-source page counts

use super::types::{CanonicalPagesMap, PageSource};
use serde::{Deserialize, Serialize};

/// Page counts by label source; the four categories sum to `total_pages`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalPagesStatistics {
    pub total_pages: usize,
    pub unaccounted_pages: usize,
    pub context_derived_pages: usize,
    pub user_defined_positive_pages: usize,
    pub user_defined_negative_pages: usize,
}

pub fn canonical_pages_statistics(map: &CanonicalPagesMap) -> CanonicalPagesStatistics {
    let mut stats = CanonicalPagesStatistics {
        total_pages: map.len(),
        ..Default::default()
    };

    for (_, value) in map.iter() {
        match value.source() {
            PageSource::Unaccounted => stats.unaccounted_pages += 1,
            PageSource::Context => stats.context_derived_pages += 1,
            PageSource::RulePositive => stats.user_defined_positive_pages += 1,
            PageSource::RuleNegative => stats.user_defined_negative_pages += 1,
        }
    }

    stats
}
