//! Save-time rule conflict detection
//!
//! Checks a proposed page range against the rules already stored. This is
//! the persistence-layer check; it is independent of the overlap check the
//! computer runs over the full rule set.

use super::types::{CanonicalPageRule, RuleSummary};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Pages a proposed rule would share with stored rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConflict {
    /// Contested physical pages, ascending
    pub document_pages: Vec<u32>,
    /// Stored rules claiming any of those pages
    pub existing_rules: Vec<RuleSummary>,
}

impl RuleConflict {
    pub fn is_empty(&self) -> bool {
        self.document_pages.is_empty()
    }
}

impl fmt::Display for RuleConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pages: Vec<String> = self.document_pages.iter().map(u32::to_string).collect();
        let rules: Vec<&str> = self.existing_rules.iter().map(|r| r.id.as_str()).collect();
        write!(
            f,
            "Rule conflicts with existing rules {} on pages {}",
            rules.join(", "),
            pages.join(", ")
        )
    }
}

/// Compare `start..=end` against active stored rules
///
/// `exclude_rule_id` skips the rule being updated.
pub fn detect_rule_conflicts(
    existing: &[CanonicalPageRule],
    start: u32,
    end: u32,
    exclude_rule_id: Option<&str>,
) -> RuleConflict {
    let conflicting: Vec<&CanonicalPageRule> = existing
        .iter()
        .filter(|rule| rule.is_active())
        .filter(|rule| exclude_rule_id != Some(rule.id.as_str()))
        .filter(|rule| start <= rule.document_page_end && end >= rule.document_page_start)
        .collect();

    let pages: BTreeSet<u32> = conflicting
        .iter()
        .flat_map(|rule| start.max(rule.document_page_start)..=end.min(rule.document_page_end))
        .collect();

    RuleConflict {
        document_pages: pages.into_iter().collect(),
        existing_rules: conflicting.iter().map(|rule| rule.summary()).collect(),
    }
}
