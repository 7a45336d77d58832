//! Contiguous rule joining
//!
//! Two stored rules are joined when they are adjacent in physical pages,
//! share rule type and numeral type, and (for positive rules) their labels
//! continue one another.

use super::types::{CanonicalPageRule, Numbering, RuleKind};
use crate::numeral::detect_sequence_continuity;

/// Merge to perform on the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinPlan {
    /// Rule that survives with the union range
    pub keep_id: String,
    /// Rule absorbed by the survivor
    pub remove_id: String,
    pub document_page_start: u32,
    pub document_page_end: u32,
    /// Numbering of the union range
    pub kind: RuleKind,
}

/// Find the first joinable pair among active rules (ordered by start page)
pub fn find_join(rules: &[CanonicalPageRule]) -> Option<JoinPlan> {
    let mut active: Vec<&CanonicalPageRule> = rules.iter().filter(|r| r.is_active()).collect();
    active.sort_by_key(|r| (r.document_page_start, r.document_page_end));

    active.windows(2).find_map(|pair| plan_join(pair[0], pair[1]))
}

fn plan_join(first: &CanonicalPageRule, second: &CanonicalPageRule) -> Option<JoinPlan> {
    if first.document_page_end.checked_add(1) != Some(second.document_page_start) {
        return None;
    }

    let kind = match (&first.kind, &second.kind) {
        (RuleKind::Negative, RuleKind::Negative) => RuleKind::Negative,
        (RuleKind::Positive(a), RuleKind::Positive(b)) => {
            if a.numeral_type() != b.numeral_type() {
                return None;
            }
            let mut labels = first.labels().ok()??;
            labels.extend(second.labels().ok()??);
            if labels.is_empty() || !detect_sequence_continuity(&labels) {
                return None;
            }
            RuleKind::Positive(merged_numbering(a, b))
        }
        _ => return None,
    };

    let (keep, remove) = if survives(first, second) {
        (first, second)
    } else {
        (second, first)
    };

    Some(JoinPlan {
        keep_id: keep.id.clone(),
        remove_id: remove.id.clone(),
        document_page_start: first.document_page_start,
        document_page_end: second.document_page_end,
        kind,
    })
}

/// Larger rule wins; ties go to the earlier-created rule
fn survives(first: &CanonicalPageRule, second: &CanonicalPageRule) -> bool {
    match first.page_count().cmp(&second.page_count()) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => first.created_at <= second.created_at,
    }
}

/// Numbering of the union: the first rule's start carries over
fn merged_numbering(first: &Numbering, second: &Numbering) -> Numbering {
    match (first, second) {
        (
            Numbering::Arbitrary { arbitrary_sequence },
            Numbering::Arbitrary {
                arbitrary_sequence: tail,
            },
        ) => Numbering::Arbitrary {
            arbitrary_sequence: arbitrary_sequence.iter().chain(tail).cloned().collect(),
        },
        _ => first.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn rule(id: &str, start: u32, end: u32, kind: RuleKind) -> CanonicalPageRule {
        CanonicalPageRule::new(id, start, end, kind)
    }

    #[test]
    fn test_join_continuous_roman() {
        let rules = vec![
            rule("a", 1, 2, RuleKind::roman("i")),
            rule("b", 3, 10, RuleKind::roman("iii")),
        ];
        let plan = find_join(&rules).unwrap();
        assert_eq!(plan.keep_id, "b");
        assert_eq!(plan.remove_id, "a");
        assert_eq!((plan.document_page_start, plan.document_page_end), (1, 10));
        // Survivor takes over the first rule's starting label
        assert_eq!(plan.kind, RuleKind::roman("i"));
    }

    #[test]
    fn test_no_join_on_gap_in_labels() {
        let rules = vec![
            rule("a", 1, 2, RuleKind::arabic("1")),
            rule("b", 3, 5, RuleKind::arabic("10")),
        ];
        assert!(find_join(&rules).is_none());
    }

    #[test]
    fn test_no_join_on_gap_in_pages() {
        let rules = vec![
            rule("a", 1, 2, RuleKind::arabic("1")),
            rule("b", 4, 5, RuleKind::arabic("3")),
        ];
        assert!(find_join(&rules).is_none());
    }

    #[test]
    fn test_no_join_across_numeral_types() {
        let rules = vec![
            rule("a", 1, 2, RuleKind::roman("i")),
            rule("b", 3, 5, RuleKind::arabic("3")),
        ];
        assert!(find_join(&rules).is_none());
    }

    #[test]
    fn test_no_join_positive_with_negative() {
        let rules = vec![
            rule("a", 1, 2, RuleKind::Negative),
            rule("b", 3, 5, RuleKind::arabic("1")),
        ];
        assert!(find_join(&rules).is_none());
    }

    #[test]
    fn test_join_negatives() {
        let rules = vec![
            rule("a", 4, 6, RuleKind::Negative),
            rule("b", 1, 3, RuleKind::Negative),
        ];
        let plan = find_join(&rules).unwrap();
        assert_eq!((plan.document_page_start, plan.document_page_end), (1, 6));
        assert_eq!(plan.kind, RuleKind::Negative);
    }

    #[test]
    fn test_tie_keeps_earlier_rule() {
        let mut older = rule("older", 3, 4, RuleKind::Negative);
        let newer = rule("newer", 1, 2, RuleKind::Negative);
        older.created_at = newer.created_at - Duration::seconds(60);
        let plan = find_join(&[older, newer]).unwrap();
        assert_eq!(plan.keep_id, "older");
    }

    #[test]
    fn test_join_arbitrary_concatenates() {
        let rules = vec![
            rule("a", 1, 2, RuleKind::arbitrary(["1", "2"])),
            rule("b", 3, 3, RuleKind::arbitrary(["3"])),
        ];
        let plan = find_join(&rules).unwrap();
        assert_eq!(plan.kind, RuleKind::arbitrary(["1", "2", "3"]));
    }

    #[test]
    fn test_deleted_rules_ignored() {
        let mut deleted = rule("a", 1, 2, RuleKind::Negative);
        deleted.deleted_at = Some(Utc::now());
        let rules = vec![deleted, rule("b", 3, 5, RuleKind::Negative)];
        assert!(find_join(&rules).is_none());
    }
}
