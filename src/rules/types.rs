//! Canonical page rule types
//!
//! A rule is an explicit user override for a contiguous physical page range:
//! positive rules declare how the range is numbered, negative rules mark it
//! as intentionally unindexed.

use crate::error::{Result, ValidationError};
use crate::numeral::{generate_arabic_numerals, generate_roman_numerals, roman_to_int, NumeralType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

// ============================================================
// Rule Kinds
// ============================================================

/// Numbering declared by a positive rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "numeral_type", rename_all = "snake_case")]
pub enum Numbering {
    /// Decimal labels counting up from `starting_canonical_page`
    Arabic { starting_canonical_page: String },
    /// Lowercase Roman labels counting up from `starting_canonical_page`
    Roman { starting_canonical_page: String },
    /// One literal label per page, in physical order
    Arbitrary { arbitrary_sequence: Vec<String> },
}

impl Numbering {
    pub fn numeral_type(&self) -> NumeralType {
        match self {
            Numbering::Arabic { .. } => NumeralType::Arabic,
            Numbering::Roman { .. } => NumeralType::Roman,
            Numbering::Arbitrary { .. } => NumeralType::Arbitrary,
        }
    }

    /// Labels for a range of `page_count` pages
    pub fn labels(&self, page_count: u32) -> Result<Vec<String>> {
        let count = i64::from(page_count);
        match self {
            Numbering::Arabic {
                starting_canonical_page,
            } => generate_arabic_numerals(parse_arabic_start(starting_canonical_page)?, count),
            Numbering::Roman {
                starting_canonical_page,
            } => generate_roman_numerals(starting_canonical_page, count),
            Numbering::Arbitrary { arbitrary_sequence } => Ok(arbitrary_sequence.clone()),
        }
    }
}

fn parse_arabic_start(start: &str) -> Result<i64> {
    start
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidArabicNumeral(start.to_string()))
}

/// Positive or negative rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule_type", rename_all = "snake_case")]
pub enum RuleKind {
    Positive(Numbering),
    Negative,
}

impl RuleKind {
    /// Positive Arabic numbering starting at `start`
    pub fn arabic(start: impl Into<String>) -> Self {
        RuleKind::Positive(Numbering::Arabic {
            starting_canonical_page: start.into(),
        })
    }

    /// Positive Roman numbering starting at `start`
    pub fn roman(start: impl Into<String>) -> Self {
        RuleKind::Positive(Numbering::Roman {
            starting_canonical_page: start.into(),
        })
    }

    /// Positive arbitrary numbering
    pub fn arbitrary<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        RuleKind::Positive(Numbering::Arbitrary {
            arbitrary_sequence: labels.into_iter().map(Into::into).collect(),
        })
    }

    pub fn is_negative(&self) -> bool {
        matches!(self, RuleKind::Negative)
    }

    /// Numeral type of a positive rule
    pub fn numeral_type(&self) -> Option<NumeralType> {
        match self {
            RuleKind::Positive(numbering) => Some(numbering.numeral_type()),
            RuleKind::Negative => None,
        }
    }

    /// Name used in logs and summaries
    pub fn rule_type_name(&self) -> &'static str {
        match self {
            RuleKind::Positive(_) => "positive",
            RuleKind::Negative => "negative",
        }
    }
}

// ============================================================
// Rules
// ============================================================

/// Stored canonical page rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPageRule {
    pub id: String,
    /// Optional human-readable label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub document_page_start: u32,
    pub document_page_end: u32,
    #[serde(flatten)]
    pub kind: RuleKind,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl CanonicalPageRule {
    /// Create an active rule
    pub fn new(id: impl Into<String>, start: u32, end: u32, kind: RuleKind) -> Self {
        Self {
            id: id.into(),
            label: None,
            document_page_start: start,
            document_page_end: end,
            kind,
            created_at: Utc::now(),
            updated_at: None,
            deleted_at: None,
        }
    }

    /// Set the human-readable label
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Build a rule from a validated draft
    pub fn from_draft(id: impl Into<String>, draft: RuleDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            label: draft.label,
            document_page_start: draft.document_page_start,
            document_page_end: draft.document_page_end,
            kind: draft.kind,
            created_at: now,
            updated_at: None,
            deleted_at: None,
        }
    }

    /// A rule is active until soft-deleted
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Physical pages covered by the rule
    pub fn pages(&self) -> RangeInclusive<u32> {
        self.document_page_start..=self.document_page_end
    }

    /// Number of physical pages covered (0 for an inverted range)
    pub fn page_count(&self) -> u32 {
        range_len(self.document_page_start, self.document_page_end)
    }

    /// Whether the physical ranges of two rules intersect
    pub fn overlaps(&self, other: &CanonicalPageRule) -> bool {
        self.document_page_start <= other.document_page_end
            && self.document_page_end >= other.document_page_start
    }

    /// Check range shape, bounds and numbering data
    ///
    /// `document_page_count` bounds the range when known.
    pub fn validate(&self, document_page_count: Option<u32>) -> Result<()> {
        validate_shape(
            &self.id,
            self.document_page_start,
            self.document_page_end,
            &self.kind,
            document_page_count,
        )
    }

    /// Labels for each covered page in physical order (`None` for negative rules)
    pub fn labels(&self) -> Result<Option<Vec<String>>> {
        match &self.kind {
            RuleKind::Positive(numbering) => numbering.labels(self.page_count()).map(Some),
            RuleKind::Negative => Ok(None),
        }
    }

    pub fn summary(&self) -> RuleSummary {
        RuleSummary {
            id: self.id.clone(),
            rule_type: self.kind.rule_type_name().to_string(),
            document_page_start: self.document_page_start,
            document_page_end: self.document_page_end,
            label: self.label.clone(),
        }
    }
}

fn range_len(start: u32, end: u32) -> u32 {
    if end < start {
        0
    } else {
        end - start + 1
    }
}

fn validate_shape(
    id: &str,
    start: u32,
    end: u32,
    kind: &RuleKind,
    document_page_count: Option<u32>,
) -> Result<()> {
    if start < 1 {
        return Err(ValidationError::PagesOutOfRange {
            pages: vec![start],
            max: document_page_count.unwrap_or(u32::MAX),
        });
    }
    if start > end {
        return Err(ValidationError::InvertedRuleRange { start, end });
    }
    if let Some(max) = document_page_count {
        if end > max {
            let pages: Vec<u32> = [start, end].into_iter().filter(|&p| p > max).collect();
            return Err(ValidationError::PagesOutOfRange { pages, max });
        }
    }

    let page_count = range_len(start, end);
    match kind {
        RuleKind::Negative => {}
        RuleKind::Positive(Numbering::Arabic {
            starting_canonical_page,
        }) => {
            let first = parse_arabic_start(starting_canonical_page)?;
            if first.checked_add(i64::from(page_count) - 1).is_none() {
                return Err(ValidationError::SequenceOverflow {
                    start: first,
                    count: i64::from(page_count),
                });
            }
        }
        RuleKind::Positive(Numbering::Roman {
            starting_canonical_page,
        }) => {
            let first = roman_to_int(starting_canonical_page).ok_or_else(|| {
                ValidationError::InvalidRomanNumeral(starting_canonical_page.clone())
            })?;
            let last = i64::from(first) + i64::from(page_count) - 1;
            if last > i64::from(crate::numeral::MAX_ROMAN_VALUE) {
                return Err(ValidationError::RomanOutOfRange(last));
            }
        }
        RuleKind::Positive(Numbering::Arbitrary { arbitrary_sequence }) => {
            if arbitrary_sequence.len() != page_count as usize {
                return Err(ValidationError::SequenceLengthMismatch {
                    rule_id: id.to_string(),
                    expected: page_count as usize,
                    actual: arbitrary_sequence.len(),
                });
            }
        }
    }

    Ok(())
}

// ============================================================
// Store Inputs and Reports
// ============================================================

/// Rule as submitted for creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub document_page_start: u32,
    pub document_page_end: u32,
    #[serde(flatten)]
    pub kind: RuleKind,
}

impl RuleDraft {
    pub fn new(start: u32, end: u32, kind: RuleKind) -> Self {
        Self {
            label: None,
            document_page_start: start,
            document_page_end: end,
            kind,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Structural validation (no document bounds)
    pub fn validate(&self) -> Result<()> {
        validate_shape(
            "draft",
            self.document_page_start,
            self.document_page_end,
            &self.kind,
            None,
        )
    }
}

/// Partial update of a stored rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleUpdate {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub document_page_start: Option<u32>,
    #[serde(default)]
    pub document_page_end: Option<u32>,
    #[serde(default)]
    pub kind: Option<RuleKind>,
}

impl RuleUpdate {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Whether the update moves the physical range
    pub fn changes_range(&self) -> bool {
        self.document_page_start.is_some() || self.document_page_end.is_some()
    }
}

/// Compact description of a rule used in conflict payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSummary {
    pub id: String,
    pub rule_type: String,
    pub document_page_start: u32,
    pub document_page_end: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}
