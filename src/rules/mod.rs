//! Canonical page rules
//!
//! Rule types, save-time conflict detection, contiguous-rule joining and
//! the stores rules are persisted in.
//!
//! # Example
//!
//! ```
//! use canonical_pages::rules::{MemoryRuleStore, RuleDraft, RuleKind, RuleService};
//! use std::sync::Arc;
//!
//! let service = RuleService::new(Arc::new(MemoryRuleStore::new()));
//! let rule = service
//!     .create_rule(RuleDraft::new(1, 4, RuleKind::roman("i")))
//!     .unwrap();
//! assert_eq!(rule.labels().unwrap().unwrap()[3], "iv");
//! ```

mod conflict;
mod join;
mod service;
mod store;
mod types;

pub use conflict::{detect_rule_conflicts, RuleConflict};
pub use join::{find_join, JoinPlan};
pub use service::RuleService;
pub use store::{JsonRuleStore, MemoryRuleStore, RuleStore, StoreError};
pub use types::{
    CanonicalPageRule, Numbering, RuleDraft, RuleKind, RuleSummary, RuleUpdate,
};
