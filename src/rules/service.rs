//! Rule management on top of a [`RuleStore`]
//!
//! Validates drafts and updates, rejects ranges that overlap stored rules,
//! soft-deletes, and optionally joins contiguous rules after each change.

use super::conflict::detect_rule_conflicts;
use super::join::{find_join, JoinPlan};
use super::store::{RuleStore, StoreError};
use super::types::{CanonicalPageRule, RuleDraft, RuleUpdate};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Rule manager
pub struct RuleService {
    store: Arc<dyn RuleStore>,
    auto_join: bool,
    document_page_count: Option<u32>,
}

impl RuleService {
    /// Create a service with auto-join enabled
    pub fn new(store: Arc<dyn RuleStore>) -> Self {
        Self {
            store,
            auto_join: true,
            document_page_count: None,
        }
    }

    #[must_use]
    pub fn with_auto_join(mut self, enabled: bool) -> Self {
        self.auto_join = enabled;
        self
    }

    /// Bound rule ranges by the document length
    #[must_use]
    pub fn with_document_page_count(mut self, count: u32) -> Self {
        self.document_page_count = Some(count);
        self
    }

    pub fn store(&self) -> &Arc<dyn RuleStore> {
        &self.store
    }

    /// Rules ordered by start page, then creation time
    pub fn list_rules(&self, include_deleted: bool) -> Result<Vec<CanonicalPageRule>, StoreError> {
        let mut rules: Vec<CanonicalPageRule> = self
            .store
            .list()?
            .into_iter()
            .filter(|r| include_deleted || r.is_active())
            .collect();
        rules.sort_by(|a, b| {
            (a.document_page_start, a.created_at).cmp(&(b.document_page_start, b.created_at))
        });
        Ok(rules)
    }

    /// Get an active rule
    pub fn get_rule(&self, id: &str) -> Result<CanonicalPageRule, StoreError> {
        self.store
            .get(id)?
            .filter(CanonicalPageRule::is_active)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Create a rule from a draft
    ///
    /// Returns the stored rule, or the rule it was joined into.
    pub fn create_rule(&self, draft: RuleDraft) -> Result<CanonicalPageRule, StoreError> {
        let rule = CanonicalPageRule::from_draft(Uuid::new_v4().to_string(), draft, Utc::now());
        rule.validate(self.document_page_count)?;

        let existing = self.store.list()?;
        let conflict = detect_rule_conflicts(
            &existing,
            rule.document_page_start,
            rule.document_page_end,
            None,
        );
        if !conflict.is_empty() {
            tracing::warn!(
                pages = ?conflict.document_pages,
                "rejected rule overlapping existing rules"
            );
            return Err(StoreError::Conflict(conflict));
        }

        self.store.save(&rule)?;
        tracing::info!(
            rule_id = %rule.id,
            rule_type = rule.kind.rule_type_name(),
            start = rule.document_page_start,
            end = rule.document_page_end,
            "created canonical page rule"
        );

        self.settle(rule.id)
    }

    /// Apply a partial update
    pub fn update_rule(&self, update: RuleUpdate) -> Result<CanonicalPageRule, StoreError> {
        let mut rule = self.get_rule(&update.id)?;

        if let Some(start) = update.document_page_start {
            rule.document_page_start = start;
        }
        if let Some(end) = update.document_page_end {
            rule.document_page_end = end;
        }
        if let Some(kind) = update.kind.clone() {
            rule.kind = kind;
        }
        if update.label.is_some() {
            rule.label = update.label.clone();
        }
        rule.validate(self.document_page_count)?;

        if update.changes_range() {
            let existing = self.store.list()?;
            let conflict = detect_rule_conflicts(
                &existing,
                rule.document_page_start,
                rule.document_page_end,
                Some(&rule.id),
            );
            if !conflict.is_empty() {
                return Err(StoreError::Conflict(conflict));
            }
        }

        rule.updated_at = Some(Utc::now());
        self.store.save(&rule)?;
        tracing::info!(rule_id = %rule.id, "updated canonical page rule");

        self.settle(rule.id)
    }

    /// Soft-delete an active rule
    pub fn delete_rule(&self, id: &str) -> Result<(), StoreError> {
        let mut rule = self.get_rule(id)?;
        rule.deleted_at = Some(Utc::now());
        self.store.save(&rule)?;
        tracing::info!(rule_id = %id, "deleted canonical page rule");

        if self.auto_join {
            self.auto_join_contiguous()?;
        }
        Ok(())
    }

    /// Join contiguous rules until no pair qualifies
    pub fn auto_join_contiguous(&self) -> Result<Vec<JoinPlan>, StoreError> {
        let mut applied = Vec::new();

        while let Some(plan) = find_join(&self.store.list()?) {
            let now = Utc::now();

            let mut keep = self.get_rule(&plan.keep_id)?;
            keep.document_page_start = plan.document_page_start;
            keep.document_page_end = plan.document_page_end;
            keep.kind = plan.kind.clone();
            keep.updated_at = Some(now);

            let mut removed = self.get_rule(&plan.remove_id)?;
            removed.deleted_at = Some(now);

            self.store.save(&removed)?;
            self.store.save(&keep)?;

            tracing::info!(
                kept = %plan.keep_id,
                removed = %plan.remove_id,
                start = plan.document_page_start,
                end = plan.document_page_end,
                "joined contiguous rules"
            );
            applied.push(plan);
        }

        Ok(applied)
    }

    /// Run auto-join if enabled and follow `id` to its surviving rule
    fn settle(&self, id: String) -> Result<CanonicalPageRule, StoreError> {
        if !self.auto_join {
            return self.get_rule(&id);
        }

        let mut current = id;
        for plan in self.auto_join_contiguous()? {
            if plan.remove_id == current {
                current = plan.keep_id;
            }
        }
        self.get_rule(&current)
    }
}
