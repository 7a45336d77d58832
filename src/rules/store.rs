//! Rule storage backends
//!
//! In-memory and JSON-file stores behind one trait. Stores are plain
//! keyed storage; validation, conflict checks and joining live in
//! [`super::RuleService`].

use super::conflict::RuleConflict;
use super::types::CanonicalPageRule;
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Current on-disk format version
const STORE_VERSION: u32 = 1;

/// Store error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Rule not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(RuleConflict),
    #[error("Invalid rule: {0}")]
    Invalid(#[from] ValidationError),
    #[error("Unsupported store version: {0}")]
    UnsupportedVersion(u32),
    #[error("Storage error: {0}")]
    Storage(String),
}

fn lock_error(e: impl std::fmt::Display) -> StoreError {
    StoreError::Storage(format!("Lock error: {}", e))
}

/// Rule store trait for different storage backends
pub trait RuleStore: Send + Sync {
    /// Insert or replace a rule
    fn save(&self, rule: &CanonicalPageRule) -> Result<(), StoreError>;
    /// Get a rule by ID, deleted or not
    fn get(&self, id: &str) -> Result<Option<CanonicalPageRule>, StoreError>;
    /// List all rules including soft-deleted ones
    fn list(&self) -> Result<Vec<CanonicalPageRule>, StoreError>;
    /// Remove a rule permanently
    fn remove(&self, id: &str) -> Result<(), StoreError>;
    /// Persist pending changes
    fn flush(&self) -> Result<(), StoreError>;
}

// ============================================================
// Memory Store
// ============================================================

/// Volatile store
#[derive(Debug, Default)]
pub struct MemoryRuleStore {
    rules: RwLock<HashMap<String, CanonicalPageRule>>,
}

impl MemoryRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing rules
    pub fn with_rules(rules: impl IntoIterator<Item = CanonicalPageRule>) -> Self {
        let rules = rules.into_iter().map(|r| (r.id.clone(), r)).collect();
        Self {
            rules: RwLock::new(rules),
        }
    }
}

impl RuleStore for MemoryRuleStore {
    fn save(&self, rule: &CanonicalPageRule) -> Result<(), StoreError> {
        let mut rules = self.rules.write().map_err(lock_error)?;
        rules.insert(rule.id.clone(), rule.clone());
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<CanonicalPageRule>, StoreError> {
        let rules = self.rules.read().map_err(lock_error)?;
        Ok(rules.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<CanonicalPageRule>, StoreError> {
        let rules = self.rules.read().map_err(lock_error)?;
        Ok(rules.values().cloned().collect())
    }

    fn remove(&self, id: &str) -> Result<(), StoreError> {
        let mut rules = self.rules.write().map_err(lock_error)?;
        rules.remove(id);
        Ok(())
    }

    fn flush(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

// ============================================================
// JSON Store
// ============================================================

/// Stored rules data structure
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredRules {
    version: u32,
    rules: Vec<CanonicalPageRule>,
}

/// JSON file-based rule store
///
/// Changes are cached until [`RuleStore::flush`] is called.
pub struct JsonRuleStore {
    path: PathBuf,
    cache: RwLock<HashMap<String, CanonicalPageRule>>,
    dirty: RwLock<bool>,
}

impl JsonRuleStore {
    /// Open a store, loading the file when it exists
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let store = Self {
            path,
            cache: RwLock::new(HashMap::new()),
            dirty: RwLock::new(false),
        };
        store.load()?;

        Ok(store)
    }

    /// Reload rules from file, discarding unsaved changes
    pub fn load(&self) -> Result<(), StoreError> {
        if !self.path.exists() {
            return Ok(());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let stored: StoredRules = serde_json::from_str(&content)?;
        if stored.version != STORE_VERSION {
            return Err(StoreError::UnsupportedVersion(stored.version));
        }

        let mut cache = self.cache.write().map_err(lock_error)?;
        *cache = stored
            .rules
            .into_iter()
            .map(|r| (r.id.clone(), r))
            .collect();

        tracing::debug!(path = %self.path.display(), rules = cache.len(), "loaded rule store");
        Ok(())
    }

    /// Check if there are unsaved changes
    pub fn is_dirty(&self) -> bool {
        *self.dirty.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored rules, deleted ones included
    pub fn len(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn mark_dirty(&self, value: bool) -> Result<(), StoreError> {
        let mut dirty = self.dirty.write().map_err(lock_error)?;
        *dirty = value;
        Ok(())
    }
}

impl RuleStore for JsonRuleStore {
    fn save(&self, rule: &CanonicalPageRule) -> Result<(), StoreError> {
        let mut cache = self.cache.write().map_err(lock_error)?;
        cache.insert(rule.id.clone(), rule.clone());
        self.mark_dirty(true)
    }

    fn get(&self, id: &str) -> Result<Option<CanonicalPageRule>, StoreError> {
        let cache = self.cache.read().map_err(lock_error)?;
        Ok(cache.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<CanonicalPageRule>, StoreError> {
        let cache = self.cache.read().map_err(lock_error)?;
        Ok(cache.values().cloned().collect())
    }

    fn remove(&self, id: &str) -> Result<(), StoreError> {
        let mut cache = self.cache.write().map_err(lock_error)?;
        if cache.remove(id).is_some() {
            self.mark_dirty(true)?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), StoreError> {
        let cache = self.cache.read().map_err(lock_error)?;

        let mut rules: Vec<CanonicalPageRule> = cache.values().cloned().collect();
        rules.sort_by(|a, b| {
            (a.document_page_start, &a.id).cmp(&(b.document_page_start, &b.id))
        });

        let stored = StoredRules {
            version: STORE_VERSION,
            rules,
        };
        let content = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&self.path, content)?;

        self.mark_dirty(false)
    }
}
