//! Per-host robots decision cache
//!
//! Decisions are computed lazily on the first URL seen for a host and kept
//! for the life of the process. Each host gets its own `OnceCell`, so
//! concurrent first lookups for the same host share one computation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::OnceCell;

/// Exclusion decision for one host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RobotsDecision {
    Allowed,
    Disallowed,
}

impl RobotsDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Host key → decision slot
#[derive(Debug, Default)]
pub struct DecisionCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<RobotsDecision>>>>,
}

impl DecisionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot for a host, creating an empty one on first use
    pub fn slot(&self, host_key: &str) -> Arc<OnceCell<RobotsDecision>> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(
            entries
                .entry(host_key.to_string())
                .or_insert_with(|| Arc::new(OnceCell::new())),
        )
    }

    /// The cached decision for a host, if one has been computed
    pub fn get(&self, host_key: &str) -> Option<RobotsDecision> {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.get(host_key).and_then(|cell| cell.get().copied())
    }

    /// Number of hosts with a computed decision
    pub fn len(&self) -> usize {
        let entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        entries.values().filter(|cell| cell.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cache() {
        let cache = DecisionCache::new();
        assert!(cache.is_empty());
        assert_eq!(cache.get("https://example.com"), None);
    }

    #[test]
    fn test_same_slot_per_host() {
        let cache = DecisionCache::new();
        let a = cache.slot("https://example.com");
        let b = cache.slot("https://example.com");
        assert!(Arc::ptr_eq(&a, &b));

        let other = cache.slot("http://example.com");
        assert!(!Arc::ptr_eq(&a, &other));
    }

    #[test]
    fn test_uninitialized_slot_not_counted() {
        let cache = DecisionCache::new();
        let _slot = cache.slot("https://example.com");
        assert!(cache.is_empty());
        assert_eq!(cache.get("https://example.com"), None);
    }

    #[test]
    fn test_decision_visible_after_set() {
        let cache = DecisionCache::new();
        cache
            .slot("https://example.com")
            .set(RobotsDecision::Disallowed)
            .unwrap();
        assert_eq!(
            cache.get("https://example.com"),
            Some(RobotsDecision::Disallowed)
        );
        assert_eq!(cache.len(), 1);
    }
}
