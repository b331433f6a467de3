use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::diag::Finding;

/// Receives finished finding sets. Each publish replaces whatever was
/// published before for the same document.
pub trait FindingSink {
    /// Returns false and keeps the current set when `version` is older than
    /// the one already published.
    fn publish(&mut self, doc: &str, version: i32, findings: Vec<Finding>) -> bool;

    fn clear(&mut self, doc: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub version: i32,
    pub findings: Arc<[Finding]>,
}

/// In-memory sink holding the latest set per document.
#[derive(Debug, Default)]
pub struct FindingStore {
    docs: FxHashMap<String, Published>,
}

impl FindingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, doc: &str) -> Option<&Published> {
        self.docs.get(doc)
    }

    pub fn findings(&self, doc: &str) -> &[Finding] {
        self.docs.get(doc).map(|p| &*p.findings).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

impl FindingSink for FindingStore {
    fn publish(&mut self, doc: &str, version: i32, findings: Vec<Finding>) -> bool {
        if let Some(current) = self.docs.get(doc) {
            if current.version > version {
                return false;
            }
        }
        self.docs.insert(
            doc.to_string(),
            Published {
                version,
                findings: findings.into(),
            },
        );
        true
    }

    fn clear(&mut self, doc: &str) {
        self.docs.remove(doc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze;

    #[test]
    fn publish_replaces_previous_set() {
        let mut store = FindingStore::new();
        assert!(store.publish("a.tess", 1, analyze("let$ x = 1")));
        assert_eq!(store.findings("a.tess").len(), 1);

        assert!(store.publish("a.tess", 2, analyze("let$ x = 1;")));
        assert!(store.findings("a.tess").is_empty());
        assert_eq!(store.get("a.tess").map(|p| p.version), Some(2));
    }

    #[test]
    fn stale_versions_are_dropped() {
        let mut store = FindingStore::new();
        assert!(store.publish("a.tess", 3, Vec::new()));
        assert!(!store.publish("a.tess", 2, analyze("let$ x = 1")));
        assert!(store.findings("a.tess").is_empty());
        assert!(store.publish("a.tess", 3, analyze("let$ x = 1")));
        assert_eq!(store.findings("a.tess").len(), 1);
    }

    #[test]
    fn clear_forgets_document() {
        let mut store = FindingStore::new();
        store.publish("a.tess", 1, analyze("let$ x = 1"));
        store.publish("b.tess", 1, Vec::new());
        store.clear("a.tess");
        assert!(store.get("a.tess").is_none());
        assert_eq!(store.len(), 1);
        store.clear("missing.tess");
        assert_eq!(store.len(), 1);
    }
}
