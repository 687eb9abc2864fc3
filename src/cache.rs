use std::collections::HashSet;

use crate::playlist::PlaylistEntry;

/// Remembers which stream URLs were already handed to the prober during a run.
///
/// Keys are the URLs verbatim and are never removed. Entries without a URL
/// are never cached and never match.
#[derive(Debug, Default)]
pub struct DedupCache {
    seen: HashSet<String>,
}

impl DedupCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, entry: &PlaylistEntry) -> bool {
        entry.has_url() && self.seen.contains(&entry.url)
    }

    pub fn insert(&mut self, entry: &PlaylistEntry) {
        if entry.has_url() && !self.seen.contains(&entry.url) {
            self.seen.insert(entry.url.clone());
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_url_is_a_hit_regardless_of_attributes() {
        let mut cache = DedupCache::new();
        let first = PlaylistEntry::new("http://a/1.ts").with_name("One");
        let second = PlaylistEntry::new("http://a/1.ts")
            .with_name("Uno")
            .with_attribute("group-title", "Other");

        assert!(!cache.contains(&first));
        cache.insert(&first);
        assert!(cache.contains(&second));
        assert!(!cache.contains(&PlaylistEntry::new("http://a/2.ts")));
    }

    #[test]
    fn insert_is_idempotent() {
        let mut cache = DedupCache::new();
        let entry = PlaylistEntry::new("http://a/1.ts");
        cache.insert(&entry);
        cache.insert(&entry);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn empty_url_never_cached() {
        let mut cache = DedupCache::new();
        let entry = PlaylistEntry::default();
        cache.insert(&entry);
        assert!(cache.is_empty());
        assert!(!cache.contains(&entry));
    }
}
