use std::collections::HashMap;

use crate::model::{ClanRecord, PlayerRecord};

/// Normalizes a username or clan name into a cache key.
///
/// Surrounding whitespace is dropped; case is kept, so "Alice" and "alice"
/// are distinct entries.
pub fn lookup_key(raw: &str) -> String {
    raw.trim().to_string()
}

/// Session-lifetime record cache. Last write wins; nothing expires or is evicted.
#[derive(Debug, Clone)]
pub struct ResultCache<T> {
    entries: HashMap<String, T>,
}

impl<T> Default for ResultCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ResultCache<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(&lookup_key(key))
    }

    pub fn set(&mut self, key: &str, value: T) {
        self.entries.insert(lookup_key(key), value);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(&lookup_key(key))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionCache {
    pub players: ResultCache<PlayerRecord>,
    pub clans: ResultCache<ClanRecord>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let mut cache = ResultCache::new();
        cache.set("Alice", 1);
        cache.set("Alice", 2);
        assert_eq!(cache.get("Alice"), Some(&2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn keys_are_trimmed_but_case_sensitive() {
        let mut cache = ResultCache::new();
        cache.set("  Alice ", "a");
        assert!(cache.contains("Alice"));
        assert_eq!(cache.get("alice"), None);
    }

    #[test]
    fn clear_empties_the_cache() {
        let mut cache = ResultCache::new();
        cache.set("x", ());
        cache.clear();
        assert!(cache.is_empty());
    }
}
