//! Pair-wise common-substring cache
//!
//! Maps `(canonical message-id pair, field name)` to the longest common
//! substrings of that field across the pair. Values are a pure function of
//! the two strings, so concurrent writers racing on one key always store
//! the same value and last-write-wins is safe.

use ahash::AHashMap;
use anyhow::{Context, Result};
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::{Mutex, PoisonError, RwLock};

/// Field name used for subject-line substrings
pub const SUBJECT_FIELD: &str = "Subject";

/// Two message ids in sorted order
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    first: String,
    second: String,
}

impl PairKey {
    pub fn new(a: &str, b: &str) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

/// Storage port for pair-wise substring lists
pub trait PairCache: Send + Sync {
    fn get(&self, key: &PairKey, field: &str) -> Option<Vec<String>>;
    fn set(&self, key: &PairKey, field: &str, substrings: Vec<String>);
}

type CacheKey = (PairKey, String);

/// One record of the persisted cache file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub pair: [String; 2],
    pub field: String,
    pub substrings: Vec<String>,
}

/// Unbounded in-memory cache that can be saved to and loaded from JSON
#[derive(Debug, Default)]
pub struct MemoryPairCache {
    entries: RwLock<AHashMap<CacheKey, Vec<String>>>,
}

impl MemoryPairCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a persisted cache; a missing file gives an empty cache
    pub fn load(path: &Path) -> Result<Self> {
        let cache = Self::new();
        if !path.exists() {
            return Ok(cache);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read cache file {}", path.display()))?;
        let entries: Vec<CacheEntry> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse cache file {}", path.display()))?;

        log::info!("loaded {} cached pairs from {}", entries.len(), path.display());
        for entry in entries {
            let [a, b] = entry.pair;
            cache.set(&PairKey::new(&a, &b), &entry.field, entry.substrings);
        }
        Ok(cache)
    }

    /// Persist every entry, sorted by pair then field
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.entries())
            .context("Failed to serialize cache")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write cache file {}", path.display()))?;
        Ok(())
    }

    pub fn entries(&self) -> Vec<CacheEntry> {
        let map = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut entries: Vec<CacheEntry> = map
            .iter()
            .map(|((key, field), substrings)| CacheEntry {
                pair: [key.first.clone(), key.second.clone()],
                field: field.clone(),
                substrings: substrings.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.pair.cmp(&b.pair).then_with(|| a.field.cmp(&b.field)));
        entries
    }

    /// Distinct pairs with at least one cached field, sorted
    pub fn pairs(&self) -> Vec<PairKey> {
        let map = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut pairs: Vec<PairKey> = map.keys().map(|(key, _)| key.clone()).collect();
        pairs.sort();
        pairs.dedup();
        pairs
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PairCache for MemoryPairCache {
    fn get(&self, key: &PairKey, field: &str) -> Option<Vec<String>> {
        let map = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        map.get(&(key.clone(), field.to_string())).cloned()
    }

    fn set(&self, key: &PairKey, field: &str, substrings: Vec<String>) {
        let mut map = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        map.insert((key.clone(), field.to_string()), substrings);
    }
}

/// Bounded in-memory cache evicting the least recently used pair
pub struct LruPairCache {
    entries: Mutex<LruCache<CacheKey, Vec<String>>>,
}

impl LruPairCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PairCache for LruPairCache {
    fn get(&self, key: &PairKey, field: &str) -> Option<Vec<String>> {
        let mut cache = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        cache.get(&(key.clone(), field.to_string())).cloned()
    }

    fn set(&self, key: &PairKey, field: &str, substrings: Vec<String>) {
        let mut cache = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        cache.put((key.clone(), field.to_string()), substrings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_key_is_canonical() {
        assert_eq!(PairKey::new("m2", "m1"), PairKey::new("m1", "m2"));
        let key = PairKey::new("b", "a");
        assert_eq!(key.first(), "a");
        assert_eq!(key.second(), "b");
        assert_eq!(key.to_string(), "(a, b)");
    }

    #[test]
    fn test_memory_cache_get_set() {
        let cache = MemoryPairCache::new();
        let key = PairKey::new("m1", "m2");

        assert_eq!(cache.get(&key, SUBJECT_FIELD), None);
        cache.set(&key, SUBJECT_FIELD, vec!["abc".to_string()]);
        assert_eq!(cache.get(&PairKey::new("m2", "m1"), SUBJECT_FIELD), Some(vec!["abc".to_string()]));
        assert_eq!(cache.get(&key, "Body"), None);

        // last write wins
        cache.set(&key, SUBJECT_FIELD, vec!["xyz".to_string()]);
        assert_eq!(cache.get(&key, SUBJECT_FIELD), Some(vec!["xyz".to_string()]));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_pairs_are_deduplicated() {
        let cache = MemoryPairCache::new();
        cache.set(&PairKey::new("b", "c"), SUBJECT_FIELD, vec![]);
        cache.set(&PairKey::new("a", "b"), SUBJECT_FIELD, vec![]);
        cache.set(&PairKey::new("a", "b"), "Body", vec![]);

        assert_eq!(cache.pairs(), vec![PairKey::new("a", "b"), PairKey::new("b", "c")]);
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("subthread-cache-{}.json", std::process::id()));
        let cache = MemoryPairCache::new();
        cache.set(&PairKey::new("m2", "m1"), SUBJECT_FIELD, vec!["Meeting".to_string()]);
        cache.save(&path).unwrap();

        let loaded = MemoryPairCache::load(&path).unwrap();
        assert_eq!(loaded.entries(), cache.entries());
        assert_eq!(loaded.entries()[0].pair, ["m1".to_string(), "m2".to_string()]);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_missing_file() {
        let path = std::env::temp_dir().join("subthread-cache-does-not-exist.json");
        assert!(MemoryPairCache::load(&path).unwrap().is_empty());
    }

    #[test]
    fn test_lru_evicts() {
        let cache = LruPairCache::new(NonZeroUsize::new(2).unwrap());
        cache.set(&PairKey::new("a", "b"), SUBJECT_FIELD, vec!["1".into()]);
        cache.set(&PairKey::new("a", "c"), SUBJECT_FIELD, vec!["2".into()]);
        cache.set(&PairKey::new("a", "d"), SUBJECT_FIELD, vec!["3".into()]);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&PairKey::new("a", "b"), SUBJECT_FIELD), None);
        assert!(cache.get(&PairKey::new("a", "d"), SUBJECT_FIELD).is_some());
    }
}
