use std::collections::HashMap;

/// Records that can live in an [`EntityCache`].
pub trait Keyed {
    type Key: Clone + Eq + std::hash::Hash;

    fn key(&self) -> &Self::Key;
}

/// What one snapshot reconciliation did to the cache.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheDelta<K> {
    pub inserted: Vec<K>,
    pub evicted: Vec<K>,
}

// Derived `Default` would bound `K: Default`, which keys do not carry.
impl<K> Default for CacheDelta<K> {
    fn default() -> Self {
        Self {
            inserted: Vec::new(),
            evicted: Vec::new(),
        }
    }
}

/// Keyed mapping from id to record, kept eventually consistent with the
/// server by insert/evict reconciliation against each polled snapshot.
/// Eviction is strictly snapshot-driven; whether an evicted record is still
/// on screen is the renderer's concern (the active slot renders from
/// `current`, not from cache residency).
#[derive(Clone, Debug)]
pub struct EntityCache<T: Keyed> {
    entries: HashMap<T::Key, T>,
}

impl<T: Keyed> Default for EntityCache<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: Keyed + Clone> EntityCache<T> {
    /// Bring the cache in line with `snapshot`: records with unseen keys are
    /// inserted, cached keys missing from the snapshot are evicted. Records
    /// already cached are refreshed in place (the server's copy wins).
    pub fn reconcile(&mut self, snapshot: &[T]) -> CacheDelta<T::Key> {
        let mut delta = CacheDelta::default();
        for record in snapshot {
            if self
                .entries
                .insert(record.key().clone(), record.clone())
                .is_none()
            {
                delta.inserted.push(record.key().clone());
            }
        }
        let stale: Vec<T::Key> = self
            .entries
            .keys()
            .filter(|key| !snapshot.iter().any(|record| record.key() == *key))
            .cloned()
            .collect();
        for key in stale {
            self.entries.remove(&key);
            delta.evicted.push(key);
        }
        delta
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/state/cache_tests.rs"]
mod tests;
