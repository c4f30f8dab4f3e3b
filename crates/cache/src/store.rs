//! Bounded cache entry store.
//!
//! Holds at most one entry per key. Writes replace the previous entry for the
//! key; once the store is full, the least recently used entry is evicted to
//! make room. Stale entries are not removed on their own, they are superseded
//! by the next successful write or pushed out by LRU pressure.

use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use lru::LruCache;

use crate::key::CacheKey;

/// A value together with the time it was written.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheEntry<V> {
    pub key: CacheKey,
    pub value: V,
    pub stored_at: DateTime<Utc>,
}

/// Thread-safe LRU map from [`CacheKey`] to [`CacheEntry`].
///
/// The mutex is only held for the duration of a single lookup or write and
/// never across an `.await`.
pub struct EntryStore<V> {
    entries: Mutex<LruCache<CacheKey, CacheEntry<V>>>,
}

impl<V: Clone> EntryStore<V> {
    /// Create a store holding at most `capacity` entries.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Create a store from a plain size; zero is clamped to one.
    pub fn with_capacity(max_entries: usize) -> Self {
        Self::new(NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN))
    }

    /// Lock the entries mutex, recovering from poison if necessary.
    ///
    /// A poisoned lock can at worst hold an entry that is about to be
    /// overwritten anyway.
    fn lock_entries(&self) -> MutexGuard<'_, LruCache<CacheKey, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("Cache store mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Look up the entry for `key`, marking it as recently used.
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry<V>> {
        self.lock_entries().get(key).cloned()
    }

    /// Look up the entry for `key` without touching its recency.
    pub fn peek(&self, key: &CacheKey) -> Option<CacheEntry<V>> {
        self.lock_entries().peek(key).cloned()
    }

    /// Write `value` for `key`, replacing any previous entry.
    pub fn put(&self, key: CacheKey, value: V, now: DateTime<Utc>) {
        let entry = CacheEntry {
            key: key.clone(),
            value,
            stored_at: now,
        };

        let displaced = self.lock_entries().push(key.clone(), entry);

        if let Some((evicted_key, _)) = displaced {
            if evicted_key != key {
                debug!("Cache store full, evicted '{}'", evicted_key);
            }
        }
    }

    /// Remove the entry for `key`. Returns true if one existed.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        self.lock_entries().pop(key).is_some()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.lock_entries().clear();
    }

    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock_entries().cap().get()
    }
}
