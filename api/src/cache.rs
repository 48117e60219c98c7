//! TTL cache
//!
//! Process-wide memoization for aggregate results. Entries expire lazily:
//! a read past the TTL removes the entry, so memory stays bounded without
//! a background sweeper. Writes replace the whole value; concurrent
//! writers to the same key may duplicate work but cannot corrupt it.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// How long an aggregate result stays servable.
pub const CACHE_TTL: Duration = Duration::from_secs(300);

struct Entry<V> {
    stored_at: Instant,
    value: V,
}

/// Key -> (timestamp, value) store with lazy expiry on read.
///
/// Owned by the aggregator and injected at construction, so tests can build
/// a fresh instance (with a short TTL) per case.
pub struct TtlCache<V> {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the stored value if it is still fresh; a stale entry is
    /// removed and reported as absent.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() <= self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store `value` under `key`, unconditionally overwriting any prior
    /// entry.
    pub fn set(&self, key: &str, value: V) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key.to_string(),
            Entry {
                stored_at: Instant::now(),
                value,
            },
        );
    }

    /// Raw presence check that bypasses expiry, for asserting lazy removal.
    #[cfg(test)]
    pub(crate) fn contains_raw(&self, key: &str) -> bool {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.contains_key(key)
    }
}
