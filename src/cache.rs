// asmr-catalog - asmr.one catalog aggregation client
// Copyright (C) 2026 asmr-catalog contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Time-based LRU cache
//!
//! Bounds memory and avoids redundant remote fetches and translation calls.
//! Eviction is purely LRU-by-capacity: every entry carries a recency stamp
//! refreshed on read, and `put` evicts exactly one entry (the stalest) once
//! the capacity is exceeded. There is no TTL expiry.
//!
//! The recency stamp is a monotonic logical clock incremented under the cache
//! mutex rather than wall time, so two accesses in the same clock tick still
//! order deterministically.

use std::collections::HashMap;
use std::sync::Mutex;

/// A cached value together with its recency stamp.
#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    last_access: u64,
}

/// Capacity-bounded cache with recency-refreshing reads.
///
/// All read-then-maybe-write sequences against one instance are serialized
/// under a single mutex, so a reader never observes a half-evicted state and
/// an eviction scan is atomic with respect to concurrent `get`/`put`. The
/// mutex is never held across an await point; values are cloned out.
#[derive(Debug)]
pub struct TimeBasedLruCache<V> {
    capacity: usize,
    inner: Mutex<CacheInner<V>>,
}

#[derive(Debug)]
struct CacheInner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    clock: u64,
}

impl<V: Clone> TimeBasedLruCache<V> {
    /// Create a cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                clock: 0,
            }),
        }
    }

    /// Return a clone of the cached value and refresh its recency, or `None`
    /// on a miss. A miss neither counts as a hit nor triggers eviction.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.clock += 1;
        let now = inner.clock;
        let entry = inner.entries.get_mut(key)?;
        entry.last_access = now;
        Some(entry.value.clone())
    }

    /// Insert or overwrite `key`. If the cache now exceeds its capacity, the
    /// entry with the oldest recency stamp is evicted (ties arbitrary).
    pub fn put(&self, key: impl Into<String>, value: V) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.clock += 1;
        let now = inner.clock;
        inner.entries.insert(
            key.into(),
            CacheEntry {
                value,
                last_access: now,
            },
        );

        if inner.entries.len() > self.capacity {
            let stalest = inner
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_access)
                .map(|(key, _)| key.clone());
            if let Some(key) = stalest {
                tracing::debug!(key = %key, "cache over capacity, evicting");
                inner.entries.remove(&key);
            }
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
