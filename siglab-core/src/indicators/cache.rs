//! Memoizing indicator cache.
//!
//! Cache key: BLAKE3 content hash of the bar series + the exact (sorted)
//! indicator name list; names encode every parameter, so the key identifies
//! the full (series, parameter-set) pair. Entries are `Arc<IndicatorSet>`,
//! immutable once written. Eviction is bounded-size FIFO.
//!
//! Concurrency: only the map is locked. A concurrent miss on the same key may
//! compute the set twice; computation is pure and idempotent, so the second
//! insert simply wins and the clones are identical.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::domain::Bar;
use crate::error::CoreError;
use crate::indicators::{Indicator, IndicatorSet};

/// Default bound on cached (series, parameter-set) entries.
pub const DEFAULT_CAPACITY: usize = 100;

/// BLAKE3 content identity of a bar series.
pub fn series_hash(bars: &[Bar]) -> String {
    let mut hasher = blake3::Hasher::new();
    for bar in bars {
        hasher.update(&bar.timestamp.and_utc().timestamp().to_le_bytes());
        hasher.update(&bar.open.to_le_bytes());
        hasher.update(&bar.high.to_le_bytes());
        hasher.update(&bar.low.to_le_bytes());
        hasher.update(&bar.close.to_le_bytes());
        hasher.update(&bar.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

#[derive(Debug, Default)]
struct CacheInner {
    map: HashMap<String, Arc<IndicatorSet>>,
    order: VecDeque<String>,
    hits: u64,
    misses: u64,
}

/// Shared, bounded cache of precomputed `IndicatorSet`s.
///
/// Lifecycle: one cache per optimizer run, passed by reference to workers.
/// Embedding callers that keep a process-wide cache use `clear()` between
/// unrelated runs.
#[derive(Debug)]
pub struct IndicatorCache {
    capacity: usize,
    inner: Mutex<CacheInner>,
}

impl IndicatorCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity >= 1, "cache capacity must be >= 1");
        Self {
            capacity,
            inner: Mutex::new(CacheInner::default()),
        }
    }

    /// Compute (or fetch) the indicator set for a bar series.
    ///
    /// Fails with `InsufficientData` when the series cannot produce a single
    /// defined value for the longest-lookback indicator requested.
    pub fn compute(
        &self,
        bars: &[Bar],
        indicators: &[Box<dyn Indicator>],
    ) -> Result<Arc<IndicatorSet>, CoreError> {
        let max_lookback = indicators.iter().map(|ind| ind.lookback()).max().unwrap_or(0);
        let required = max_lookback + 1;
        if bars.len() < required {
            return Err(CoreError::InsufficientData {
                required,
                actual: bars.len(),
            });
        }

        let key = Self::cache_key(bars, indicators);

        {
            let mut inner = self.inner.lock().expect("indicator cache poisoned");
            if let Some(set) = inner.map.get(&key) {
                let set = Arc::clone(set);
                inner.hits += 1;
                return Ok(set);
            }
            inner.misses += 1;
        }

        // Compute outside the lock; duplicate work on a concurrent miss is
        // accepted (pure computation).
        let mut set = IndicatorSet::new();
        for indicator in indicators {
            set.insert(indicator.name().to_string(), indicator.compute(bars));
        }
        let set = Arc::new(set);

        let mut inner = self.inner.lock().expect("indicator cache poisoned");
        if !inner.map.contains_key(&key) {
            inner.order.push_back(key.clone());
            inner.map.insert(key, Arc::clone(&set));
            while inner.order.len() > self.capacity {
                if let Some(evicted) = inner.order.pop_front() {
                    inner.map.remove(&evicted);
                }
            }
        }

        Ok(set)
    }

    fn cache_key(bars: &[Bar], indicators: &[Box<dyn Indicator>]) -> String {
        let mut names: Vec<&str> = indicators.iter().map(|ind| ind.name()).collect();
        names.sort_unstable();
        format!("{}:{}", series_hash(bars), names.join(","))
    }

    pub fn len(&self) -> usize {
        self.inner.lock().expect("indicator cache poisoned").map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cache hits since creation (or the last `clear`).
    pub fn hits(&self) -> u64 {
        self.inner.lock().expect("indicator cache poisoned").hits
    }

    /// Cache misses since creation (or the last `clear`).
    pub fn misses(&self) -> u64 {
        self.inner.lock().expect("indicator cache poisoned").misses
    }

    /// Drop all entries and reset counters.
    pub fn clear(&self) {
        let mut inner = self.inner.lock().expect("indicator cache poisoned");
        *inner = CacheInner::default();
    }
}

impl Default for IndicatorCache {
    fn default() -> Self {
        Self::new()
    }
}
