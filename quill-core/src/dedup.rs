//! Duplicate-generation guard for active records.
//!
//! Hosts fire generation from record-level automations, which can retrigger
//! for the same record within one process lifetime. [`ProcessedSet`] keeps
//! an insertion-ordered list of record keys already handled so repeat calls
//! can be skipped, bounded by a wholesale clear once it grows past capacity.
//!
//! This is duplicate *suppression*, not prevention: the clear can drop a key
//! that was only just admitted, and concurrent callers may interleave around
//! the lock. Callers must not rely on it for correctness, and nothing is
//! persisted across process restarts.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::info;

/// Default number of tracked keys before the set is cleared wholesale.
pub const DEFAULT_CAPACITY: usize = 50;

/// Thread-safe bounded set of already-processed record keys.
pub struct ProcessedSet {
    inner: Arc<Mutex<ProcessedSetInner>>,
}

struct ProcessedSetInner {
    keys: Vec<String>,
    capacity: usize,
    total_admitted: u64,
    total_skipped: u64,
    total_clears: u64,
}

/// Counters describing the set's activity.
#[derive(Debug, Clone)]
pub struct DedupStats {
    /// Current number of tracked keys.
    pub tracked: usize,
    /// Keys admitted for processing.
    pub total_admitted: u64,
    /// Calls skipped because the key was already present.
    pub total_skipped: u64,
    /// Wholesale clears triggered by the capacity bound.
    pub total_clears: u64,
}

impl ProcessedSet {
    /// Create a set that clears itself once it grows past `capacity`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ProcessedSetInner {
                keys: Vec::new(),
                capacity,
                total_admitted: 0,
                total_skipped: 0,
                total_clears: 0,
            })),
        }
    }

    /// Admit a key for processing.
    ///
    /// Returns `false` if the key was already handled in this process
    /// lifetime. On admission, the whole set is cleared once it grows past
    /// capacity, which can drop the key that was just added before it is
    /// ever matched against — an accepted tradeoff of the coarse bound.
    pub fn admit(&self, key: &str) -> bool {
        let mut inner = self.inner.lock();

        if inner.keys.iter().any(|k| k == key) {
            inner.total_skipped += 1;
            return false;
        }

        inner.keys.push(key.to_string());
        inner.total_admitted += 1;

        if inner.keys.len() > inner.capacity {
            info!(tracked = inner.keys.len(), "clearing processed record set");
            inner.keys.clear();
            inner.total_clears += 1;
        }
        true
    }

    /// Current number of tracked keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().keys.len()
    }

    /// Whether no keys are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().keys.is_empty()
    }

    /// Get activity counters.
    #[must_use]
    pub fn stats(&self) -> DedupStats {
        let inner = self.inner.lock();
        DedupStats {
            tracked: inner.keys.len(),
            total_admitted: inner.total_admitted,
            total_skipped: inner.total_skipped,
            total_clears: inner.total_clears,
        }
    }
}

impl Default for ProcessedSet {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl Clone for ProcessedSet {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
