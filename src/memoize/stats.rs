//! Cache counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// A point-in-time snapshot of a cache's counters.
///
/// Every call is counted once, by its final outcome: a hit, a miss (the
/// call ran the inner callable, successfully or not), or a wait that
/// received another caller's result. A waiter whose computation was
/// abandoned and that then computed the key itself counts as a miss only.
///
/// Counters are updated with relaxed atomics, so a snapshot taken while
/// other threads are calling the cache is approximate.
///
/// # Examples
///
/// ```rust
/// use recallable::callable::{CallableExt, total};
///
/// let square = total(|x: u64| x * x).memoize();
/// square.apply((3,));
/// square.apply((3,));
///
/// let stats = square.stats();
/// assert_eq!(stats.misses, 1);
/// assert_eq!(stats.hits, 1);
/// assert!((stats.hit_ratio() - 0.5).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CacheStats {
    /// Calls answered from the cache without computing or waiting.
    pub hits: u64,
    /// Calls that ran the inner callable.
    pub misses: u64,
    /// Calls that joined a computation already in flight and received its
    /// result. While a call is blocked it is already counted here.
    pub waits: u64,
    /// Computations that failed or panicked and left their key absent.
    pub failures: u64,
    /// Racing computations whose result lost to an earlier stored one.
    pub discarded: u64,
}

impl CacheStats {
    /// Total number of calls observed.
    pub const fn lookups(&self) -> u64 {
        self.hits + self.misses + self.waits
    }

    /// Fraction of lookups answered straight from the cache, `0.0` when
    /// nothing has been looked up yet.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_ratio(&self) -> f64 {
        match self.lookups() {
            0 => 0.0,
            lookups => self.hits as f64 / lookups as f64,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    waits: AtomicU64,
    failures: AtomicU64,
    discarded: AtomicU64,
}

impl StatsRecorder {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_wait(&self) {
        self.waits.fetch_add(1, Ordering::Relaxed);
    }

    /// Withdraws a wait whose computation was abandoned; the call is counted
    /// again by whatever it does next.
    pub(crate) fn retract_wait(&self) {
        self.waits.fetch_sub(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_discard(&self) {
        self.discarded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            waits: self.waits.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
        }
    }
}
