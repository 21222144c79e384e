//! Configuration for [`Memoized`](super::Memoized) caches.

use std::fmt;

/// Upper bound on the number of shards a cache may be split into.
pub const MAX_SHARDS: usize = 1 << 16;

/// How concurrent callers that miss on the same key are coordinated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ComputePolicy {
    /// One caller computes, every other caller for the same key blocks until
    /// the computation settles. The inner callable runs at most once per key
    /// at any time.
    #[default]
    ComputeOnce,

    /// Racing callers compute independently without blocking. The first
    /// result stored wins; later results for the same key are discarded and
    /// their callers return the stored value. The inner callable may run
    /// more than once per key, so it must tolerate duplicate side effects.
    Racing,
}

impl fmt::Display for ComputePolicy {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ComputeOnce => formatter.write_str("compute_once"),
            Self::Racing => formatter.write_str("racing"),
        }
    }
}

/// Tuning knobs for a [`Memoized`](super::Memoized) cache.
///
/// The cache is always unbounded; these settings only affect how the key
/// space is partitioned and how racing callers are coordinated.
///
/// # Examples
///
/// ```rust
/// use recallable::memoize::{ComputePolicy, MemoizeConfig};
///
/// let config = MemoizeConfig::new()
///     .with_shards(10)
///     .with_capacity(1024)
///     .with_policy(ComputePolicy::Racing);
///
/// assert_eq!(config.shards(), 16);
/// assert_eq!(config.capacity(), 1024);
/// assert_eq!(config.policy(), ComputePolicy::Racing);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MemoizeConfig {
    shards: usize,
    capacity: usize,
    policy: ComputePolicy,
}

impl MemoizeConfig {
    /// Creates the default configuration: `ComputeOnce`, no preallocation,
    /// and four shards per available CPU.
    pub fn new() -> Self {
        Self {
            shards: default_shards(),
            capacity: 0,
            policy: ComputePolicy::ComputeOnce,
        }
    }

    /// Sets the number of shards. Rounded up to a power of two and clamped
    /// to `1..=MAX_SHARDS`.
    #[must_use]
    pub fn with_shards(mut self, shards: usize) -> Self {
        self.shards = normalize_shards(shards);
        self
    }

    /// Sets the number of entries to preallocate, spread across all shards.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the policy for concurrent misses on the same key.
    #[must_use]
    pub const fn with_policy(mut self, policy: ComputePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The normalized shard count.
    pub fn shards(&self) -> usize {
        normalize_shards(self.shards)
    }

    /// The number of entries to preallocate.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// The policy for concurrent misses on the same key.
    pub const fn policy(&self) -> ComputePolicy {
        self.policy
    }

    /// The number of entries to preallocate per shard.
    pub(crate) fn capacity_per_shard(&self) -> usize {
        self.capacity.div_ceil(self.shards())
    }
}

impl Default for MemoizeConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn default_shards() -> usize {
    normalize_shards(num_cpus::get().saturating_mul(4))
}

fn normalize_shards(shards: usize) -> usize {
    shards.clamp(1, MAX_SHARDS).next_power_of_two()
}
