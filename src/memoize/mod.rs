//! Thread-safe memoization for callables of any arity.
//!
//! [`memoize`] wraps a [`Callable`] in a [`Memoized`] cache keyed by the
//! argument tuple. The wrapped callable keeps the exact call signature of
//! the original.
//!
//! # Per-key State Machine
//!
//! ```text
//!  Absent ──first caller claims──▶ Computing ──success──▶ Cached
//!    ▲                                 │
//!    └──────── failure or panic ───────┘
//! ```
//!
//! There is no failed state: a failing computation leaves its key absent so
//! the next call retries it.
//!
//! # Concurrency
//!
//! The key space is split into shards, each a `parking_lot::RwLock` around a
//! `HashMap`. Shard locks are held only to look up or insert an entry, never
//! while the inner callable runs. Waiting for an in-flight computation uses a
//! per-key mutex and condition variable, so two calls with different keys
//! never block each other.
//!
//! Two policies are available through [`MemoizeConfig::with_policy`]:
//!
//! - [`ComputePolicy::ComputeOnce`] (default): the first caller computes and
//!   concurrent callers for the same key block until it settles. If it fails
//!   the waiters race again; they never inherit the failure.
//! - [`ComputePolicy::Racing`]: nobody blocks. Racing callers may compute the
//!   same key concurrently and the first stored result wins.
//!
//! Every operation is synchronous; no background work is spawned.
//!
//! # Keys and Values
//!
//! Keys must be `Hash + Eq + Clone`, values `Clone`. Rust has no null, so
//! there is nothing to reject: `Option` components are ordinary key values
//! and `None` results are cached like any other.
//!
//! # Examples
//!
//! ```rust
//! use recallable::callable::{Callable, CallableExt, total};
//! use recallable::memoize::memoize;
//! use std::thread;
//!
//! let square = memoize(total(|x: u64| x * x));
//!
//! let handles: Vec<_> = (0..8)
//!     .map(|_| {
//!         let square = square.clone();
//!         thread::spawn(move || square.apply((4,)))
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     assert_eq!(handle.join().unwrap(), 16);
//! }
//! assert_eq!(square.stats().misses, 1);
//! ```

mod cache;
mod config;
mod hasher;
mod slot;
mod stats;

use std::hash::Hash;

use crate::callable::Callable;

pub use cache::Memoized;
pub use config::{ComputePolicy, MAX_SHARDS, MemoizeConfig};
pub use hasher::DefaultBuildHasher;
pub use stats::CacheStats;

/// Wraps `callable` in an unbounded, thread-safe cache keyed by its
/// argument tuple.
///
/// If `callable` is already memoized the result is a pass-through layer,
/// so results are never cached twice.
///
/// See [`Memoized`] for the full contract.
///
/// # Examples
///
/// ```rust
/// use recallable::callable::Callable;
/// use recallable::memoize::memoize;
///
/// let distance = memoize(|x: i64, y: i64| -> Result<i64, String> {
///     x.checked_sub(y).map(i64::abs).ok_or_else(|| "overflow".to_string())
/// });
///
/// assert_eq!(distance.invoke((3, 10)), Ok(7));
/// assert!(memoize(distance).is_memoized());
/// ```
pub fn memoize<C, Args>(callable: C) -> Memoized<C, Args>
where
    C: Callable<Args>,
    Args: Hash + Eq + Clone,
    C::Output: Clone,
{
    Memoized::new(callable)
}

/// Wraps `callable` in a cache built from `config`.
///
/// # Examples
///
/// ```rust
/// use recallable::callable::{CallableExt, total};
/// use recallable::memoize::{ComputePolicy, MemoizeConfig, memoize_with};
///
/// let config = MemoizeConfig::new().with_policy(ComputePolicy::Racing);
/// let square = memoize_with(total(|x: i32| x * x), config);
///
/// assert_eq!(square.apply((12,)), 144);
/// assert_eq!(square.config().policy(), ComputePolicy::Racing);
/// ```
pub fn memoize_with<C, Args>(callable: C, config: MemoizeConfig) -> Memoized<C, Args>
where
    C: Callable<Args>,
    Args: Hash + Eq + Clone,
    C::Output: Clone,
{
    Memoized::with_config(callable, config)
}
