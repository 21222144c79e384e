//! The [`Memoized`] wrapper.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use super::config::{ComputePolicy, MemoizeConfig};
use super::hasher::DefaultBuildHasher;
use super::slot::{InFlight, Settled, Slot};
use super::stats::{CacheStats, StatsRecorder};
use crate::callable::Callable;

type Shard<Args, R, S> = RwLock<HashMap<Args, Slot<R>, S>>;

/// A callable whose successful results are cached by argument tuple.
///
/// Created by [`memoize`](super::memoize),
/// [`memoize_with`](super::memoize_with) or
/// [`CallableExt::memoize`](crate::callable::CallableExt::memoize).
///
/// `Memoized` implements [`Callable`] for the same argument tuple as the
/// callable it wraps. Cloning it is cheap and every clone shares the same
/// cache, which is how a memoized callable is handed to several threads.
///
/// # Behavior
///
/// - A cached key is answered without invoking the inner callable.
/// - Under [`ComputePolicy::ComputeOnce`] (the default) concurrent callers
///   that miss on the same key wait for a single computation. Callers with
///   different keys never wait on each other.
/// - Failures are never cached: the error goes to the caller that computed
///   it, the key stays absent, and any waiters race for the key again.
///   A panic in the inner callable is treated the same way before it
///   continues to unwind.
/// - Memoizing a callable that is already memoized adds a layer that does
///   no caching of its own.
///
/// # Preconditions
///
/// The inner callable must be referentially transparent: equal arguments
/// must produce equal results. Otherwise callers observe whatever the first
/// successful call returned.
///
/// # Resource Use
///
/// The cache is unbounded and nothing is ever evicted. Memory grows with
/// the number of distinct argument tuples seen over the cache's lifetime,
/// which amounts to a leak in a long-running service with high key
/// cardinality.
///
/// # Examples
///
/// ```rust
/// use recallable::callable::Callable;
/// use recallable::memoize::memoize;
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// let calls = AtomicUsize::new(0);
/// let square = memoize(|x: u64| -> Result<u64, String> {
///     calls.fetch_add(1, Ordering::SeqCst);
///     Ok(x * x)
/// });
///
/// assert_eq!(square.invoke((4,)), Ok(16));
/// assert_eq!(square.invoke((4,)), Ok(16));
/// assert_eq!(calls.load(Ordering::SeqCst), 1);
/// assert!(square.contains_key(&(4,)));
/// ```
pub struct Memoized<C, Args, S = DefaultBuildHasher>
where
    C: Callable<Args>,
{
    shared: Arc<Shared<C, Args, S>>,
}

struct Shared<C, Args, S>
where
    C: Callable<Args>,
{
    callable: C,
    shards: Box<[Shard<Args, C::Output, S>]>,
    hasher: S,
    config: MemoizeConfig,
    stats: StatsRecorder,
    passthrough: bool,
}

enum Claim<R> {
    Hit(R),
    Join(Arc<InFlight<R>>),
    Own(Arc<InFlight<R>>),
}

impl<C, Args> Memoized<C, Args>
where
    C: Callable<Args>,
    Args: Hash + Eq + Clone,
    C::Output: Clone,
{
    /// Memoizes `callable` with the default configuration.
    pub fn new(callable: C) -> Self {
        Self::with_config(callable, MemoizeConfig::default())
    }

    /// Memoizes `callable` with `config`.
    pub fn with_config(callable: C, config: MemoizeConfig) -> Self {
        Self::with_hasher(callable, config, DefaultBuildHasher::default())
    }
}

impl<C, Args, S> Memoized<C, Args, S>
where
    C: Callable<Args>,
    Args: Hash + Eq + Clone,
    C::Output: Clone,
    S: BuildHasher + Clone,
{
    /// Memoizes `callable` with `config`, hashing keys with `hasher`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use recallable::callable::{CallableExt, total};
    /// use recallable::memoize::{MemoizeConfig, Memoized};
    /// use std::hash::RandomState;
    ///
    /// let length = Memoized::with_hasher(
    ///     total(|text: String| text.len()),
    ///     MemoizeConfig::new().with_shards(2),
    ///     RandomState::new(),
    /// );
    /// assert_eq!(length.apply(("hello".to_string(),)), 5);
    /// ```
    pub fn with_hasher(callable: C, config: MemoizeConfig, hasher: S) -> Self {
        let passthrough = callable.is_memoized();
        let config = if passthrough {
            debug!("callable is already memoized; adding a pass-through layer");
            config.with_shards(1).with_capacity(0)
        } else {
            config
        };

        let capacity = config.capacity_per_shard();
        let shards = (0..config.shards())
            .map(|_| RwLock::new(HashMap::with_capacity_and_hasher(capacity, hasher.clone())))
            .collect();

        Self {
            shared: Arc::new(Shared {
                callable,
                shards,
                hasher,
                config,
                stats: StatsRecorder::default(),
                passthrough,
            }),
        }
    }

    /// The number of cached results.
    pub fn len(&self) -> usize {
        self.shared
            .shards
            .iter()
            .map(|shard| {
                shard
                    .read()
                    .values()
                    .filter(|slot| matches!(slot, Slot::Cached(_)))
                    .count()
            })
            .sum()
    }

    /// Returns `true` if no result has been cached yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if a result for `arguments` is cached.
    pub fn contains_key(&self, arguments: &Args) -> bool {
        matches!(self.shared.shard_for(arguments).read().get(arguments), Some(Slot::Cached(_)))
    }

    /// Returns the cached result for `arguments` without computing it.
    pub fn cached(&self, arguments: &Args) -> Option<C::Output> {
        match self.shared.shard_for(arguments).read().get(arguments) {
            Some(Slot::Cached(value)) => Some(value.clone()),
            _ => None,
        }
    }

    /// A snapshot of this cache's counters, shared by all clones.
    pub fn stats(&self) -> CacheStats {
        self.shared.stats.snapshot()
    }

    /// The configuration this cache runs with.
    ///
    /// A pass-through layer over an already memoized callable stores
    /// nothing, so it reports one shard and no preallocation whatever it was
    /// built with.
    pub fn config(&self) -> &MemoizeConfig {
        &self.shared.config
    }

    /// The wrapped callable.
    pub fn inner(&self) -> &C {
        &self.shared.callable
    }

    /// Returns the wrapped callable if this is the last handle to the cache.
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged while other clones are alive.
    pub fn try_into_inner(self) -> Result<C, Self> {
        Arc::try_unwrap(self.shared)
            .map(|shared| shared.callable)
            .map_err(|shared| Self { shared })
    }
}

impl<C, Args, S> Shared<C, Args, S>
where
    C: Callable<Args>,
    Args: Hash + Eq + Clone,
    C::Output: Clone,
    S: BuildHasher + Clone,
{
    fn shard_index(&self, key: &Args) -> usize {
        shard_for_hash(self.hasher.hash_one(key), self.shards.len())
    }

    fn shard_for(&self, key: &Args) -> &Shard<Args, C::Output, S> {
        &self.shards[self.shard_index(key)]
    }

    fn compute_once(&self, key: Args) -> Result<C::Output, C::Error> {
        let index = self.shard_index(&key);
        let shard = &self.shards[index];

        loop {
            let claim = Self::lookup(shard, &key).unwrap_or_else(|| Self::claim(shard, &key));

            match claim {
                Claim::Hit(value) => {
                    self.stats.record_hit();
                    trace!(shard = index, "memoized cache hit");
                    return Ok(value);
                }
                Claim::Own(in_flight) => return self.compute_as_owner(index, key, in_flight),
                Claim::Join(in_flight) => {
                    self.stats.record_wait();
                    trace!(shard = index, "waiting on in-flight computation");
                    match in_flight.wait() {
                        Settled::Finished(value) => return Ok(value),
                        Settled::Abandoned => {
                            self.stats.retract_wait();
                            debug!(shard = index, "in-flight computation abandoned; racing again");
                        }
                    }
                }
            }
        }
    }

    fn lookup(shard: &Shard<Args, C::Output, S>, key: &Args) -> Option<Claim<C::Output>> {
        match shard.read().get(key) {
            Some(Slot::Cached(value)) => Some(Claim::Hit(value.clone())),
            Some(Slot::Computing(in_flight)) => Some(Claim::Join(Arc::clone(in_flight))),
            None => None,
        }
    }

    fn claim(shard: &Shard<Args, C::Output, S>, key: &Args) -> Claim<C::Output> {
        let mut map = shard.write();
        match map.entry(key.clone()) {
            Entry::Occupied(occupied) => match occupied.get() {
                Slot::Cached(value) => Claim::Hit(value.clone()),
                Slot::Computing(in_flight) => Claim::Join(Arc::clone(in_flight)),
            },
            Entry::Vacant(vacant) => {
                let in_flight = Arc::new(InFlight::new());
                vacant.insert(Slot::Computing(Arc::clone(&in_flight)));
                Claim::Own(in_flight)
            }
        }
    }

    fn compute_as_owner(
        &self,
        index: usize,
        key: Args,
        in_flight: Arc<InFlight<C::Output>>,
    ) -> Result<C::Output, C::Error> {
        self.stats.record_miss();
        debug!(shard = index, policy = %ComputePolicy::ComputeOnce, "computing memoized value");

        let guard = OwnerGuard {
            shard: &self.shards[index],
            key: Some(key.clone()),
            in_flight,
            stats: &self.stats,
        };

        match self.callable.invoke(key) {
            Ok(value) => {
                guard.complete(value.clone());
                Ok(value)
            }
            Err(error) => {
                debug!(shard = index, "memoized computation failed; key left absent");
                drop(guard);
                Err(error)
            }
        }
    }

    fn race(&self, key: Args) -> Result<C::Output, C::Error> {
        let index = self.shard_index(&key);
        let shard = &self.shards[index];

        let cached = match shard.read().get(&key) {
            Some(Slot::Cached(value)) => Some(value.clone()),
            _ => None,
        };
        if let Some(value) = cached {
            self.stats.record_hit();
            trace!(shard = index, "memoized cache hit");
            return Ok(value);
        }

        self.stats.record_miss();
        debug!(shard = index, policy = %ComputePolicy::Racing, "computing memoized value");

        let stored_key = key.clone();
        let value = match self.callable.invoke(key) {
            Ok(value) => value,
            Err(error) => {
                self.stats.record_failure();
                debug!(shard = index, "memoized computation failed; key left absent");
                return Err(error);
            }
        };

        let mut map = shard.write();
        match map.entry(stored_key) {
            Entry::Occupied(mut occupied) => {
                if let Slot::Cached(existing) = occupied.get() {
                    self.stats.record_discard();
                    debug!(shard = index, "discarding racing result; an earlier one was stored");
                    return Ok(existing.clone());
                }
                occupied.insert(Slot::Cached(value.clone()));
                Ok(value)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(Slot::Cached(value.clone()));
                Ok(value)
            }
        }
    }
}

/// Picks the shard for `hash` among `shard_count` shards (a power of two).
///
/// The top 7 bits are skipped: each shard's `HashMap` uses the same hasher
/// and builds its control tags from them, so they must stay spread within a
/// shard.
#[allow(clippy::cast_possible_truncation)]
fn shard_for_hash(hash: u64, shard_count: usize) -> usize {
    let shift = u64::BITS - shard_count.trailing_zeros();
    (hash << 7).checked_shr(shift).unwrap_or(0) as usize
}

/// Releases a computing key if its owner fails or unwinds.
struct OwnerGuard<'a, Args, R, S>
where
    Args: Hash + Eq,
    R: Clone,
    S: BuildHasher,
{
    shard: &'a Shard<Args, R, S>,
    key: Option<Args>,
    in_flight: Arc<InFlight<R>>,
    stats: &'a StatsRecorder,
}

impl<Args, R, S> OwnerGuard<'_, Args, R, S>
where
    Args: Hash + Eq,
    R: Clone,
    S: BuildHasher,
{
    fn complete(mut self, value: R) {
        // A panicking clone must still reach `drop` with the key held.
        let cached = value.clone();
        if let Some(key) = self.key.take() {
            self.shard.write().insert(key, Slot::Cached(cached));
        }
        self.in_flight.finish(value);
    }
}

impl<Args, R, S> Drop for OwnerGuard<'_, Args, R, S>
where
    Args: Hash + Eq,
    R: Clone,
    S: BuildHasher,
{
    fn drop(&mut self) {
        let Some(key) = self.key.take() else {
            return;
        };

        self.stats.record_failure();
        {
            let mut map = self.shard.write();
            let owned = matches!(
                map.get(&key),
                Some(Slot::Computing(in_flight)) if Arc::ptr_eq(in_flight, &self.in_flight)
            );
            if owned {
                map.remove(&key);
            }
        }
        self.in_flight.abandon();
    }
}

impl<C, Args, S> Callable<Args> for Memoized<C, Args, S>
where
    C: Callable<Args>,
    Args: Hash + Eq + Clone,
    C::Output: Clone,
    S: BuildHasher + Clone,
{
    type Output = C::Output;
    type Error = C::Error;

    fn invoke(&self, arguments: Args) -> Result<Self::Output, Self::Error> {
        let shared = &*self.shared;
        if shared.passthrough {
            return shared.callable.invoke(arguments);
        }

        match shared.config.policy() {
            ComputePolicy::ComputeOnce => shared.compute_once(arguments),
            ComputePolicy::Racing => shared.race(arguments),
        }
    }

    #[inline]
    fn is_memoized(&self) -> bool {
        true
    }
}

impl<C, Args, S> Clone for Memoized<C, Args, S>
where
    C: Callable<Args>,
{
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<C, Args, S> fmt::Debug for Memoized<C, Args, S>
where
    C: Callable<Args>,
    Args: Hash + Eq + Clone,
    C::Output: Clone,
    S: BuildHasher + Clone,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Memoized")
            .field("policy", &self.shared.config.policy())
            .field("shards", &self.shared.shards.len())
            .field("len", &self.len())
            .field("passthrough", &self.shared.passthrough)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callable::{CallableExt, total};
    use crate::memoize::MAX_SHARDS;
    use rstest::rstest;
    use static_assertions::assert_impl_all;
    use std::sync::atomic::{AtomicUsize, Ordering};

    assert_impl_all!(Memoized<fn(u64) -> Result<u64, String>, (u64,)>: Send, Sync, Clone);

    fn counting_square(
        counter: &Arc<AtomicUsize>,
    ) -> impl Fn(u64) -> Result<u64, String> + use<> {
        let counter = Arc::clone(counter);
        move |x: u64| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(x * x)
        }
    }

    #[rstest]
    #[case(ComputePolicy::ComputeOnce)]
    #[case(ComputePolicy::Racing)]
    fn test_second_call_is_served_from_cache(#[case] policy: ComputePolicy) {
        let counter = Arc::new(AtomicUsize::new(0));
        let square = Memoized::with_config(
            counting_square(&counter),
            MemoizeConfig::new().with_policy(policy),
        );

        assert_eq!(square.invoke((4,)), Ok(16));
        assert_eq!(square.invoke((4,)), Ok(16));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(square.len(), 1);
        assert_eq!(square.cached(&(4,)), Some(16));
        assert_eq!(square.stats().hits, 1);
        assert_eq!(square.stats().misses, 1);
    }

    #[rstest]
    #[case(ComputePolicy::ComputeOnce)]
    #[case(ComputePolicy::Racing)]
    fn test_failures_are_not_cached(#[case] policy: ComputePolicy) {
        let attempts = AtomicUsize::new(0);
        let flaky = Memoized::with_config(
            |x: u32| -> Result<u32, &'static str> {
                if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err("transient")
                } else {
                    Ok(x + 1)
                }
            },
            MemoizeConfig::new().with_policy(policy),
        );

        assert_eq!(flaky.invoke((1,)), Err("transient"));
        assert!(flaky.is_empty());
        assert!(!flaky.contains_key(&(1,)));
        assert_eq!(flaky.invoke((1,)), Ok(2));
        assert_eq!(flaky.invoke((1,)), Ok(2));
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert_eq!(flaky.stats().failures, 1);
    }

    #[rstest]
    fn test_distinct_keys_are_cached_separately() {
        let counter = Arc::new(AtomicUsize::new(0));
        let square = Memoized::new(counting_square(&counter));

        for x in 0..32 {
            assert_eq!(square.invoke((x,)), Ok(x * x));
        }
        for x in 0..32 {
            assert_eq!(square.invoke((x,)), Ok(x * x));
        }

        assert_eq!(counter.load(Ordering::SeqCst), 32);
        assert_eq!(square.len(), 32);
    }

    #[rstest]
    fn test_clones_share_the_cache() {
        let counter = Arc::new(AtomicUsize::new(0));
        let square = Memoized::new(counting_square(&counter));
        let other = square.clone();

        assert_eq!(square.invoke((3,)), Ok(9));
        assert_eq!(other.invoke((3,)), Ok(9));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(other.contains_key(&(3,)));
    }

    #[rstest]
    fn test_memoizing_twice_adds_no_second_cache() {
        let counter = Arc::new(AtomicUsize::new(0));
        let once = Memoized::new(counting_square(&counter));
        let twice = Memoized::new(once.clone());

        assert!(twice.is_memoized());
        assert_eq!(twice.invoke((5,)), Ok(25));
        assert_eq!(twice.invoke((5,)), Ok(25));

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(twice.is_empty());
        assert_eq!(once.len(), 1);
        assert_eq!(twice.config().shards(), 1);
        assert_eq!(twice.config().capacity(), 0);
    }

    #[rstest]
    fn test_single_shard_cache() {
        let square = total(|x: i64| x * x).memoize_with(MemoizeConfig::new().with_shards(1));
        assert_eq!(square.apply((-3,)), 9);
        assert_eq!(square.apply((3,)), 9);
        assert_eq!(square.len(), 2);
    }

    #[rstest]
    fn test_supplier_is_memoized_once() {
        let calls = AtomicUsize::new(0);
        let supplier = Memoized::new(|| -> Result<String, ()> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok("expensive".to_string())
        });

        assert_eq!(supplier.invoke(()), Ok("expensive".to_string()));
        assert_eq!(supplier.invoke(()), Ok("expensive".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[rstest]
    fn test_option_arguments_are_ordinary_keys() {
        let describe = total(|value: Option<u8>| value.map_or(-1, i16::from)).memoize();
        assert_eq!(describe.apply((None,)), -1);
        assert_eq!(describe.apply((Some(4),)), 4);
        assert!(describe.contains_key(&(None,)));
    }

    #[rstest]
    fn test_try_into_inner_requires_last_handle() {
        let square = Memoized::new(total(|x: u8| u16::from(x) * 2));
        let clone = square.clone();

        let square = square.try_into_inner().unwrap_err();
        drop(clone);
        assert!(square.try_into_inner().is_ok());
    }

    #[rstest]
    fn test_debug_reports_policy_and_size() {
        let square = total(|x: u8| x).memoize_with(MemoizeConfig::new().with_shards(2));
        square.apply((1,));
        let rendered = format!("{square:?}");
        assert!(rendered.contains("ComputeOnce"));
        assert!(rendered.contains("len: 1"));
        assert!(rendered.contains("shards: 2"));
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(128)]
    #[case(MAX_SHARDS)]
    fn test_shard_ignores_tag_bits(#[case] shard_count: usize) {
        let tag_mask = 0x7f_u64 << 57;
        for hash in [0, 1, 0x0123_4567_89ab_cdef, u64::MAX >> 7, u64::MAX] {
            let index = shard_for_hash(hash, shard_count);
            assert!(index < shard_count);
            assert_eq!(shard_for_hash(hash ^ tag_mask, shard_count), index);
        }
    }

    #[rstest]
    fn test_shards_are_spread_below_tag_bits() {
        let shard_count = 8;
        let step = 1_u64 << (57 - 3);
        let indices: Vec<usize> = (0..8)
            .map(|slot| shard_for_hash(slot * step, shard_count))
            .collect();
        assert_eq!(indices, (0..8).collect::<Vec<_>>());
    }
}
