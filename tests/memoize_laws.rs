#![cfg(feature = "memoize")]
//! Property-based tests for the laws of `Memoized`.

use proptest::prelude::*;
use recallable::callable::{Callable, CallableExt, total};
use recallable::memoize::{ComputePolicy, MemoizeConfig, memoize, memoize_with};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn policy_strategy() -> impl Strategy<Value = ComputePolicy> {
    prop_oneof![Just(ComputePolicy::ComputeOnce), Just(ComputePolicy::Racing)]
}

// =============================================================================
// Memoization Correctness
// =============================================================================

proptest! {
    /// A memoized callable returns what the original returns.
    #[test]
    fn prop_memoized_agrees_with_original(
        inputs in prop::collection::vec((any::<i32>(), any::<i32>()), 0..64),
        policy in policy_strategy(),
    ) {
        let original = |x: i32, y: i32| x.wrapping_mul(31).wrapping_add(y);
        let memoized = memoize_with(total(original), MemoizeConfig::new().with_policy(policy));

        for &(x, y) in &inputs {
            prop_assert_eq!(memoized.apply((x, y)), original(x, y));
        }
    }
}

proptest! {
    /// Each distinct argument tuple is computed exactly once.
    #[test]
    fn prop_each_key_computed_once(
        inputs in prop::collection::vec(0u16..32, 0..128),
        shards in 1usize..64,
    ) {
        let counter = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&counter);
        let memoized = memoize_with(
            total(move |x: u16| {
                counted.fetch_add(1, Ordering::SeqCst);
                u32::from(x) * 3
            }),
            MemoizeConfig::new().with_shards(shards),
        );

        for &x in &inputs {
            prop_assert_eq!(memoized.apply((x,)), u32::from(x) * 3);
        }

        let mut distinct = inputs.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(counter.load(Ordering::SeqCst), distinct.len());
        prop_assert_eq!(memoized.len(), distinct.len());
    }
}

// =============================================================================
// No Caching of Failure
// =============================================================================

proptest! {
    /// Failures are recomputed on every call and never stored.
    #[test]
    fn prop_failures_are_never_cached(x in any::<i64>(), repeats in 1usize..8) {
        let counter = AtomicUsize::new(0);
        let failing = memoize(|x: i64| -> Result<i64, i64> {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(x)
        });

        for _ in 0..repeats {
            prop_assert_eq!(failing.invoke((x,)), Err(x));
        }

        prop_assert_eq!(counter.load(Ordering::SeqCst), repeats);
        prop_assert!(failing.is_empty());
        prop_assert_eq!(failing.stats().failures, repeats as u64);
    }
}

// =============================================================================
// Idempotent Wrapping
// =============================================================================

proptest! {
    /// Memoizing an already memoized callable adds no second cache.
    #[test]
    fn prop_memoize_is_idempotent(inputs in prop::collection::vec(any::<u8>(), 1..32)) {
        let counter = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&counter);
        let once = memoize(total(move |x: u8| {
            counted.fetch_add(1, Ordering::SeqCst);
            x.rotate_left(3)
        }));
        let twice = once.clone().memoize();
        let thrice = memoize(twice.clone());

        for &x in &inputs {
            prop_assert_eq!(thrice.apply((x,)), x.rotate_left(3));
            prop_assert_eq!(twice.apply((x,)), x.rotate_left(3));
        }

        let mut distinct = inputs.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(counter.load(Ordering::SeqCst), distinct.len());
        prop_assert!(twice.is_empty());
        prop_assert!(thrice.is_empty());
        prop_assert_eq!(once.len(), distinct.len());
    }
}
