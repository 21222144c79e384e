//! Per-key state of a memoizing cache.
//!
//! A key moves through `Absent -> Computing -> Cached`. `Absent` is the key
//! missing from its shard. A failed or panicking computation returns the key
//! to `Absent` and wakes every waiter so they can race for it again.

use std::sync::Arc;
use std::thread::{self, ThreadId};

use parking_lot::{Condvar, Mutex};

/// The value stored in a shard for a present key.
pub(super) enum Slot<R> {
    /// A successful result, returned to every later caller.
    Cached(R),
    /// A computation in flight; callers for the same key wait on it.
    Computing(Arc<InFlight<R>>),
}

/// How an in-flight computation settled, as observed by a waiter.
pub(super) enum Settled<R> {
    /// The computation succeeded with this value.
    Finished(R),
    /// The computation failed or panicked; the key is absent again.
    Abandoned,
}

enum Progress<R> {
    Running,
    Finished(R),
    Abandoned,
}

/// Rendezvous point between the computing caller and its waiters.
pub(super) struct InFlight<R> {
    owner: ThreadId,
    progress: Mutex<Progress<R>>,
    settled: Condvar,
}

impl<R: Clone> InFlight<R> {
    /// Creates the rendezvous for a computation owned by the current thread.
    pub(super) fn new() -> Self {
        Self {
            owner: thread::current().id(),
            progress: Mutex::new(Progress::Running),
            settled: Condvar::new(),
        }
    }

    /// Blocks until the computation finishes or is abandoned.
    ///
    /// # Panics
    ///
    /// Panics if called from the thread that owns the computation: that
    /// thread re-entered the cache with the key it is computing and would
    /// otherwise wait on itself forever.
    pub(super) fn wait(&self) -> Settled<R> {
        assert!(
            self.owner != thread::current().id(),
            "memoized callable re-entered with the arguments it is currently computing; \
             this would deadlock"
        );

        let mut progress = self.progress.lock();
        loop {
            match &*progress {
                Progress::Finished(value) => return Settled::Finished(value.clone()),
                Progress::Abandoned => return Settled::Abandoned,
                Progress::Running => {}
            }
            self.settled.wait(&mut progress);
        }
    }

    /// Publishes a successful result and wakes every waiter.
    pub(super) fn finish(&self, value: R) {
        *self.progress.lock() = Progress::Finished(value);
        self.settled.notify_all();
    }

    /// Marks the computation as abandoned and wakes every waiter.
    pub(super) fn abandon(&self) {
        *self.progress.lock() = Progress::Abandoned;
        self.settled.notify_all();
    }
}
