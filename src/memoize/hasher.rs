//! Default hasher selection.
//!
//! The `ahash` feature selects `ahash::RandomState`, the `fxhash` feature
//! selects `rustc_hash::FxBuildHasher`; `ahash` wins when both are enabled.
//! Without either, the standard library's DoS-resistant `RandomState` is
//! used. Any other hasher can be supplied through
//! [`Memoized::with_hasher`](super::Memoized::with_hasher).

/// The hasher used by caches created with [`memoize`](super::memoize).
#[cfg(feature = "ahash")]
pub type DefaultBuildHasher = ahash::RandomState;

/// The hasher used by caches created with [`memoize`](super::memoize).
#[cfg(all(feature = "fxhash", not(feature = "ahash")))]
pub type DefaultBuildHasher = rustc_hash::FxBuildHasher;

/// The hasher used by caches created with [`memoize`](super::memoize).
#[cfg(not(any(feature = "ahash", feature = "fxhash")))]
pub type DefaultBuildHasher = std::hash::RandomState;
