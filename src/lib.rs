//! # recallable
//!
//! Memoizing and error-translating wrappers for callables of any arity.
//!
//! ## Overview
//!
//! Every function shape, from a zero-argument supplier to a six-argument
//! function, is handled by one trait, [`Callable`](callable::Callable),
//! parametrized over the argument tuple. On top of it the crate provides:
//!
//! - **Memoization**: a thread-safe, unbounded cache keyed by the argument
//!   tuple that computes each key at most once under contention and never
//!   caches a failure
//! - **Error translation**: wrappers that map, wrap, recover from or
//!   replace the ordinary failures of a callable while leaving panics alone
//! - **`#[memoized]`**: an attribute that memoizes a free function in place,
//!   recursive calls included
//!
//! Wrappers keep the signature of what they wrap, so they compose freely:
//! a memoized callable can be translated, and a translated one memoized.
//!
//! ## Feature Flags
//!
//! - `translate`: Error translation wrappers (default)
//! - `memoize`: The memoizing cache (default)
//! - `derive`: The `#[memoized]` attribute (default)
//! - `serde`: `Serialize`/`Deserialize` for the cache configuration
//! - `ahash` / `fxhash`: Swap the default key hasher
//! - `full`: Enable all of the above except the hasher swaps
//!
//! ## Example
//!
//! ```rust
//! use recallable::prelude::*;
//!
//! let reciprocal = |x: i32| -> Result<f64, String> {
//!     if x == 0 {
//!         Err("division by zero".to_string())
//!     } else {
//!         Ok(1.0 / f64::from(x))
//!     }
//! };
//!
//! let safe = reciprocal.or_return(0.0).memoize();
//! assert_eq!(safe.apply((4,)), 0.25);
//! assert_eq!(safe.apply((0,)), 0.0);
//! assert_eq!(safe.len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports the callable trait, its extension methods, and the entry
/// points of every enabled feature.
///
/// # Usage
///
/// ```rust
/// use recallable::prelude::*;
/// ```
pub mod prelude {
    pub use crate::callable::*;

    #[cfg(feature = "translate")]
    pub use crate::translate::*;

    #[cfg(feature = "memoize")]
    pub use crate::memoize::*;

    #[cfg(feature = "derive")]
    pub use crate::memoized;
}

pub mod callable;

#[cfg(feature = "translate")]
pub mod translate;

#[cfg(feature = "memoize")]
pub mod memoize;

#[cfg(feature = "derive")]
pub use recallable_derive::memoized;
