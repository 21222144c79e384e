//! The generic callable abstraction shared by every wrapper in this crate.
//!
//! A [`Callable`] is a function of fixed arity that may fail. Instead of one
//! interface per arity and argument type, a single trait is parametrized over
//! the argument tuple:
//!
//! ```text
//! Fn(A1, A2) -> Result<R, E>   implements   Callable<(A1, A2), Output = R, Error = E>
//! ```
//!
//! Every wrapper ([`Memoized`](crate::memoize::Memoized), the translators in
//! [`translate`](crate::translate)) implements `Callable` for the same
//! argument tuple as the callable it wraps, so wrapping never changes the
//! call signature and wrappers stack in any order.
//!
//! # Overview
//!
//! - [`Callable`]: The trait itself, implemented for closures and function
//!   pointers of arity 0 to 6 that return `Result`
//! - [`Total`] / [`total`]: Adapts an infallible function into a `Callable`
//!   whose error type is [`Infallible`](std::convert::Infallible)
//! - [`into_fn0`] .. [`into_fn6`]: Turns a `Callable` back into an ordinary
//!   closure with positional parameters
//! - [`CallableExt`]: Method syntax for the wrappers of this crate
//!
//! Wrappers are plain values. To share one between threads, clone it
//! ([`Memoized`](crate::memoize::Memoized) clones share their cache) or put
//! it behind an `Arc` and call through the reference.
//!
//! # Examples
//!
//! ```rust
//! use recallable::callable::{Callable, total};
//!
//! let parse = |text: &str| -> Result<i32, std::num::ParseIntError> { text.parse() };
//! assert_eq!(parse.invoke(("42",)), Ok(42));
//!
//! let square = total(|x: i32| x * x);
//! assert_eq!(square.invoke((4,)), Ok(16));
//! ```

mod arity;
mod ext;

pub use arity::{
    Total, into_fn0, into_fn1, into_fn2, into_fn3, into_fn4, into_fn5, into_fn6, total,
};
pub use ext::CallableExt;

/// A function of fixed arity that produces `Output` or fails with `Error`.
///
/// `Args` is the tuple of argument types: `()` for a supplier, `(A,)` for a
/// unary function, `(A, B)` for a binary one, and so on.
///
/// Failures reported through `Err` are *ordinary* failures and may be
/// translated, recovered or cached around by the wrappers of this crate.
/// Panics are *fatal* failures: no wrapper ever catches them.
///
/// # Examples
///
/// ```rust
/// use recallable::callable::Callable;
///
/// fn divide(numerator: i32, denominator: i32) -> Result<i32, String> {
///     if denominator == 0 {
///         Err("division by zero".to_string())
///     } else {
///         Ok(numerator / denominator)
///     }
/// }
///
/// assert_eq!(divide.invoke((10, 2)), Ok(5));
/// assert!(divide.invoke((1, 0)).is_err());
/// ```
pub trait Callable<Args> {
    /// The value produced on success.
    type Output;

    /// The ordinary failure type.
    type Error;

    /// Invokes the callable with the given argument tuple.
    ///
    /// # Errors
    ///
    /// Returns the callable's ordinary failure.
    fn invoke(&self, arguments: Args) -> Result<Self::Output, Self::Error>;

    /// Returns `true` if this callable is the product of memoization.
    ///
    /// Used by [`memoize`](crate::memoize::memoize) to avoid stacking a
    /// second cache on top of an existing one.
    #[inline]
    fn is_memoized(&self) -> bool {
        false
    }
}
