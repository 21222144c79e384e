//! Procedural macros for recallable.
//!
//! # Available Attribute Macros
//!
//! - `#[memoized]`: Memoizes a free function in place
//!
//! # Example
//!
//! ```rust,ignore
//! use recallable::memoized;
//!
//! #[memoized]
//! fn fibonacci(n: u64) -> u64 {
//!     if n < 2 { n } else { fibonacci(n - 1) + fibonacci(n - 2) }
//! }
//!
//! assert_eq!(fibonacci(90), 2_880_067_194_370_816_120);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod memoized;

use proc_macro::TokenStream;

/// Memoizes a free function.
///
/// The function keeps its name, visibility and signature. Its body moves
/// into a private inner function, and every call goes through a
/// process-wide cache keyed by the argument tuple, so recursive calls are
/// memoized too.
///
/// # Return Types
///
/// - A function returning `Result<T, E>` is cached as a fallible callable:
///   `Ok` values are cached, `Err` values are returned to the caller and the
///   next call with the same arguments runs the body again.
/// - Any other return type is cached unconditionally.
///
/// Detection looks at the last path segment of the return type, so a type
/// alias such as `io::Result<T>` counts as a `Result`.
///
/// # Requirements
///
/// - Arguments must be owned, `Hash + Eq + Clone + Send + Sync + 'static`,
///   and bound to plain identifiers
/// - The return value must be `Clone + Send + Sync + 'static`
/// - The function must not be generic, `async`, `const`, `unsafe` or
///   `extern`, and must not take `self`
///
/// Violations of the syntactic requirements are reported as compile errors
/// pointing at the offending part of the signature.
///
/// # Generated Code
///
/// ```rust,ignore
/// fn fibonacci(n: u64) -> u64 {
///     fn __recallable_fibonacci(n: u64) -> u64 { /* original body */ }
///
///     static __RECALLABLE_CACHE: LazyLock<Memoized<Total<fn(u64) -> u64>, (u64,)>> =
///         LazyLock::new(|| memoize(total(__recallable_fibonacci as fn(u64) -> u64)));
///
///     match Callable::invoke(&*__RECALLABLE_CACHE, (n,)) {
///         Ok(value) => value,
///         Err(never) => match never {},
///     }
/// }
/// ```
///
/// # Example
///
/// ```rust,ignore
/// use recallable::memoized;
///
/// #[memoized]
/// fn parse_port(text: String) -> Result<u16, std::num::ParseIntError> {
///     text.trim().parse()
/// }
///
/// assert_eq!(parse_port(" 8080 ".to_string()), Ok(8080));
/// assert!(parse_port("http".to_string()).is_err());
/// ```
#[proc_macro_attribute]
pub fn memoized(attribute: TokenStream, item: TokenStream) -> TokenStream {
    memoized::memoized_impl(attribute, item)
}
