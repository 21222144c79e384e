//! Error translation for fallible callables.
//!
//! Each translator wraps a [`Callable`](crate::callable::Callable) and
//! changes what happens to its *ordinary* failures (`Err` values) while
//! leaving successful results and arguments untouched.
//!
//! # Failure Taxonomy
//!
//! - **Fatal**: panics. No translator catches unwinding, so a fatal failure
//!   always reaches the caller unchanged and never triggers a mapper,
//!   recovery function or fallback.
//! - **Ordinary**: `Err` values returned by the wrapped callable. These are
//!   what the translators act on.
//! - **Faults in recovery code**: a mapper or recovery function that panics
//!   is not caught either; bugs in error handling code are never masked.
//!
//! Without a translator, failures propagate unchanged. Every translator is
//! an explicit opt-in, and only [`or_else`], [`or_return`],
//! [`or_return_default`] and [`lift`] discard failures.
//!
//! # Overview
//!
//! | function              | on ordinary failure                                   | resulting error            |
//! |-----------------------|-------------------------------------------------------|----------------------------|
//! | [`nest`]              | maps the failure through a caller-supplied mapper     | the mapper's output        |
//! | [`wrap`]              | wraps it in a [`WrappedError`] carrying the cause     | [`WrappedError`]           |
//! | [`recover`]           | asks a recovery function for a fallback callable      | [`RecoverError`]           |
//! | [`or_else`]           | invokes a second callable with the same arguments     | the fallback's error       |
//! | [`or_return`]         | returns a fixed value                                 | `Infallible`               |
//! | [`or_return_default`] | returns `Default::default()`                          | `Infallible`               |
//! | [`lift`]              | returns `None` (success becomes `Some`)               | `Infallible`               |
//!
//! There is no "sneaky rethrow": a `Result` already lets a failure travel
//! through callers that never name its type.
//!
//! # Examples
//!
//! ```rust
//! use recallable::callable::{Callable, CallableExt, total};
//!
//! let reciprocal = |x: i32| -> Result<f64, std::io::Error> {
//!     if x == 0 {
//!         Err(std::io::Error::other("IOFailure"))
//!     } else {
//!         Ok(1.0 / f64::from(x))
//!     }
//! };
//!
//! let safe = reciprocal.or_else(total(|_: i32| 0.0));
//! assert_eq!(safe.apply((0,)), 0.0);
//!
//! let wrapped = reciprocal.wrap();
//! assert_eq!(wrapped.invoke((0,)).unwrap_err().to_string(), "IOFailure");
//! ```

mod error;
mod fallback;
mod nest;
mod recover;

pub use error::{BoxedCause, RecoverError, WrappedError};
pub use fallback::{Lift, OrElse, OrReturn, lift, or_else, or_return, or_return_default};
pub use nest::{Nest, Wrap, nest, wrap};
pub use recover::{Recover, recover};
