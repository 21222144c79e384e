//! Explicit failure suppression: [`OrElse`], [`OrReturn`] and [`Lift`].
//!
//! These are the only wrappers that discard an ordinary failure, and each
//! one has to be chosen explicitly by the caller.

use std::convert::Infallible;
use std::fmt;

use tracing::debug;

use crate::callable::Callable;

/// A callable that falls back to a second callable on failure.
///
/// Created by [`or_else`].
#[derive(Debug, Clone, Copy)]
pub struct OrElse<C, Fallback> {
    callable: C,
    fallback: Fallback,
}

impl<Args, C, Fallback> Callable<Args> for OrElse<C, Fallback>
where
    Args: Clone,
    C: Callable<Args>,
    Fallback: Callable<Args, Output = C::Output>,
{
    type Output = C::Output;
    type Error = Fallback::Error;

    fn invoke(&self, arguments: Args) -> Result<Self::Output, Self::Error> {
        match self.callable.invoke(arguments.clone()) {
            Ok(output) => Ok(output),
            Err(_) => {
                debug!(translator = "or_else", "ordinary failure replaced by fallback");
                self.fallback.invoke(arguments)
            }
        }
    }
}

/// Replaces every ordinary failure of `callable` with the result of
/// `fallback`, invoked with the same arguments.
///
/// The original failure is ignored. The resulting error type is the
/// fallback's: wrap an infallible fallback with [`total`](crate::callable::total)
/// to get a callable that cannot fail.
///
/// # Examples
///
/// ```rust
/// use recallable::callable::{CallableExt, total};
/// use recallable::translate::or_else;
///
/// let reciprocal = |x: i32| -> Result<f64, std::io::Error> {
///     if x == 0 {
///         Err(std::io::Error::other("division by zero"))
///     } else {
///         Ok(1.0 / f64::from(x))
///     }
/// };
/// let safe = or_else(reciprocal, total(|_: i32| 0.0));
///
/// assert_eq!(safe.apply((4,)), 0.25);
/// assert_eq!(safe.apply((0,)), 0.0);
/// ```
#[inline]
pub const fn or_else<C, Fallback>(callable: C, fallback: Fallback) -> OrElse<C, Fallback> {
    OrElse { callable, fallback }
}

/// A callable that returns a fixed value on failure.
///
/// Created by [`or_return`] and [`or_return_default`].
#[derive(Clone, Copy)]
pub struct OrReturn<C, Output> {
    callable: C,
    value: Output,
}

impl<C, Output> OrReturn<C, Output> {
    /// The value returned on failure.
    pub const fn value(&self) -> &Output {
        &self.value
    }
}

impl<C, Output> fmt::Debug for OrReturn<C, Output>
where
    C: fmt::Debug,
    Output: fmt::Debug,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("OrReturn")
            .field("callable", &self.callable)
            .field("value", &self.value)
            .finish()
    }
}

impl<Args, C, Output> Callable<Args> for OrReturn<C, Output>
where
    C: Callable<Args, Output = Output>,
    Output: Clone,
{
    type Output = Output;
    type Error = Infallible;

    fn invoke(&self, arguments: Args) -> Result<Output, Infallible> {
        Ok(self.callable.invoke(arguments).unwrap_or_else(|_| {
            debug!(translator = "or_return", "ordinary failure replaced by fixed value");
            self.value.clone()
        }))
    }
}

/// Returns a clone of `value` whenever `callable` fails.
///
/// # Examples
///
/// ```rust
/// use recallable::callable::CallableExt;
/// use recallable::translate::or_return;
///
/// let parse = |text: &str| -> Result<u8, std::num::ParseIntError> { text.parse() };
/// let lenient = or_return(parse, u8::MAX);
///
/// assert_eq!(lenient.apply(("12",)), 12);
/// assert_eq!(lenient.apply(("twelve",)), u8::MAX);
/// ```
#[inline]
pub const fn or_return<C, Output>(callable: C, value: Output) -> OrReturn<C, Output> {
    OrReturn { callable, value }
}

/// Returns `Output::default()` whenever `callable` fails.
///
/// # Examples
///
/// ```rust
/// use recallable::callable::CallableExt;
/// use recallable::translate::or_return_default;
///
/// let lookup = |name: &str| -> Result<Vec<u32>, String> { Err(format!("{name} unknown")) };
/// assert!(or_return_default(lookup).apply(("alice",)).is_empty());
/// ```
#[inline]
pub fn or_return_default<C, Args>(callable: C) -> OrReturn<C, C::Output>
where
    C: Callable<Args>,
    C::Output: Default,
{
    OrReturn {
        callable,
        value: C::Output::default(),
    }
}

/// A callable that reports failure as `None`.
///
/// Created by [`lift`].
#[derive(Debug, Clone, Copy)]
pub struct Lift<C> {
    callable: C,
}

impl<Args, C> Callable<Args> for Lift<C>
where
    C: Callable<Args>,
{
    type Output = Option<C::Output>;
    type Error = Infallible;

    fn invoke(&self, arguments: Args) -> Result<Self::Output, Infallible> {
        match self.callable.invoke(arguments) {
            Ok(output) => Ok(Some(output)),
            Err(_) => {
                debug!(translator = "lift", "ordinary failure lifted to None");
                Ok(None)
            }
        }
    }
}

/// Turns `callable` into one that returns `Some(output)` on success and
/// `None` on failure.
///
/// # Examples
///
/// ```rust
/// use recallable::callable::CallableExt;
/// use recallable::translate::lift;
///
/// let parse = |text: &str| -> Result<i64, std::num::ParseIntError> { text.parse() };
/// let maybe = lift(parse);
///
/// assert_eq!(maybe.apply(("-3",)), Some(-3));
/// assert_eq!(maybe.apply(("x",)), None);
/// ```
#[inline]
pub const fn lift<C>(callable: C) -> Lift<C> {
    Lift { callable }
}
