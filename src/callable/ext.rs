//! Method syntax for the wrappers of this crate.

use std::convert::Infallible;

#[cfg(feature = "memoize")]
use std::hash::Hash;

#[cfg(feature = "memoize")]
use crate::memoize::{MemoizeConfig, Memoized};
#[cfg(feature = "translate")]
use crate::translate::{Lift, Nest, OrElse, OrReturn, Recover, Wrap};

use super::Callable;

/// Extension methods available on every [`Callable`].
///
/// Each method is the method-syntax twin of a free function in
/// [`memoize`](crate::memoize) or [`translate`](crate::translate).
///
/// # Examples
///
/// ```rust
/// use recallable::callable::{Callable, CallableExt};
///
/// let reciprocal = |x: i32| -> Result<i32, String> {
///     if x == 0 { Err("zero".to_string()) } else { Ok(100 / x) }
/// };
///
/// let safe = reciprocal.or_return(0).memoize();
/// assert_eq!(safe.apply((4,)), 25);
/// assert_eq!(safe.apply((0,)), 0);
/// ```
pub trait CallableExt<Args>: Callable<Args> + Sized {
    /// Wraps this callable in an unbounded cache.
    ///
    /// See [`memoize`](crate::memoize::memoize).
    #[cfg(feature = "memoize")]
    #[inline]
    fn memoize(self) -> Memoized<Self, Args>
    where
        Args: Hash + Eq + Clone,
        Self::Output: Clone,
    {
        Memoized::new(self)
    }

    /// Wraps this callable in a cache built from `config`.
    ///
    /// See [`memoize_with`](crate::memoize::memoize_with).
    #[cfg(feature = "memoize")]
    #[inline]
    fn memoize_with(self, config: MemoizeConfig) -> Memoized<Self, Args>
    where
        Args: Hash + Eq + Clone,
        Self::Output: Clone,
    {
        Memoized::with_config(self, config)
    }

    /// Maps ordinary failures through `mapper`.
    ///
    /// See [`nest`](crate::translate::nest).
    #[cfg(feature = "translate")]
    #[inline]
    fn nest<Mapper, Mapped>(self, mapper: Mapper) -> Nest<Self, Mapper>
    where
        Mapper: Fn(Self::Error) -> Mapped,
    {
        crate::translate::nest(self, mapper)
    }

    /// Wraps ordinary failures in a [`WrappedError`](crate::translate::WrappedError).
    ///
    /// See [`wrap`](crate::translate::wrap).
    #[cfg(feature = "translate")]
    #[inline]
    fn wrap(self) -> Wrap<Self>
    where
        Self::Error: std::error::Error + Send + Sync + 'static,
    {
        crate::translate::wrap(self)
    }

    /// Substitutes a fallback callable chosen from the failure.
    ///
    /// See [`recover`](crate::translate::recover).
    #[cfg(feature = "translate")]
    #[inline]
    fn recover<Recovery, Fallback>(self, recovery: Recovery) -> Recover<Self, Recovery>
    where
        Args: Clone,
        Recovery: Fn(&Self::Error) -> Option<Fallback>,
        Fallback: Callable<Args, Output = Self::Output>,
    {
        crate::translate::recover(self, recovery)
    }

    /// Falls back to a second callable on failure.
    ///
    /// See [`or_else`](crate::translate::or_else).
    #[cfg(feature = "translate")]
    #[inline]
    fn or_else<Fallback>(self, fallback: Fallback) -> OrElse<Self, Fallback>
    where
        Args: Clone,
        Fallback: Callable<Args, Output = Self::Output>,
    {
        crate::translate::or_else(self, fallback)
    }

    /// Returns `value` on failure.
    ///
    /// See [`or_return`](crate::translate::or_return).
    #[cfg(feature = "translate")]
    #[inline]
    fn or_return(self, value: Self::Output) -> OrReturn<Self, Self::Output>
    where
        Self::Output: Clone,
    {
        crate::translate::or_return(self, value)
    }

    /// Returns `Output::default()` on failure.
    ///
    /// See [`or_return_default`](crate::translate::or_return_default).
    #[cfg(feature = "translate")]
    #[inline]
    fn or_return_default(self) -> OrReturn<Self, Self::Output>
    where
        Self::Output: Default + Clone,
    {
        crate::translate::or_return(self, Self::Output::default())
    }

    /// Turns failures into `None`.
    ///
    /// See [`lift`](crate::translate::lift).
    #[cfg(feature = "translate")]
    #[inline]
    fn lift(self) -> Lift<Self> {
        crate::translate::lift(self)
    }

    /// Invokes a callable that cannot fail and returns its output directly.
    #[inline]
    fn apply(&self, arguments: Args) -> Self::Output
    where
        Self: Callable<Args, Error = Infallible>,
    {
        match self.invoke(arguments) {
            Ok(output) => output,
            Err(never) => match never {},
        }
    }
}

impl<Args, C> CallableExt<Args> for C where C: Callable<Args> {}
