//! Failure recovery through a fallback callable chosen at failure time.

use std::fmt;

use tracing::debug;

use super::RecoverError;
use crate::callable::Callable;

/// A callable that asks a recovery function for a fallback when it fails.
///
/// Created by [`recover`].
#[derive(Clone, Copy)]
pub struct Recover<C, Recovery> {
    callable: C,
    recovery: Recovery,
}

impl<C, Recovery> Recover<C, Recovery> {
    /// Returns the wrapped callable.
    pub const fn inner(&self) -> &C {
        &self.callable
    }
}

impl<C, Recovery> fmt::Debug for Recover<C, Recovery>
where
    C: fmt::Debug,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Recover")
            .field("callable", &self.callable)
            .finish_non_exhaustive()
    }
}

impl<Args, C, Recovery, Fallback> Callable<Args> for Recover<C, Recovery>
where
    Args: Clone,
    C: Callable<Args>,
    Recovery: Fn(&C::Error) -> Option<Fallback>,
    Fallback: Callable<Args, Output = C::Output>,
{
    type Output = C::Output;
    type Error = RecoverError<C::Error, Fallback::Error>;

    fn invoke(&self, arguments: Args) -> Result<Self::Output, Self::Error> {
        let error = match self.callable.invoke(arguments.clone()) {
            Ok(output) => return Ok(output),
            Err(error) => error,
        };

        let Some(fallback) = (self.recovery)(&error) else {
            debug!(
                translator = "recover",
                "recovery function produced no fallback"
            );
            return Err(RecoverError::MissingFallback { cause: error });
        };

        debug!(translator = "recover", "invoking fallback after ordinary failure");
        fallback.invoke(arguments).map_err(RecoverError::Fallback)
    }
}

/// Recovers from ordinary failures of `callable` with a fallback chosen by
/// `recovery`.
///
/// On failure, `recovery` is called exactly once with the failure and
/// returns the fallback callable, which is then invoked with the original
/// arguments. If `recovery` returns `None` the call fails immediately with
/// [`RecoverError::MissingFallback`], carrying the original failure. A
/// failing fallback is reported as [`RecoverError::Fallback`].
///
/// Panics are never intercepted: a panicking `callable` does not reach
/// `recovery`, and a panicking `recovery` propagates to the caller.
///
/// # Examples
///
/// ```rust
/// use recallable::callable::{Callable, total};
/// use recallable::translate::recover;
///
/// #[derive(Debug)]
/// enum FetchError {
///     Offline,
///     NotFound,
/// }
///
/// let fetch = |key: u32| -> Result<String, FetchError> {
///     if key == 0 { Err(FetchError::NotFound) } else { Err(FetchError::Offline) }
/// };
/// let from_disk = total(|key: u32| format!("cached-{key}"));
///
/// let resilient = recover(fetch, |error: &FetchError| match error {
///     FetchError::Offline => Some(from_disk),
///     FetchError::NotFound => None,
/// });
///
/// assert_eq!(resilient.invoke((7,)).unwrap(), "cached-7");
/// assert!(resilient.invoke((0,)).unwrap_err().is_missing_fallback());
/// ```
#[inline]
pub const fn recover<C, Recovery>(callable: C, recovery: Recovery) -> Recover<C, Recovery> {
    Recover { callable, recovery }
}
