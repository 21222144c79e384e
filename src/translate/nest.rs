//! Failure mapping: [`Nest`] and [`Wrap`].

use std::error::Error;
use std::fmt;

use tracing::debug;

use super::WrappedError;
use crate::callable::Callable;

/// A callable whose ordinary failures are mapped into another error type.
///
/// Created by [`nest`].
#[derive(Clone, Copy)]
pub struct Nest<C, Mapper> {
    callable: C,
    mapper: Mapper,
}

impl<C, Mapper> Nest<C, Mapper> {
    /// Returns the wrapped callable.
    pub const fn inner(&self) -> &C {
        &self.callable
    }
}

impl<C, Mapper> fmt::Debug for Nest<C, Mapper>
where
    C: fmt::Debug,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Nest")
            .field("callable", &self.callable)
            .finish_non_exhaustive()
    }
}

impl<Args, C, Mapper, Mapped> Callable<Args> for Nest<C, Mapper>
where
    C: Callable<Args>,
    Mapper: Fn(C::Error) -> Mapped,
{
    type Output = C::Output;
    type Error = Mapped;

    fn invoke(&self, arguments: Args) -> Result<Self::Output, Self::Error> {
        self.callable.invoke(arguments).map_err(|error| {
            debug!(translator = "nest", "mapping ordinary failure");
            (self.mapper)(error)
        })
    }
}

/// Maps every ordinary failure of `callable` through `mapper`.
///
/// Successful results pass through untouched. Panics raised by `callable`
/// are fatal: they propagate unchanged and `mapper` never sees them. A
/// panicking `mapper` is not caught either.
///
/// # Examples
///
/// ```rust
/// use recallable::callable::Callable;
/// use recallable::translate::nest;
///
/// #[derive(Debug, PartialEq)]
/// struct ConfigError(String);
///
/// let parse_port = |text: &str| -> Result<u16, std::num::ParseIntError> { text.parse() };
/// let parse_port = nest(parse_port, |error: std::num::ParseIntError| {
///     ConfigError(format!("invalid port: {error}"))
/// });
///
/// assert_eq!(parse_port.invoke(("8080",)), Ok(8080));
/// assert_eq!(
///     parse_port.invoke(("eighty",)),
///     Err(ConfigError("invalid port: invalid digit found in string".to_string()))
/// );
/// ```
#[inline]
pub const fn nest<C, Mapper>(callable: C, mapper: Mapper) -> Nest<C, Mapper> {
    Nest { callable, mapper }
}

/// A callable whose ordinary failures become [`WrappedError`]s.
///
/// Created by [`wrap`].
#[derive(Debug, Clone, Copy)]
pub struct Wrap<C> {
    callable: C,
}

impl<C> Wrap<C> {
    /// Returns the wrapped callable.
    pub const fn inner(&self) -> &C {
        &self.callable
    }
}

impl<Args, C> Callable<Args> for Wrap<C>
where
    C: Callable<Args>,
    C::Error: Error + Send + Sync + 'static,
{
    type Output = C::Output;
    type Error = WrappedError;

    fn invoke(&self, arguments: Args) -> Result<Self::Output, Self::Error> {
        self.callable.invoke(arguments).map_err(|error| {
            debug!(translator = "wrap", error = %error, "wrapping ordinary failure");
            WrappedError::new(error)
        })
    }
}

/// Wraps every ordinary failure of `callable` in a [`WrappedError`] that
/// keeps the failure's message and carries it as `source()`.
///
/// # Examples
///
/// ```rust
/// use recallable::callable::Callable;
/// use recallable::translate::wrap;
/// use std::error::Error;
///
/// let open = |path: &str| -> std::io::Result<String> {
///     Err(std::io::Error::new(std::io::ErrorKind::NotFound, format!("{path} missing")))
/// };
/// let error = wrap(open).invoke(("app.toml",)).unwrap_err();
///
/// assert_eq!(error.to_string(), "app.toml missing");
/// assert_eq!(
///     error.downcast_cause_ref::<std::io::Error>().map(std::io::Error::kind),
///     Some(std::io::ErrorKind::NotFound)
/// );
/// assert!(error.source().is_some());
/// ```
#[inline]
pub const fn wrap<C>(callable: C) -> Wrap<C> {
    Wrap { callable }
}
