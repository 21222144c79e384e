//! Error types produced by the translators.

use std::error::Error;

use thiserror::Error;

/// The boxed cause carried by a [`WrappedError`].
pub type BoxedCause = Box<dyn Error + Send + Sync + 'static>;

/// A generic error that wraps an ordinary failure and keeps it as its cause.
///
/// Produced by [`wrap`](super::wrap). The message defaults to the cause's
/// `Display` text, and the cause itself is reachable through
/// [`Error::source`], so the original failure is never lost.
///
/// # Examples
///
/// ```rust
/// use recallable::translate::WrappedError;
/// use std::error::Error;
///
/// let io = std::io::Error::other("disk on fire");
/// let wrapped = WrappedError::new(io);
///
/// assert_eq!(wrapped.to_string(), "disk on fire");
/// assert_eq!(wrapped.source().map(ToString::to_string).as_deref(), Some("disk on fire"));
/// assert!(wrapped.downcast_cause_ref::<std::io::Error>().is_some());
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct WrappedError {
    message: String,
    #[source]
    cause: BoxedCause,
}

impl WrappedError {
    /// Wraps `cause`, reusing its `Display` text as the message.
    pub fn new<E>(cause: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            message: cause.to_string(),
            cause: Box::new(cause),
        }
    }

    /// Wraps `cause` under a caller-provided message.
    pub fn with_message<E>(message: impl Into<String>, cause: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            cause: Box::new(cause),
        }
    }

    /// The message of this error.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The wrapped failure.
    pub fn cause(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.cause.as_ref()
    }

    /// Returns the wrapped failure if it is of type `E`.
    pub fn downcast_cause_ref<E>(&self) -> Option<&E>
    where
        E: Error + 'static,
    {
        self.cause.downcast_ref::<E>()
    }

    /// Consumes this error and returns the wrapped failure.
    pub fn into_cause(self) -> BoxedCause {
        self.cause
    }

    /// Iterates this error followed by every error in its `source` chain.
    pub fn chain(&self) -> impl Iterator<Item = &(dyn Error + 'static)> {
        std::iter::successors(Some(self as &(dyn Error + 'static)), |&error| error.source())
    }
}

/// Failure of a [`Recover`](super::Recover) wrapper.
///
/// # Examples
///
/// ```rust
/// use recallable::translate::RecoverError;
///
/// let error: RecoverError<std::io::Error, std::fmt::Error> = RecoverError::MissingFallback {
///     cause: std::io::Error::other("unreachable host"),
/// };
/// assert!(error.is_missing_fallback());
/// assert_eq!(
///     error.to_string(),
///     "recovery function produced no fallback for failure: unreachable host"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecoverError<E, F> {
    /// The recovery function returned no fallback. Carries the original failure.
    #[error("recovery function produced no fallback for failure: {cause}")]
    MissingFallback {
        /// The failure that triggered recovery.
        #[source]
        cause: E,
    },

    /// The fallback callable itself failed.
    #[error(transparent)]
    Fallback(F),
}

impl<E, F> RecoverError<E, F> {
    /// Returns `true` if the recovery function produced no fallback.
    pub const fn is_missing_fallback(&self) -> bool {
        matches!(self, Self::MissingFallback { .. })
    }

    /// Returns the fallback's failure, if that is what happened.
    pub fn into_fallback_error(self) -> Option<F> {
        match self {
            Self::Fallback(error) => Some(error),
            Self::MissingFallback { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fmt;

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Inner {
        fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("inner failure")
        }
    }

    impl Error for Inner {}

    #[rstest]
    fn test_wrapped_error_keeps_message() {
        let wrapped = WrappedError::new(Inner);
        assert_eq!(wrapped.message(), "inner failure");
        assert_eq!(wrapped.to_string(), "inner failure");
    }

    #[rstest]
    fn test_wrapped_error_custom_message() {
        let wrapped = WrappedError::with_message("lookup failed", Inner);
        assert_eq!(wrapped.to_string(), "lookup failed");
        assert_eq!(wrapped.cause().to_string(), "inner failure");
    }

    #[rstest]
    fn test_wrapped_error_chain() {
        let nested = WrappedError::with_message("outer", WrappedError::new(Inner));
        let messages: Vec<String> = nested.chain().map(ToString::to_string).collect();
        assert_eq!(messages, vec!["outer", "inner failure", "inner failure"]);
    }

    #[rstest]
    fn test_wrapped_error_downcast() {
        let wrapped = WrappedError::new(Inner);
        assert!(wrapped.downcast_cause_ref::<Inner>().is_some());
        assert!(wrapped.downcast_cause_ref::<fmt::Error>().is_none());
        assert!(wrapped.into_cause().downcast::<Inner>().is_ok());
    }

    #[rstest]
    fn test_recover_error_fallback_is_transparent() {
        let error: RecoverError<Inner, fmt::Error> = RecoverError::Fallback(fmt::Error);
        assert!(!error.is_missing_fallback());
        assert_eq!(error.to_string(), fmt::Error.to_string());
        assert_eq!(error.into_fallback_error(), Some(fmt::Error));
    }

    #[rstest]
    fn test_recover_error_missing_fallback_has_source() {
        let error: RecoverError<Inner, fmt::Error> = RecoverError::MissingFallback { cause: Inner };
        assert_eq!(
            error.source().map(ToString::to_string).as_deref(),
            Some("inner failure")
        );
    }
}
