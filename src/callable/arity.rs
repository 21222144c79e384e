//! `Callable` implementations for functions of arity 0 to 6.
//!
//! One macro invocation per arity generates:
//!
//! - the blanket impl for `Fn(A1, .., An) -> Result<R, E>`
//! - the impl for [`Total`], which adapts `Fn(A1, .., An) -> R`
//! - an `into_fnN` adapter that turns a `Callable` back into a closure

use std::convert::Infallible;
use std::fmt;

use super::Callable;

/// Adapts an infallible function into a [`Callable`].
///
/// The resulting callable never fails; its error type is [`Infallible`].
/// Use [`CallableExt::apply`](super::CallableExt::apply) to call it without
/// unwrapping a `Result`.
///
/// # Examples
///
/// ```rust
/// use recallable::callable::{Callable, CallableExt, total};
///
/// let add = total(|first: i32, second: i32| first + second);
/// assert_eq!(add.invoke((2, 3)), Ok(5));
/// assert_eq!(add.apply((2, 3)), 5);
/// ```
#[derive(Clone, Copy)]
pub struct Total<F> {
    function: F,
}

impl<F> Total<F> {
    /// Returns the wrapped function.
    #[inline]
    pub fn into_inner(self) -> F {
        self.function
    }
}

impl<F> fmt::Debug for Total<F> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Total(<function>)")
    }
}

/// Wraps an infallible function so it can be used wherever a [`Callable`]
/// is expected.
///
/// # Examples
///
/// ```rust
/// use recallable::callable::{Callable, total};
///
/// let answer = total(|| 42);
/// assert_eq!(answer.invoke(()), Ok(42));
/// ```
#[inline]
pub const fn total<F>(function: F) -> Total<F> {
    Total { function }
}

macro_rules! impl_callable_for_arity {
    ($arity:literal; $($argument:ident: $parameter:ident),*) => {
        impl<Function, Output, Failure, $($parameter,)*> Callable<($($parameter,)*)> for Function
        where
            Function: Fn($($parameter),*) -> Result<Output, Failure>,
        {
            type Output = Output;
            type Error = Failure;

            #[inline]
            fn invoke(&self, arguments: ($($parameter,)*)) -> Result<Output, Failure> {
                let ($($argument,)*) = arguments;
                self($($argument),*)
            }
        }

        impl<Function, Output, $($parameter,)*> Callable<($($parameter,)*)> for Total<Function>
        where
            Function: Fn($($parameter),*) -> Output,
        {
            type Output = Output;
            type Error = Infallible;

            #[inline]
            fn invoke(&self, arguments: ($($parameter,)*)) -> Result<Output, Infallible> {
                let ($($argument,)*) = arguments;
                Ok((self.function)($($argument),*))
            }
        }

        paste::paste! {
            #[doc = concat!(
                "Turns a `Callable` of arity ", stringify!($arity),
                " back into a closure with positional parameters.\n\n",
                "Useful when a wrapped callable has to be handed to code that expects a plain `Fn`."
            )]
            #[inline]
            pub fn [<into_fn $arity>]<C, $($parameter,)*>(
                callable: C,
            ) -> impl Fn($($parameter),*) -> Result<C::Output, C::Error>
            where
                C: Callable<($($parameter,)*)>,
            {
                move |$($argument),*| callable.invoke(($($argument,)*))
            }
        }
    };
}

impl_callable_for_arity!(0;);
impl_callable_for_arity!(1; first: A1);
impl_callable_for_arity!(2; first: A1, second: A2);
impl_callable_for_arity!(3; first: A1, second: A2, third: A3);
impl_callable_for_arity!(4; first: A1, second: A2, third: A3, fourth: A4);
impl_callable_for_arity!(5; first: A1, second: A2, third: A3, fourth: A4, fifth: A5);
impl_callable_for_arity!(6; first: A1, second: A2, third: A3, fourth: A4, fifth: A5, sixth: A6);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_total_supplier() {
        let supplier = total(|| "constant");
        assert_eq!(supplier.invoke(()), Ok("constant"));
    }

    #[rstest]
    fn test_total_ternary() {
        let volume = total(|width: u32, height: u32, depth: u32| width * height * depth);
        assert_eq!(volume.invoke((2, 3, 4)), Ok(24));
    }

    #[rstest]
    fn test_six_argument_function() {
        let sum = |a: i64, b: i64, c: i64, d: i64, e: i64, f: i64| -> Result<i64, ()> {
            Ok(a + b + c + d + e + f)
        };
        assert_eq!(sum.invoke((1, 2, 3, 4, 5, 6)), Ok(21));
    }

    #[rstest]
    fn test_into_fn_round_trip() {
        let divide = |numerator: i32, denominator: i32| -> Result<i32, &'static str> {
            numerator.checked_div(denominator).ok_or("division by zero")
        };
        let plain = into_fn2(divide);
        assert_eq!(plain(10, 2), Ok(5));
        assert_eq!(plain(1, 0), Err("division by zero"));
    }

    #[rstest]
    fn test_into_fn0_supplier() {
        let plain = into_fn0(total(|| 7));
        assert_eq!(plain(), Ok(7));
    }

    #[rstest]
    fn test_total_debug_hides_function() {
        assert_eq!(format!("{:?}", total(|x: i32| x)), "Total(<function>)");
    }
}
