//! Tests for the `#[memoized]` attribute.

use recallable::memoized;
use rstest::rstest;
use std::sync::atomic::{AtomicUsize, Ordering};

static FIBONACCI_CALLS: AtomicUsize = AtomicUsize::new(0);

#[memoized]
fn fibonacci(n: u64) -> u64 {
    FIBONACCI_CALLS.fetch_add(1, Ordering::SeqCst);
    if n < 2 {
        n
    } else {
        fibonacci(n - 1) + fibonacci(n - 2)
    }
}

static PARSE_CALLS: AtomicUsize = AtomicUsize::new(0);

/// Parses a port, failing for anything that is not a number.
#[memoized]
pub fn parse_port(text: String) -> Result<u16, std::num::ParseIntError> {
    PARSE_CALLS.fetch_add(1, Ordering::SeqCst);
    text.trim().parse()
}

#[memoized]
fn area(mut width: u32, height: u32) -> u64 {
    width = width.max(1);
    u64::from(width) * u64::from(height)
}

static GREETING_CALLS: AtomicUsize = AtomicUsize::new(0);

#[memoized]
fn greeting() -> String {
    GREETING_CALLS.fetch_add(1, Ordering::SeqCst);
    "hello".to_string()
}

#[rstest]
fn recursive_calls_are_memoized() {
    assert_eq!(fibonacci(90), 2_880_067_194_370_816_120);
    // Every n in 0..=90 is computed exactly once.
    assert_eq!(FIBONACCI_CALLS.load(Ordering::SeqCst), 91);

    assert_eq!(fibonacci(50), 12_586_269_025);
    assert_eq!(FIBONACCI_CALLS.load(Ordering::SeqCst), 91);
}

#[rstest]
fn result_errors_are_not_cached() {
    assert!(parse_port("not a port".to_string()).is_err());
    assert!(parse_port("not a port".to_string()).is_err());
    assert_eq!(PARSE_CALLS.load(Ordering::SeqCst), 2);

    assert_eq!(parse_port("8080".to_string()), Ok(8080));
    assert_eq!(parse_port("8080".to_string()), Ok(8080));
    assert_eq!(PARSE_CALLS.load(Ordering::SeqCst), 3);
}

#[rstest]
#[case(0, 7, 7)]
#[case(3, 4, 12)]
fn mutable_parameters_keep_working(#[case] width: u32, #[case] height: u32, #[case] expected: u64) {
    assert_eq!(area(width, height), expected);
}

#[rstest]
fn supplier_is_computed_once() {
    assert_eq!(greeting(), "hello");
    assert_eq!(greeting(), "hello");
    assert_eq!(GREETING_CALLS.load(Ordering::SeqCst), 1);
}

#[rstest]
fn memoized_function_is_shared_between_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| area(6, 7)))
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 42);
    }
}
