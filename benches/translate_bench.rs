//! Benchmark for the error translators.
//!
//! Measures the overhead each translator adds on the success and failure
//! paths compared to calling the function directly.

use criterion::{Criterion, criterion_group, criterion_main};
use recallable::callable::{Callable, CallableExt, total};
use std::hint::black_box;

fn checked_divide(numerator: i64, denominator: i64) -> Result<i64, std::io::Error> {
    numerator
        .checked_div(denominator)
        .ok_or_else(|| std::io::Error::other("division by zero"))
}

fn benchmark_translate_success(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("translate_success");

    group.bench_function("direct", |bencher| {
        bencher.iter(|| black_box(checked_divide(black_box(84), black_box(2))));
    });

    let nested = checked_divide.nest(|error: std::io::Error| error.kind());
    group.bench_function("nest", |bencher| {
        bencher.iter(|| black_box(nested.invoke(black_box((84, 2)))));
    });

    let defaulted = checked_divide.or_return_default();
    group.bench_function("or_return_default", |bencher| {
        bencher.iter(|| black_box(defaulted.apply(black_box((84, 2)))));
    });

    group.finish();
}

fn benchmark_translate_failure(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("translate_failure");

    let wrapped = checked_divide.wrap();
    group.bench_function("wrap", |bencher| {
        bencher.iter(|| black_box(wrapped.invoke(black_box((1, 0))).is_err()));
    });

    let fallback = checked_divide.or_else(total(|numerator: i64, _: i64| numerator));
    group.bench_function("or_else", |bencher| {
        bencher.iter(|| black_box(fallback.apply(black_box((1, 0)))));
    });

    let recovered =
        checked_divide.recover(|_: &std::io::Error| Some(total(|_: i64, _: i64| i64::MAX)));
    group.bench_function("recover", |bencher| {
        bencher.iter(|| black_box(recovered.invoke(black_box((1, 0)))).is_ok());
    });

    let lifted = checked_divide.lift();
    group.bench_function("lift", |bencher| {
        bencher.iter(|| black_box(lifted.apply(black_box((1, 0)))));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_translate_success,
    benchmark_translate_failure
);
criterion_main!(benches);
