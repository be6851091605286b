// benches/dispatch_performance.rs
//! Benchmarks for constraint_guard dispatch
//!
//! Covers the hot path (classify + dispatch of known and unknown codes), the
//! cost of wrapper depth, registry size, and concurrent dispatch under a
//! shared registry.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use constraint_guard::{
    ConstraintValidator, Outcome, PostgresError, RawError, SqlServerError, SqlServerValidator,
    SqlState, ValidatorRegistry,
};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Debug)]
struct Layer(RawError);

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("layer")
    }
}

impl Error for Layer {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        let inner: &(dyn Error + 'static) = &*self.0;
        Some(inner)
    }
}

fn wrapped(mut error: RawError, depth: usize) -> RawError {
    for _ in 0..depth {
        error = Arc::new(Layer(error));
    }
    error
}

fn sqlserver(number: i32) -> RawError {
    Arc::new(SqlServerError::new(
        number,
        "Violation of PRIMARY KEY constraint 'PK_Users'. Cannot insert duplicate key.",
    ))
}

fn postgres(state: &'static str) -> RawError {
    Arc::new(PostgresError::new(
        SqlState::new(state),
        "duplicate key value violates unique constraint \"users_pkey\"",
    ))
}

/// Never recognizes anything; pads the registry ahead of the built-ins.
struct Decline;

impl ConstraintValidator for Decline {
    fn engine(&self) -> &'static str {
        "decline"
    }

    fn classify(&self, _error: &RawError) -> Outcome {
        Outcome::Unrecognized
    }
}

// ============================================================================
// Classification
// ============================================================================

fn bench_classify(c: &mut Criterion) {
    let validator = SqlServerValidator::new();
    let known = sqlserver(2627);
    let unknown = sqlserver(9999);
    let foreign = postgres("23505");

    let mut group = c.benchmark_group("classify");
    group.bench_function("known_code", |b| {
        b.iter(|| black_box(validator.classify(black_box(&known))))
    });
    group.bench_function("unknown_code", |b| {
        b.iter(|| black_box(validator.classify(black_box(&unknown))))
    });
    group.bench_function("foreign_type", |b| {
        b.iter(|| black_box(validator.classify(black_box(&foreign))))
    });
    group.finish();
}

fn bench_wrapper_depth(c: &mut Criterion) {
    let validator = SqlServerValidator::new();
    let mut group = c.benchmark_group("classify_wrapped");

    for depth in [0usize, 1, 4, 16] {
        let input = wrapped(sqlserver(547), depth);
        group.bench_with_input(BenchmarkId::from_parameter(depth), &input, |b, input| {
            b.iter(|| black_box(validator.classify(input)))
        });
    }
    group.finish();
}

// ============================================================================
// Dispatch
// ============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let registry = ValidatorRegistry::with_builtin();
    let mut group = c.benchmark_group("dispatch");

    let cases = [
        ("sqlserver_known", sqlserver(2627)),
        ("postgres_known", postgres("23505")),
        ("postgres_unknown", postgres("40001")),
        ("generic", Arc::new(std::io::Error::other("reset")) as RawError),
    ];

    for (label, input) in cases {
        group.bench_function(label, |b| {
            b.iter(|| black_box(registry.resolve(Arc::clone(&input))))
        });
    }
    group.finish();
}

fn bench_registry_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_registry_size");

    for padding in [0usize, 4, 16] {
        let registry = ValidatorRegistry::new();
        for _ in 0..padding {
            registry.register(Arc::new(Decline));
        }
        registry.register(Arc::new(SqlServerValidator::new()));

        let input = sqlserver(515);
        group.bench_with_input(BenchmarkId::from_parameter(padding), &input, |b, input| {
            b.iter(|| black_box(registry.dispatch(Arc::clone(input))))
        });
    }
    group.finish();
}

fn bench_concurrent_dispatch(c: &mut Criterion) {
    let registry = ValidatorRegistry::with_builtin();

    c.bench_function("dispatch_concurrent_4_threads", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let registry = registry.clone();
                    std::thread::spawn(move || {
                        for _ in 0..100 {
                            black_box(registry.resolve(sqlserver(2627)));
                        }
                    })
                })
                .collect();

            for handle in handles {
                // A panicking worker already failed the run
                let _ = handle.join();
            }
        })
    });
}

// ============================================================================
// Logging
// ============================================================================

fn bench_log_write(c: &mut Criterion) {
    let registry = ValidatorRegistry::with_builtin();
    let resolution = registry.dispatch(postgres("23503"));
    let Some(violation) = resolution.violation() else {
        return;
    };

    c.bench_function("violation_log_write", |b| {
        let mut buffer = String::with_capacity(256);
        b.iter(|| {
            buffer.clear();
            black_box(violation.internal_log().write_to(&mut buffer))
        })
    });
}

// ============================================================================
// BENCHMARK GROUPS
// ============================================================================

criterion_group!(classify_benches, bench_classify, bench_wrapper_depth);

criterion_group!(
    dispatch_benches,
    bench_dispatch,
    bench_registry_size,
    bench_concurrent_dispatch,
);

criterion_group!(logging_benches, bench_log_write);

criterion_main!(classify_benches, dispatch_benches, logging_benches);
