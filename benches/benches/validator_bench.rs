//! # Validator Benchmarks
//!
//! Measures validation predicates over integer, real and text inputs.
//!
//! Run: `cargo bench --bench validator_bench`

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use servo_motor::{validator, SpecValue};

/// Benchmark individual predicates
fn bench_predicates(c: &mut Criterion) {
    let mut group = c.benchmark_group("predicates");

    let pin = SpecValue::from(17);
    let text_pin = SpecValue::from("17");
    let cycle = SpecValue::from(7.5);
    let bad = SpecValue::from("not-a-number");

    group.bench_function("pin_integer", |b| {
        b.iter(|| black_box(validator::is_valid_pin(black_box(&pin))))
    });

    group.bench_function("pin_text", |b| {
        b.iter(|| black_box(validator::is_valid_pin(black_box(&text_pin))))
    });

    group.bench_function("duty_cycle_real", |b| {
        b.iter(|| black_box(validator::is_valid_duty_cycle(black_box(&cycle))))
    });

    group.bench_function("duration_unparsable", |b| {
        b.iter(|| black_box(validator::is_valid_duration(black_box(&bad))))
    });

    group.finish();
}

/// Benchmark the combined check
fn bench_specs(c: &mut Criterion) {
    let specs = [
        SpecValue::from(17),
        SpecValue::from(50),
        SpecValue::from(7.5),
        SpecValue::from(0.1),
    ];

    c.bench_function("is_valid_specs", |b| {
        b.iter(|| {
            black_box(validator::is_valid_specs(
                &specs[0], &specs[1], &specs[2], &specs[3],
            ))
        })
    });
}

criterion_group!(benches, bench_predicates, bench_specs);
criterion_main!(benches);
