//! # Motion Benchmarks
//!
//! Overhead of a zero-duration motion against simulated hardware
//! (resolve, validate, open, start, stop, close).
//!
//! Run: `cargo bench --bench motion_bench`

use std::sync::Arc;
use criterion::{criterion_group, criterion_main, Criterion};
use servo_motor::{MockPwm, ServoMotor, SpecArgs};

fn bench_motion(c: &mut Criterion) {
    let mut group = c.benchmark_group("motion");

    group.bench_function("clockwise_zero_duration", |b| {
        let hw = Arc::new(MockPwm::new());
        let mut motor = ServoMotor::new(hw.clone(), SpecArgs::new().pin(17)).unwrap();
        b.iter(|| {
            let specs = motor.turn_clockwise(SpecArgs::new()).unwrap();
            hw.clear_events();
            specs
        })
    });

    group.bench_function("rejected_specs", |b| {
        let mut motor = ServoMotor::new(Arc::new(MockPwm::new()), SpecArgs::new()).unwrap();
        b.iter(|| motor.turn_clockwise(SpecArgs::new()).unwrap_err())
    });

    group.finish();
}

criterion_group!(benches, bench_motion);
criterion_main!(benches);
