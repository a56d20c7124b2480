//! Integration tests for servo-motor

use crate::*;
use signal_hook::consts::{SIGINT, SIGTERM};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

fn servo(specs: SpecArgs) -> (Arc<MockPwm>, ServoMotor) {
    let hw = Arc::new(MockPwm::new());
    let motor = ServoMotor::new(hw.clone(), specs).unwrap();
    (hw, motor)
}

fn motion() -> SpecArgs {
    SpecArgs::new().duration(0.1).pin(17).frequency(50).duty_cycle(7.5)
}

// ═══════════════════════════════════════════════════════════════════════════
// VALIDATION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_pin_predicate_over_range() {
    for pin in -50i64..=0 {
        assert!(!validator::is_valid_pin(&pin.into()), "pin {}", pin);
    }
    for pin in 1i64..=50 {
        assert!(validator::is_valid_pin(&pin.into()), "pin {}", pin);
    }
}

#[test]
fn test_real_predicates_inclusive_zero() {
    for raw in [-10.0, -0.5, -f64::MIN_POSITIVE] {
        assert!(!validator::is_valid_frequency(&raw.into()));
        assert!(!validator::is_valid_duty_cycle(&raw.into()));
        assert!(!validator::is_valid_duration(&raw.into()));
    }
    for raw in [0.0, f64::MIN_POSITIVE, 0.5, 50.0, 1e6] {
        assert!(validator::is_valid_frequency(&raw.into()));
        assert!(validator::is_valid_duty_cycle(&raw.into()));
        assert!(validator::is_valid_duration(&raw.into()));
    }
}

#[test]
fn test_setters_leave_state_on_rejection() {
    let (_hw, mut motor) = servo(SpecArgs::new().pin(17).frequency(60).duty_cycle(5).duration(1));
    let before = motor.config().clone();

    assert_eq!(motor.set_pin("none").unwrap_err().code(), EPIN);
    assert_eq!(motor.set_frequency(-1).unwrap_err().code(), EFREQ);
    assert_eq!(motor.set_duty_cycle(f64::NAN).unwrap_err().code(), EDCYC);
    assert_eq!(motor.set_duration("-2").unwrap_err().code(), EDUR);
    assert_eq!(motor.set_specs(17, 60, 5, -1).unwrap_err().code(), ESPEC);

    assert_eq!(motor.config(), &before);
}

// ═══════════════════════════════════════════════════════════════════════════
// MOTION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_clockwise_motion_on_stub() {
    let (hw, mut motor) = servo(SpecArgs::new());
    let specs = motor.turn_clockwise(motion()).unwrap();

    assert_eq!(specs.pin, 17);
    assert_eq!(specs.duration, Duration::from_millis(100));
    assert_eq!(
        hw.events(),
        vec![
            HardwareEvent::ConfigurePin { pin: 17, mode: PinMode::Output },
            HardwareEvent::Open { pin: 17, frequency: 50.0 },
            HardwareEvent::Start { pin: 17, duty_cycle: 7.5 },
            HardwareEvent::Stop { pin: 17 },
            HardwareEvent::Release { pin: 17 },
        ]
    );
}

#[test]
fn test_counter_clockwise_always_eighteen() {
    let (hw, mut motor) = servo(SpecArgs::new());
    let specs = motor.turn_counter_clockwise(motion()).unwrap();

    assert_eq!(specs.duty_cycle, 18.0);
    assert_eq!(hw.starts(), vec![(17, 18.0)]);
    assert_eq!(hw.stop_count(), 1);
}

#[test]
fn test_negative_duration_touches_no_hardware() {
    let (hw, mut motor) = servo(SpecArgs::new().pin(17));
    let before = hw.events().len();

    let err = motor.turn_clockwise(motion().duration(-0.1)).unwrap_err();
    assert_eq!(err.code(), ESPEC);
    assert!(hw.starts().is_empty());
    assert_eq!(hw.stop_count(), 0);
    assert_eq!(hw.events().len(), before);
}

#[test]
fn test_overrides_do_not_change_config() {
    let (_hw, mut motor) = servo(SpecArgs::new().pin(4));
    let before = motor.config().clone();
    motor.turn_clockwise(SpecArgs::new().pin(17).duty_cycle(9)).unwrap();
    assert_eq!(motor.config(), &before);
}

#[test]
fn test_text_overrides_are_converted() {
    let (hw, mut motor) = servo(SpecArgs::new());
    motor
        .turn_clockwise(SpecArgs::new().pin("17").frequency("50").duty_cycle("7.5").duration("0"))
        .unwrap();
    assert_eq!(hw.starts(), vec![(17, 7.5)]);
}

// ═══════════════════════════════════════════════════════════════════════════
// LIFECYCLE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_signal_mid_sleep_releases_once() {
    let (hw, mut motor) = servo(SpecArgs::new());
    let exits = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&exits);
    let guard = LifecycleGuard::with_terminator(motor.release_handle(), move |status| {
        recorded.lock().unwrap().push(status);
    });

    thread::scope(|scope| {
        scope.spawn(|| {
            thread::sleep(Duration::from_millis(30));
            assert!(guard.trigger(Trigger::Signal(SIGTERM)));
            assert!(!guard.trigger(Trigger::Signal(SIGINT)));
        });
        motor.turn_clockwise(motion().duration(0.2)).unwrap();
    });

    assert_eq!(hw.release_all_count(), 1);
    assert_eq!(*exits.lock().unwrap(), vec![SIGTERM]);
    assert_eq!(guard.state(), GuardState::Terminated);
    assert!(!hw.is_claimed(17));

    // Parada após liberação forçada não chega ao hardware
    assert_eq!(hw.stop_count(), 0);

    drop(guard);
    assert_eq!(hw.release_all_count(), 1);
}

#[test]
fn test_guard_without_motion() {
    let (hw, motor) = servo(SpecArgs::new());
    let guard = LifecycleGuard::with_terminator(motor.release_handle(), |_| {});
    assert!(guard.trigger(Trigger::Signal(SIGINT)));
    assert_eq!(hw.release_all_count(), 1);
}

#[test]
fn test_guard_armed_before_construction() {
    let hw = Arc::new(MockPwm::new());
    let hardware: Arc<dyn PwmHardware> = hw.clone();
    let guard = LifecycleGuard::with_terminator(ReleaseHandle::new(Arc::downgrade(&hardware)), |_| {});

    // Pino configurado, duração rejeitada: a construção falha depois de tocar o hardware
    let err = ServoMotor::new(hardware, SpecArgs::new().pin(17).duration(1e20)).unwrap_err();
    assert_eq!(err.code(), EDUR);
    assert_eq!(hw.pin_mode(17), Some(PinMode::Output));

    assert!(guard.trigger(Trigger::Signal(SIGINT)));
    assert_eq!(hw.pin_mode(17), None);
    assert_eq!(hw.release_all_count(), 1);
}

#[test]
fn test_guard_outlives_motor() {
    let (hw, motor) = servo(SpecArgs::new().pin(17));
    let release = motor.release_handle();
    drop(motor);

    // O hardware ainda vive em `hw`: a liberação acontece
    let guard = LifecycleGuard::with_terminator(release, |_| {});
    drop(guard);
    assert_eq!(hw.release_all_count(), 1);
}
