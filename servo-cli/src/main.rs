//! servo - drive a servo motor over GPIO PWM
//!
//! ## Environment Variables
//! - `SERVO_PIN`: BCM pin the servo is wired to
//! - `SERVO_FREQUENCY`: PWM frequency in Hz (default: 50)
//! - `SERVO_DUTY_CYCLE`: duty cycle used for clockwise motion (default: 2)
//! - `SERVO_DURATION`: seconds to hold the signal (default: 0)
//! - `SERVO_SIMULATE`: use in-memory hardware instead of the GPIO driver
//! - `RUST_LOG`: log filter (default: servo=info,servo_motor=info)
//!
//! ## Exit status
//! 10-13 for an invalid pin/frequency/duty cycle/duration given at startup,
//! 14 for an invalid motion specification, the signal number when
//! terminated by SIGINT/SIGTERM/SIGHUP/SIGQUIT, 1 for any other failure.

use std::sync::Arc;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use servo_motor::{
    validator, LifecycleGuard, MockPwm, MotorConfig, MotorError, PwmHardware, ReleaseHandle,
    ServoMotor, SpecArgs, SpecValue,
};
use tracing::info;
#[cfg(not(feature = "rpi"))]
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "servo")]
#[command(version = "2026.10.19")]
#[command(about = "Drive a servo motor over GPIO PWM", long_about = None)]
#[command(allow_negative_numbers = true)]
struct Cli {
    /// BCM pin the servo is connected to
    #[arg(short, long, env = "SERVO_PIN", global = true)]
    pin: Option<String>,

    /// PWM frequency [Hz]
    #[arg(short, long, env = "SERVO_FREQUENCY", global = true)]
    frequency: Option<String>,

    /// Duty cycle [pulses/cycle]
    #[arg(short = 'c', long, env = "SERVO_DUTY_CYCLE", global = true)]
    duty_cycle: Option<String>,

    /// Time to keep the motor on [s]
    #[arg(short, long, env = "SERVO_DURATION", global = true)]
    duration: Option<String>,

    /// Use simulated hardware
    #[arg(long, env = "SERVO_SIMULATE", default_value_t = false, global = true)]
    simulate: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Turn the servo clockwise
    Cw(MotionArgs),

    /// Turn the servo counter-clockwise (fixed duty cycle 18)
    Ccw(MotionArgs),

    /// Check that the configured specification is complete and valid
    Check,

    /// Print the effective configuration as JSON
    Show,
}

/// Per-motion overrides; unset values come from the configuration
#[derive(Args)]
struct MotionArgs {
    /// Override the duration [s]
    #[arg(long = "for", value_name = "SECONDS")]
    for_duration: Option<String>,

    /// Override the pin
    #[arg(long, value_name = "PIN")]
    on_pin: Option<String>,

    /// Override the frequency [Hz]
    #[arg(long, value_name = "HZ")]
    at_frequency: Option<String>,

    /// Override the duty cycle
    #[arg(long, value_name = "CYCLE")]
    at_cycle: Option<String>,
}

impl MotionArgs {
    fn overrides(self) -> SpecArgs {
        SpecArgs {
            pin: self.on_pin.map(SpecValue::from),
            frequency: self.at_frequency.map(SpecValue::from),
            duty_cycle: self.at_cycle.map(SpecValue::from),
            duration: self.for_duration.map(SpecValue::from),
        }
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "servo=info,servo_motor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    std::process::exit(run(cli));
}

/// Runs the command and returns the process exit status.
///
/// The guard is armed as soon as the hardware is open, so pins configured
/// while building the motor are covered. It is finished before returning,
/// so hardware is released before `process::exit` skips the remaining
/// destructors.
fn run(cli: Cli) -> i32 {
    let hardware = match open_hardware(cli.simulate) {
        Ok(hardware) => hardware,
        Err(e) => return report(&e),
    };

    let guard = match LifecycleGuard::install(ReleaseHandle::new(Arc::downgrade(&hardware)))
        .context("failed to register termination signals")
    {
        Ok(guard) => guard,
        Err(e) => return report(&e),
    };

    let specs = SpecArgs {
        pin: cli.pin.map(SpecValue::from),
        frequency: cli.frequency.map(SpecValue::from),
        duty_cycle: cli.duty_cycle.map(SpecValue::from),
        duration: cli.duration.map(SpecValue::from),
    };
    let status = match ServoMotor::new(Arc::clone(&hardware), specs) {
        Ok(mut motor) => match execute(&mut motor, cli.command) {
            Ok(()) => 0,
            Err(e) => report(&e),
        },
        Err(e) => report(&e.into()),
    };
    // Still holding `hardware`, so the release reaches the driver
    guard.finish(status)
}

fn execute(motor: &mut ServoMotor, command: Commands) -> Result<()> {
    match command {
        Commands::Cw(args) => {
            let specs = motor.turn_clockwise(args.overrides())?;
            println!("{} clockwise on pin {} at {}", "✓".green(), specs.pin, specs.duty_cycle);
        }
        Commands::Ccw(args) => {
            let specs = motor.turn_counter_clockwise(args.overrides())?;
            println!(
                "{} counter-clockwise on pin {} at {}",
                "✓".green(),
                specs.pin,
                specs.duty_cycle
            );
        }
        Commands::Check => {
            if let Some(field) = invalid_field(motor.config()) {
                return Err(MotorError::InvalidSpecs(format!("{} is not valid", field)).into());
            }
            println!("{} specification is valid", "✓".green());
        }
        Commands::Show => {
            let json = serde_json::to_string_pretty(motor.config())
                .context("failed to serialize configuration")?;
            println!("{}", json);
        }
    }
    Ok(())
}

/// First field of the stored configuration that fails validation
fn invalid_field(config: &MotorConfig) -> Option<&'static str> {
    let pin = SpecValue::Integer(config.pin().map_or(-1, i64::from));
    [
        ("pin", validator::is_valid_pin(&pin)),
        ("frequency", validator::is_valid_frequency(&config.frequency().into())),
        ("duty cycle", validator::is_valid_duty_cycle(&config.duty_cycle().into())),
        ("duration", validator::is_valid_duration(&config.duration().into())),
    ]
    .into_iter()
    .find_map(|(field, valid)| (!valid).then_some(field))
}

fn open_hardware(simulate: bool) -> Result<Arc<dyn PwmHardware>> {
    if simulate {
        return Ok(simulated_hardware());
    }
    gpio_hardware()
}

#[cfg(feature = "rpi")]
fn gpio_hardware() -> Result<Arc<dyn PwmHardware>> {
    let hardware = servo_motor::RpiPwm::new().context("failed to open GPIO")?;
    info!("using Raspberry Pi GPIO");
    Ok(Arc::new(hardware))
}

#[cfg(not(feature = "rpi"))]
fn gpio_hardware() -> Result<Arc<dyn PwmHardware>> {
    warn!("built without the `rpi` feature, falling back to simulated hardware");
    Ok(simulated_hardware())
}

fn simulated_hardware() -> Arc<dyn PwmHardware> {
    info!("using simulated hardware");
    Arc::new(MockPwm::new())
}

/// Prints the error and maps it to an exit status
fn report(err: &anyhow::Error) -> i32 {
    eprintln!("{} {:#}", "error:".red().bold(), err);
    match err.downcast_ref::<MotorError>() {
        Some(motor_err) if motor_err.is_validation() => motor_err.code(),
        _ => 1,
    }
}
