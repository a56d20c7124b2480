//! Raspberry Pi via `rppal` (PWM por software, numeração BCM)

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use rppal::gpio::{Gpio, InputPin, OutputPin};
use tracing::{debug, warn};
use crate::error::{HardwareError, HardwareResult};
use crate::hardware::{PwmHandle, PwmHardware};
use crate::types::PinMode;

enum PinSlot {
    Input(InputPin),
    Output {
        pin: OutputPin,
        /// Frequência da reserva PWM aberta
        claim: Option<f64>,
    },
}

/// Backend GPIO real
pub struct RpiPwm {
    gpio: Gpio,
    pins: Mutex<HashMap<u8, PinSlot>>,
}

impl std::fmt::Debug for RpiPwm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpiPwm")
            .field("pins", &self.lock().keys().collect::<Vec<_>>())
            .finish()
    }
}

impl RpiPwm {
    pub fn new() -> HardwareResult<Self> {
        let gpio = Gpio::new().map_err(gpio_error)?;
        Ok(Self {
            gpio,
            pins: Mutex::new(HashMap::new()),
        })
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<u8, PinSlot>> {
        self.pins.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn gpio_error(err: rppal::gpio::Error) -> HardwareError {
    HardwareError::Gpio(err.to_string())
}

fn bcm(pin: u32) -> HardwareResult<u8> {
    u8::try_from(pin).map_err(|_| HardwareError::OutOfRange(format!("BCM pin {}", pin)))
}

impl PwmHardware for RpiPwm {
    fn configure_pin_mode(&self, pin: u32, mode: PinMode) -> HardwareResult<()> {
        let bcm_pin = bcm(pin)?;
        let mut pins = self.lock();
        // Devolve o pino antes de pedi-lo de novo ao rppal
        pins.remove(&bcm_pin);

        let raw = self.gpio.get(bcm_pin).map_err(gpio_error)?;
        let slot = match mode {
            PinMode::Input => PinSlot::Input(raw.into_input()),
            PinMode::Output => PinSlot::Output {
                pin: raw.into_output(),
                claim: None,
            },
        };
        pins.insert(bcm_pin, slot);
        debug!(pin, ?mode, "GPIO pin configured");
        Ok(())
    }

    fn open_pwm(&self, pin: u32, frequency: f64) -> HardwareResult<PwmHandle> {
        let bcm_pin = bcm(pin)?;
        let mut pins = self.lock();
        match pins.get_mut(&bcm_pin) {
            Some(PinSlot::Output { claim: Some(_), .. }) => Err(HardwareError::PinClaimed(pin)),
            Some(PinSlot::Output { claim, .. }) => {
                *claim = Some(frequency);
                Ok(PwmHandle::new(pin))
            }
            _ => Err(HardwareError::PinNotConfigured(pin)),
        }
    }

    fn pwm_start(&self, handle: PwmHandle, duty_cycle: f64) -> HardwareResult<()> {
        if !(0.0..=100.0).contains(&duty_cycle) {
            return Err(HardwareError::OutOfRange(format!(
                "duty cycle {}% outside 0-100%",
                duty_cycle
            )));
        }
        let bcm_pin = bcm(handle.pin())?;
        let mut pins = self.lock();
        match pins.get_mut(&bcm_pin) {
            Some(PinSlot::Output { pin, claim: Some(frequency) }) => pin
                .set_pwm_frequency(*frequency, duty_cycle / 100.0)
                .map_err(gpio_error),
            _ => Err(HardwareError::UnknownHandle(handle.pin())),
        }
    }

    fn pwm_stop(&self, handle: PwmHandle) -> HardwareResult<()> {
        let bcm_pin = bcm(handle.pin())?;
        let mut pins = self.lock();
        match pins.get_mut(&bcm_pin) {
            Some(PinSlot::Output { pin, claim: Some(_) }) => pin.clear_pwm().map_err(gpio_error),
            _ => Ok(()),
        }
    }

    fn release_pwm(&self, handle: PwmHandle) -> HardwareResult<()> {
        let bcm_pin = bcm(handle.pin())?;
        let mut pins = self.lock();
        if let Some(PinSlot::Output { pin, claim }) = pins.get_mut(&bcm_pin) {
            if claim.take().is_some() {
                pin.clear_pwm().map_err(gpio_error)?;
            }
        }
        Ok(())
    }

    fn release_all(&self) {
        let mut pins = self.lock();
        for (bcm_pin, slot) in pins.iter_mut() {
            if let PinSlot::Output { pin, claim: Some(_) } = slot {
                if let Err(err) = pin.clear_pwm() {
                    warn!(pin = bcm_pin, %err, "failed to clear PWM during release");
                }
            }
        }
        // Ao serem descartados, os pinos voltam ao modo anterior
        pins.clear();
    }
}
