//! Camada de hardware GPIO/PWM
//!
//! ```text
//! ┌────────────────────────────────────────┐
//! │           PwmHardware (trait)          │
//! │ configure_pin_mode, open_pwm,          │
//! │ pwm_start, pwm_stop, release_pwm,      │
//! │ release_all                            │
//! └────────────────────────────────────────┘
//!        ↓                      ↓
//!   MockPwm (testes)     RpiPwm (feature `rpi`)
//! ```
//!
//! Todos os métodos recebem `&self`: a implementação usa mutabilidade
//! interior para que o guard de ciclo de vida possa forçar `release_all`
//! a partir de outra thread.

pub mod mock;
#[cfg(feature = "rpi")]
pub mod rpi;

use crate::error::HardwareResult;
use crate::types::PinMode;

pub use mock::{HardwareEvent, MockPwm};
#[cfg(feature = "rpi")]
pub use rpi::RpiPwm;

/// Identificador de uma reserva PWM (um por pino)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PwmHandle {
    pin: u32,
}

impl PwmHandle {
    pub fn new(pin: u32) -> Self {
        Self { pin }
    }

    pub fn pin(&self) -> u32 {
        self.pin
    }
}

/// Capacidade de hardware consumida pelo controlador
pub trait PwmHardware: Send + Sync {
    /// Configura direção do pino
    fn configure_pin_mode(&self, pin: u32, mode: PinMode) -> HardwareResult<()>;

    /// Reserva PWM no pino com a frequência dada (Hz)
    fn open_pwm(&self, pin: u32, frequency: f64) -> HardwareResult<PwmHandle>;

    /// Inicia a forma de onda com o duty cycle dado (%)
    fn pwm_start(&self, handle: PwmHandle, duty_cycle: f64) -> HardwareResult<()>;

    /// Interrompe a forma de onda
    fn pwm_stop(&self, handle: PwmHandle) -> HardwareResult<()>;

    /// Libera a reserva PWM do pino
    fn release_pwm(&self, handle: PwmHandle) -> HardwareResult<()>;

    /// Libera todas as reservas; nunca falha, seguro sem reservas abertas
    fn release_all(&self);
}
