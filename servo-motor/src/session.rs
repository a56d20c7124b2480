//! Sessão PWM: uma reserva de hardware durante um único movimento

use tracing::{debug, warn};
use crate::error::{MotorError, MotorResult};
use crate::hardware::{PwmHandle, PwmHardware};
use crate::types::SpecValue;
use crate::validator;

/// Reserva PWM exclusiva sobre um pino.
///
/// `stop` e `close` são idempotentes; ao sair de escopo a sessão é
/// parada e liberada.
pub struct PwmSession<'a> {
    hardware: &'a dyn PwmHardware,
    handle: PwmHandle,
    frequency: f64,
    running: bool,
    open: bool,
}

impl std::fmt::Debug for PwmSession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PwmSession")
            .field("pin", &self.handle.pin())
            .field("frequency", &self.frequency)
            .field("running", &self.running)
            .field("open", &self.open)
            .finish()
    }
}

impl<'a> PwmSession<'a> {
    /// Abre a sessão; o pino já deve estar configurado como saída
    pub fn open(
        hardware: &'a dyn PwmHardware,
        pin: &SpecValue,
        frequency: &SpecValue,
    ) -> MotorResult<Self> {
        let Some(pin) = validator::pin_of(pin) else {
            return Err(MotorError::SessionUnavailable(format!("invalid pin {}", pin)));
        };
        let Some(frequency) = validator::non_negative_of(frequency) else {
            return Err(MotorError::SessionUnavailable(format!(
                "invalid frequency {}",
                frequency
            )));
        };

        let handle = hardware.open_pwm(pin, frequency)?;
        debug!(pin, frequency, "PWM session opened");
        Ok(Self {
            hardware,
            handle,
            frequency,
            running: false,
            open: true,
        })
    }

    pub fn pin(&self) -> u32 {
        self.handle.pin()
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Inicia a forma de onda (sem validar o duty cycle)
    pub fn start(&mut self, duty_cycle: f64) -> MotorResult<()> {
        if !self.open {
            return Err(MotorError::SessionUnavailable(format!(
                "session on pin {} is closed",
                self.pin()
            )));
        }
        self.hardware.pwm_start(self.handle, duty_cycle)?;
        self.running = true;
        debug!(pin = self.pin(), duty_cycle, "PWM started");
        Ok(())
    }

    pub fn stop(&mut self) -> MotorResult<()> {
        if !self.running {
            return Ok(());
        }
        self.running = false;
        self.hardware.pwm_stop(self.handle)?;
        debug!(pin = self.pin(), "PWM stopped");
        Ok(())
    }

    pub fn close(&mut self) -> MotorResult<()> {
        if !self.open {
            return Ok(());
        }
        self.stop()?;
        self.open = false;
        self.hardware.release_pwm(self.handle)?;
        debug!(pin = self.pin(), "PWM session closed");
        Ok(())
    }
}

impl Drop for PwmSession<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(pin = self.pin(), %err, "failed to close PWM session");
        }
    }
}
