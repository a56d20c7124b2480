//! Controlador de servo: configuração + movimentos horário/anti-horário

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use tracing::{error, info, warn};
use crate::config::MotorConfig;
use crate::error::{MotorError, MotorResult};
use crate::guard::ReleaseHandle;
use crate::hardware::PwmHardware;
use crate::session::PwmSession;
use crate::types::{Direction, EffectiveSpecs, PinMode, SpecArgs, SpecValue};
use crate::validator;

/// Valor usado para pino não definido
const UNSET_PIN: i64 = -1;

/// Servo motor concreto.
///
/// Dono exclusivo da [`MotorConfig`]; cada movimento abre, dirige e
/// libera a sua própria [`PwmSession`].
pub struct ServoMotor {
    hardware: Arc<dyn PwmHardware>,
    config: MotorConfig,
    /// Pinos já configurados como saída
    output_pins: HashSet<u32>,
}

impl std::fmt::Debug for ServoMotor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServoMotor")
            .field("config", &self.config)
            .field("output_pins", &self.output_pins)
            .finish()
    }
}

impl ServoMotor {
    /// Cria o controlador validando as especificações iniciais.
    ///
    /// Falha com o código do primeiro campo inválido, na ordem
    /// pino, frequência, duty cycle, duração. Um pino válido é
    /// configurado como saída.
    pub fn new(hardware: Arc<dyn PwmHardware>, specs: SpecArgs) -> MotorResult<Self> {
        let mut motor = Self::with_defaults(hardware);

        if let Some(pin) = specs.pin {
            motor.config.set_pin(pin)?;
            if let Some(pin) = motor.config.pin() {
                motor.setup_pin(pin, PinMode::Output)?;
            }
        }
        if let Some(frequency) = specs.frequency {
            motor.config.set_frequency(frequency)?;
        }
        if let Some(duty_cycle) = specs.duty_cycle {
            motor.config.set_duty_cycle(duty_cycle)?;
        }
        if let Some(duration) = specs.duration {
            motor.config.set_duration(duration)?;
        }

        Ok(motor)
    }

    /// Controlador com configuração padrão (pino indefinido)
    pub fn with_defaults(hardware: Arc<dyn PwmHardware>) -> Self {
        Self {
            hardware,
            config: MotorConfig::default(),
            output_pins: HashSet::new(),
        }
    }

    /// Referência não-proprietária para liberação de emergência
    pub fn release_handle(&self) -> ReleaseHandle {
        ReleaseHandle::new(Arc::downgrade(&self.hardware))
    }

    pub fn config(&self) -> &MotorConfig {
        &self.config
    }

    pub fn pin(&self) -> Option<u32> {
        self.config.pin()
    }

    pub fn frequency(&self) -> f64 {
        self.config.frequency()
    }

    pub fn duty_cycle(&self) -> f64 {
        self.config.duty_cycle()
    }

    pub fn duration(&self) -> f64 {
        self.config.duration()
    }

    pub fn set_pin(&mut self, value: impl Into<SpecValue>) -> MotorResult<()> {
        self.config.set_pin(value)
    }

    pub fn set_frequency(&mut self, value: impl Into<SpecValue>) -> MotorResult<()> {
        self.config.set_frequency(value)
    }

    pub fn set_duty_cycle(&mut self, value: impl Into<SpecValue>) -> MotorResult<()> {
        self.config.set_duty_cycle(value)
    }

    pub fn set_duration(&mut self, value: impl Into<SpecValue>) -> MotorResult<()> {
        self.config.set_duration(value)
    }

    pub fn set_specs(
        &mut self,
        pin: impl Into<SpecValue>,
        frequency: impl Into<SpecValue>,
        duty_cycle: impl Into<SpecValue>,
        duration: impl Into<SpecValue>,
    ) -> MotorResult<()> {
        self.config.set_specs(pin, frequency, duty_cycle, duration)
    }

    /// Configura o modo de um pino no hardware
    pub fn setup_pin(&mut self, pin: impl Into<SpecValue>, mode: PinMode) -> MotorResult<()> {
        let pin = pin.into();
        let Some(pin) = validator::pin_of(&pin) else {
            return Err(MotorError::InvalidPin(pin.to_string()));
        };

        self.hardware.configure_pin_mode(pin, mode)?;
        match mode {
            PinMode::Output => self.output_pins.insert(pin),
            PinMode::Input => self.output_pins.remove(&pin),
        };
        Ok(())
    }

    /// Abre uma sessão PWM; parâmetros ausentes vêm da configuração
    pub fn setup_pwm(
        &mut self,
        pin: Option<SpecValue>,
        frequency: Option<SpecValue>,
    ) -> MotorResult<PwmSession<'_>> {
        let pin = pin.unwrap_or_else(|| self.stored_pin());
        let frequency = frequency.unwrap_or(SpecValue::Real(self.config.frequency()));

        if let Some(bcm) = validator::pin_of(&pin) {
            self.ensure_output(bcm)?;
        }
        PwmSession::open(self.hardware.as_ref(), &pin, &frequency)
    }

    pub fn turn_clockwise(&mut self, overrides: SpecArgs) -> MotorResult<EffectiveSpecs> {
        self.turn(Direction::Clockwise, overrides)
    }

    pub fn turn_counter_clockwise(&mut self, overrides: SpecArgs) -> MotorResult<EffectiveSpecs> {
        self.turn(Direction::CounterClockwise, overrides)
    }

    /// Executa um movimento completo, bloqueando pela duração.
    ///
    /// Retorna as especificações aplicadas (com o duty cycle efetivo
    /// do sentido escolhido).
    pub fn turn(&mut self, direction: Direction, overrides: SpecArgs) -> MotorResult<EffectiveSpecs> {
        let (pin, frequency, duty_cycle, duration) = self.resolve(overrides);

        let checked = validator::is_valid_specs(&pin, &frequency, &duty_cycle, &duration)
            .then(|| validator::non_negative_of(&duty_cycle).zip(validator::duration_of(&duration)))
            .flatten();
        let Some((duty, hold)) = checked else {
            warn!(%direction, %pin, %frequency, %duty_cycle, %duration, "motion rejected");
            return Err(MotorError::InvalidSpecs(format!(
                "pin={}, frequency={}, duty_cycle={}, duration={}",
                pin, frequency, duty_cycle, duration
            )));
        };

        let mut session = self.setup_pwm(Some(pin), Some(frequency)).inspect_err(|err| {
            error!(%direction, %err, "could not open PWM session");
        })?;

        let specs = EffectiveSpecs {
            pin: session.pin(),
            frequency: session.frequency(),
            duty_cycle: direction.duty_cycle(duty),
            duration: hold,
        };

        info!(
            %direction,
            pin = specs.pin,
            frequency = specs.frequency,
            duty_cycle = specs.duty_cycle,
            duration_s = specs.duration.as_secs_f64(),
            "motion started"
        );
        session.start(specs.duty_cycle)?;
        thread::sleep(specs.duration);
        session.stop()?;
        session.close()?;
        info!(%direction, pin = specs.pin, "motion finished");

        Ok(specs)
    }

    /// Parâmetros efetivos: sobrescrita da chamada ou valor armazenado
    fn resolve(&self, overrides: SpecArgs) -> (SpecValue, SpecValue, SpecValue, SpecValue) {
        (
            overrides.pin.unwrap_or_else(|| self.stored_pin()),
            overrides
                .frequency
                .unwrap_or(SpecValue::Real(self.config.frequency())),
            overrides
                .duty_cycle
                .unwrap_or(SpecValue::Real(self.config.duty_cycle())),
            overrides
                .duration
                .unwrap_or(SpecValue::Real(self.config.duration())),
        )
    }

    fn stored_pin(&self) -> SpecValue {
        SpecValue::Integer(self.config.pin().map_or(UNSET_PIN, i64::from))
    }

    fn ensure_output(&mut self, pin: u32) -> MotorResult<()> {
        if self.output_pins.contains(&pin) {
            return Ok(());
        }
        self.setup_pin(pin, PinMode::Output)
    }
}
