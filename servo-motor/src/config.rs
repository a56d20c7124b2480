//! Configuração persistente do motor (pino, frequência, duty cycle, duração)

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use crate::error::{MotorError, MotorResult};
use crate::types::SpecValue;
use crate::validator;

/// Frequência padrão (Hz)
pub const DEFAULT_FREQUENCY: f64 = 50.0;
/// Duty cycle padrão (pulsos/ciclo)
pub const DEFAULT_DUTY_CYCLE: f64 = 2.0;
/// Duração padrão (s)
pub const DEFAULT_DURATION: f64 = 0.0;

/// Especificações armazenadas do motor.
///
/// Só muda via setters validados: valor rejeitado nunca altera o estado.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorConfig {
    /// Pino BCM (`None` enquanto não definido)
    pin: Option<u32>,
    /// Frequência (Hz)
    frequency: f64,
    /// Duty cycle (pulsos/ciclo)
    duty_cycle: f64,
    /// Duração do movimento (s)
    duration: f64,
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            pin: None,
            frequency: DEFAULT_FREQUENCY,
            duty_cycle: DEFAULT_DUTY_CYCLE,
            duration: DEFAULT_DURATION,
        }
    }
}

impl MotorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pin(&mut self, value: impl Into<SpecValue>) -> MotorResult<()> {
        let value = value.into();
        let Some(pin) = validator::pin_of(&value) else {
            warn!(%value, "rejected pin");
            return Err(MotorError::InvalidPin(value.to_string()));
        };
        debug!(pin, "pin set");
        self.pin = Some(pin);
        Ok(())
    }

    pub fn set_frequency(&mut self, value: impl Into<SpecValue>) -> MotorResult<()> {
        let value = value.into();
        let Some(frequency) = validator::non_negative_of(&value) else {
            warn!(%value, "rejected frequency");
            return Err(MotorError::InvalidFrequency(value.to_string()));
        };
        debug!(frequency, "frequency set");
        self.frequency = frequency;
        Ok(())
    }

    pub fn set_duty_cycle(&mut self, value: impl Into<SpecValue>) -> MotorResult<()> {
        let value = value.into();
        let Some(duty_cycle) = validator::non_negative_of(&value) else {
            warn!(%value, "rejected duty cycle");
            return Err(MotorError::InvalidDutyCycle(value.to_string()));
        };
        debug!(duty_cycle, "duty cycle set");
        self.duty_cycle = duty_cycle;
        Ok(())
    }

    pub fn set_duration(&mut self, value: impl Into<SpecValue>) -> MotorResult<()> {
        let value = value.into();
        let Some(duration) = validator::duration_of(&value) else {
            warn!(%value, "rejected duration");
            return Err(MotorError::InvalidDuration(value.to_string()));
        };
        debug!(?duration, "duration set");
        self.duration = duration.as_secs_f64();
        Ok(())
    }

    /// Define as quatro especificações de forma atômica
    pub fn set_specs(
        &mut self,
        pin: impl Into<SpecValue>,
        frequency: impl Into<SpecValue>,
        duty_cycle: impl Into<SpecValue>,
        duration: impl Into<SpecValue>,
    ) -> MotorResult<()> {
        let (pin, frequency, duty_cycle, duration) =
            (pin.into(), frequency.into(), duty_cycle.into(), duration.into());

        if !validator::is_valid_specs(&pin, &frequency, &duty_cycle, &duration) {
            return Err(MotorError::InvalidSpecs(format!(
                "pin={}, frequency={}, duty_cycle={}, duration={}",
                pin, frequency, duty_cycle, duration
            )));
        }

        // Já validados: os setters individuais não falham aqui
        self.set_pin(pin)?;
        self.set_frequency(frequency)?;
        self.set_duty_cycle(duty_cycle)?;
        self.set_duration(duration)?;
        Ok(())
    }

    pub fn pin(&self) -> Option<u32> {
        self.pin
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn duty_cycle(&self) -> f64 {
        self.duty_cycle
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = MotorConfig::new();
        assert_eq!(config.pin(), None);
        assert_eq!(config.frequency(), 50.0);
        assert_eq!(config.duty_cycle(), 2.0);
        assert_eq!(config.duration(), 0.0);
    }

    #[test]
    fn test_set_pin() {
        let mut config = MotorConfig::new();
        assert!(config.set_pin(17).is_ok());
        assert_eq!(config.pin(), Some(17));

        let err = config.set_pin(0).unwrap_err();
        assert_eq!(err.code(), 10);
        assert_eq!(config.pin(), Some(17));

        assert!(config.set_pin("abc").is_err());
        assert_eq!(config.pin(), Some(17));
    }

    #[test]
    fn test_set_pin_converts() {
        let mut config = MotorConfig::new();
        config.set_pin(" 22 ").unwrap();
        assert_eq!(config.pin(), Some(22));
        config.set_pin(18.7).unwrap();
        assert_eq!(config.pin(), Some(18));
    }

    #[test]
    fn test_set_frequency() {
        let mut config = MotorConfig::new();
        config.set_frequency(100).unwrap();
        assert_eq!(config.frequency(), 100.0);

        assert_eq!(config.set_frequency(-1.0).unwrap_err().code(), 11);
        assert_eq!(config.frequency(), 100.0);
    }

    #[test]
    fn test_set_duty_cycle() {
        let mut config = MotorConfig::new();
        config.set_duty_cycle("7.5").unwrap();
        assert_eq!(config.duty_cycle(), 7.5);

        assert_eq!(config.set_duty_cycle("half").unwrap_err().code(), 12);
        assert_eq!(config.duty_cycle(), 7.5);
    }

    #[test]
    fn test_set_duration() {
        let mut config = MotorConfig::new();
        config.set_duration(0.25).unwrap();
        assert_eq!(config.duration(), 0.25);

        assert_eq!(config.set_duration(-0.25).unwrap_err().code(), 13);
        assert_eq!(config.duration(), 0.25);
    }

    #[test]
    fn test_set_duration_unrepresentable() {
        let mut config = MotorConfig::new();
        config.set_duration(1).unwrap();
        assert_eq!(config.set_duration(1e20).unwrap_err().code(), 13);
        assert_eq!(config.set_duration(f64::INFINITY).unwrap_err().code(), 13);
        assert_eq!(config.duration(), 1.0);
    }

    #[test]
    fn test_setter_idempotent() {
        let mut config = MotorConfig::new();
        config.set_duty_cycle(7.5).unwrap();
        let snapshot = config.clone();
        config.set_duty_cycle(7.5).unwrap();
        assert_eq!(config, snapshot);
    }

    #[test]
    fn test_set_specs_valid() {
        let mut config = MotorConfig::new();
        config.set_specs(17, 60, 7.5, 1).unwrap();
        assert_eq!(config.pin(), Some(17));
        assert_eq!(config.frequency(), 60.0);
        assert_eq!(config.duty_cycle(), 7.5);
        assert_eq!(config.duration(), 1.0);
    }

    #[test]
    fn test_set_specs_atomic() {
        let mut config = MotorConfig::new();
        config.set_specs(17, 50, 7.5, 0.5).unwrap();
        let before = config.clone();

        let bad = [
            config.set_specs(0, 60, 8.0, 1.0),
            config.set_specs(18, -60, 8.0, 1.0),
            config.set_specs(18, 60, "x", 1.0),
            config.set_specs(18, 60, 8.0, -1.0),
        ];
        for result in bad {
            assert_eq!(result.unwrap_err().code(), 14);
        }
        assert_eq!(config, before);
    }

    #[test]
    fn test_config_serde() {
        let mut config = MotorConfig::new();
        config.set_pin(17).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"pin\":17"));
        let back: MotorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
