//! Validação das especificações físicas do motor
//!
//! Predicados puros, sem estado: nunca falham, uma conversão impossível
//! conta como valor inválido.

use std::time::Duration;
use crate::types::SpecValue;

/// Pino convertido, se válido (inteiro estritamente positivo)
pub fn pin_of(value: &SpecValue) -> Option<u32> {
    value
        .to_integer()
        .filter(|pin| *pin > 0)
        .and_then(|pin| u32::try_from(pin).ok())
}

/// Real não negativo, se válido
pub fn non_negative_of(value: &SpecValue) -> Option<f64> {
    value.to_real().filter(|v| *v >= 0.0)
}

/// Duração convertida, se válida (não negativa e representável)
pub fn duration_of(value: &SpecValue) -> Option<Duration> {
    non_negative_of(value).and_then(|secs| Duration::try_from_secs_f64(secs).ok())
}

pub fn is_valid_pin(value: &SpecValue) -> bool {
    pin_of(value).is_some()
}

pub fn is_valid_frequency(value: &SpecValue) -> bool {
    non_negative_of(value).is_some()
}

pub fn is_valid_duty_cycle(value: &SpecValue) -> bool {
    non_negative_of(value).is_some()
}

pub fn is_valid_duration(value: &SpecValue) -> bool {
    duration_of(value).is_some()
}

/// Conjunção dos quatro predicados, parando no primeiro inválido
pub fn is_valid_specs(
    pin: &SpecValue,
    frequency: &SpecValue,
    duty_cycle: &SpecValue,
    duration: &SpecValue,
) -> bool {
    is_valid_pin(pin)
        && is_valid_frequency(frequency)
        && is_valid_duty_cycle(duty_cycle)
        && is_valid_duration(duration)
}
