//! Tipos de dados do controlador

use std::fmt;
use std::time::Duration;
use serde::{Deserialize, Serialize};

/// Duty cycle fixo aplicado no sentido anti-horário.
///
/// Ignora o duty cycle configurado ou passado na chamada.
pub const COUNTER_CLOCKWISE_DUTY_CYCLE: f64 = 18.0;

/// Valor bruto de uma especificação, antes da conversão.
///
/// Inteiros, reais e texto são aceitos; a conversão para inteiro/real
/// acontece no validador e falhas de conversão contam como valor inválido.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpecValue {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SpecValue {
    /// Converte para inteiro (reais finitos são truncados em direção a zero)
    pub fn to_integer(&self) -> Option<i64> {
        match self {
            SpecValue::Integer(v) => Some(*v),
            SpecValue::Real(v) if v.is_finite() => Some(v.trunc() as i64),
            SpecValue::Real(_) => None,
            SpecValue::Text(s) => s.trim().parse::<i64>().ok(),
        }
    }

    /// Converte para real finito
    pub fn to_real(&self) -> Option<f64> {
        let value = match self {
            SpecValue::Integer(v) => *v as f64,
            SpecValue::Real(v) => *v,
            SpecValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl fmt::Display for SpecValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecValue::Integer(v) => write!(f, "{}", v),
            SpecValue::Real(v) => write!(f, "{}", v),
            SpecValue::Text(s) => write!(f, "{:?}", s),
        }
    }
}

macro_rules! spec_value_from_int {
    ($($t:ty),*) => {
        $(impl From<$t> for SpecValue {
            fn from(v: $t) -> Self {
                SpecValue::Integer(i64::from(v))
            }
        })*
    };
}

spec_value_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<u64> for SpecValue {
    fn from(v: u64) -> Self {
        i64::try_from(v).map_or(SpecValue::Real(v as f64), SpecValue::Integer)
    }
}

impl From<usize> for SpecValue {
    fn from(v: usize) -> Self {
        SpecValue::from(v as u64)
    }
}

impl From<f32> for SpecValue {
    fn from(v: f32) -> Self {
        SpecValue::Real(f64::from(v))
    }
}

impl From<f64> for SpecValue {
    fn from(v: f64) -> Self {
        SpecValue::Real(v)
    }
}

impl From<&str> for SpecValue {
    fn from(v: &str) -> Self {
        SpecValue::Text(v.to_string())
    }
}

impl From<String> for SpecValue {
    fn from(v: String) -> Self {
        SpecValue::Text(v)
    }
}

/// Modo do pino GPIO
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PinMode {
    Input,
    Output,
}

/// Sentido de rotação
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    /// Duty cycle efetivamente aplicado para este sentido
    pub fn duty_cycle(&self, resolved: f64) -> f64 {
        match self {
            Direction::Clockwise => resolved,
            Direction::CounterClockwise => COUNTER_CLOCKWISE_DUTY_CYCLE,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Clockwise => f.write_str("clockwise"),
            Direction::CounterClockwise => f.write_str("counter-clockwise"),
        }
    }
}

/// Conjunto opcional de especificações (pino, frequência, duty cycle, duração).
///
/// Usado tanto na construção do controlador quanto como sobrescrita
/// por chamada; campos ausentes caem para o valor armazenado.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecArgs {
    pub pin: Option<SpecValue>,
    pub frequency: Option<SpecValue>,
    pub duty_cycle: Option<SpecValue>,
    pub duration: Option<SpecValue>,
}

impl SpecArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pin(mut self, value: impl Into<SpecValue>) -> Self {
        self.pin = Some(value.into());
        self
    }

    pub fn frequency(mut self, value: impl Into<SpecValue>) -> Self {
        self.frequency = Some(value.into());
        self
    }

    pub fn duty_cycle(mut self, value: impl Into<SpecValue>) -> Self {
        self.duty_cycle = Some(value.into());
        self
    }

    pub fn duration(mut self, value: impl Into<SpecValue>) -> Self {
        self.duration = Some(value.into());
        self
    }
}

/// Especificações resolvidas e convertidas para um movimento
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveSpecs {
    pub pin: u32,
    pub frequency: f64,
    pub duty_cycle: f64,
    pub duration: Duration,
}
