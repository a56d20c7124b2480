//! Erros do controlador de servo

use thiserror::Error;

pub type MotorResult<T> = Result<T, MotorError>;
pub type HardwareResult<T> = Result<T, HardwareError>;

/// Pino inválido
pub const EPIN: i32 = 10;
/// Frequência inválida
pub const EFREQ: i32 = 11;
/// Duty cycle inválido
pub const EDCYC: i32 = 12;
/// Duração inválida
pub const EDUR: i32 = 13;
/// Especificação combinada inválida
pub const ESPEC: i32 = 14;
/// Falha genérica de sessão/hardware
pub const EFAIL: i32 = -1;

/// Erros do controlador
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MotorError {
    /// Pino rejeitado pelo validador
    #[error("Invalid pin: {0}")]
    InvalidPin(String),

    /// Frequência rejeitada
    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    /// Duty cycle rejeitado
    #[error("Invalid duty cycle: {0}")]
    InvalidDutyCycle(String),

    /// Duração rejeitada
    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    /// Alguma das quatro especificações é inválida
    #[error("Invalid motor specification: {0}")]
    InvalidSpecs(String),

    /// Sessão PWM não pôde ser aberta
    #[error("PWM session unavailable: {0}")]
    SessionUnavailable(String),

    /// Falha reportada pela camada de hardware
    #[error("Hardware failure: {0}")]
    Hardware(#[from] HardwareError),
}

impl MotorError {
    /// Código numérico do erro (contrato com shell/supervisor)
    pub fn code(&self) -> i32 {
        match self {
            MotorError::InvalidPin(_) => EPIN,
            MotorError::InvalidFrequency(_) => EFREQ,
            MotorError::InvalidDutyCycle(_) => EDCYC,
            MotorError::InvalidDuration(_) => EDUR,
            MotorError::InvalidSpecs(_) => ESPEC,
            MotorError::SessionUnavailable(_) | MotorError::Hardware(_) => EFAIL,
        }
    }

    /// Erro de validação (corrigível pelo chamador)?
    pub fn is_validation(&self) -> bool {
        self.code() > 0
    }
}

/// Erros da camada GPIO/PWM
#[derive(Debug, Error, Clone, PartialEq)]
pub enum HardwareError {
    #[error("Pin {0} is not configured as output")]
    PinNotConfigured(u32),

    #[error("Pin {0} already has an open PWM claim")]
    PinClaimed(u32),

    #[error("No PWM claim for pin {0}")]
    UnknownHandle(u32),

    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("GPIO error: {0}")]
    Gpio(String),
}
