//! # 🦾 servo-motor — Controle de servo via PWM
//!
//! Configura e dirige um servo motor por PWM num pino GPIO, garantindo
//! que o hardware volte a um estado seguro quando o processo termina,
//! seja normalmente ou por sinal.
//!
//! ## Arquitetura
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 ServoMotor                   │
//! │  turn_clockwise / turn_counter_clockwise     │
//! │  ┌────────────┐  ┌────────────┐              │
//! │  │ MotorConfig│  │ validator  │              │
//! │  └────────────┘  └────────────┘              │
//! │         ↓ abre / dirige / libera             │
//! │  ┌──────────────────────────────────────┐    │
//! │  │            PwmSession                │    │
//! │  └──────────────────────────────────────┘    │
//! └──────────────────────────────────────────────┘
//!                    ↓                 ↑ release_all
//!          PwmHardware (mock | rppal)  │
//!                                LifecycleGuard ◀── SIGINT/TERM/HUP/QUIT
//! ```
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use std::sync::Arc;
//! use servo_motor::{MockPwm, ServoMotor, SpecArgs};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let hardware = Arc::new(MockPwm::new());
//! let mut servo = ServoMotor::new(hardware.clone(), SpecArgs::new().pin(17))?;
//!
//! servo.turn_clockwise(SpecArgs::new().duration(0.01).duty_cycle(7.5))?;
//! assert_eq!(hardware.starts(), vec![(17, 7.5)]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Códigos de erro
//!
//! | Código | Significado |
//! |--------|-------------|
//! | 10 | pino inválido |
//! | 11 | frequência inválida |
//! | 12 | duty cycle inválido |
//! | 13 | duração inválida |
//! | 14 | especificação combinada inválida |
//! | -1 | sessão PWM indisponível / falha de hardware |
//!
//! O sentido anti-horário sempre usa duty cycle 18, ignorando o valor
//! configurado.

pub mod error;
pub mod types;
pub mod validator;
pub mod config;
pub mod hardware;
pub mod session;
pub mod controller;
pub mod guard;

pub use error::{HardwareError, HardwareResult, MotorError, MotorResult};
pub use error::{EDCYC, EDUR, EFAIL, EFREQ, EPIN, ESPEC};
pub use types::{Direction, EffectiveSpecs, PinMode, SpecArgs, SpecValue, COUNTER_CLOCKWISE_DUTY_CYCLE};
pub use config::MotorConfig;
pub use hardware::{HardwareEvent, MockPwm, PwmHandle, PwmHardware};
#[cfg(feature = "rpi")]
pub use hardware::RpiPwm;
pub use session::PwmSession;
pub use controller::ServoMotor;
pub use guard::{GuardState, LifecycleGuard, ReleaseHandle, Trigger, TERMINATION_SIGNALS};

#[cfg(test)]
mod tests;
