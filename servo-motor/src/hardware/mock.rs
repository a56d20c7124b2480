//! Hardware simulado: registra cada chamada para inspeção em testes

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use serde::{Deserialize, Serialize};
use tracing::debug;
use crate::error::{HardwareError, HardwareResult};
use crate::hardware::{PwmHandle, PwmHardware};
use crate::types::PinMode;

/// Chamada registrada pelo hardware simulado
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HardwareEvent {
    ConfigurePin { pin: u32, mode: PinMode },
    Open { pin: u32, frequency: f64 },
    Start { pin: u32, duty_cycle: f64 },
    Stop { pin: u32 },
    Release { pin: u32 },
    ReleaseAll,
}

#[derive(Debug, Clone, Copy)]
struct Claim {
    frequency: f64,
    running: bool,
}

#[derive(Debug, Default)]
struct MockState {
    modes: HashMap<u32, PinMode>,
    claims: HashMap<u32, Claim>,
    events: Vec<HardwareEvent>,
    fail_open: bool,
    max_duty_cycle: Option<f64>,
}

/// Implementação em memória de [`PwmHardware`]
#[derive(Debug, Default)]
pub struct MockPwm {
    state: Mutex<MockState>,
}

impl MockPwm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejeita duty cycles acima do limite, como um driver real faria
    pub fn with_duty_limit(max_duty_cycle: f64) -> Self {
        let mock = Self::new();
        mock.lock().max_duty_cycle = Some(max_duty_cycle);
        mock
    }

    /// Faz `open_pwm` falhar (simula driver indisponível)
    pub fn set_fail_open(&self, fail: bool) {
        self.lock().fail_open = fail;
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Todas as chamadas registradas, em ordem
    pub fn events(&self) -> Vec<HardwareEvent> {
        self.lock().events.clone()
    }

    /// Descarta o histórico de chamadas (reservas e modos permanecem)
    pub fn clear_events(&self) {
        self.lock().events.clear();
    }

    /// Duty cycles passados a `pwm_start`, com o pino
    pub fn starts(&self) -> Vec<(u32, f64)> {
        self.lock()
            .events
            .iter()
            .filter_map(|e| match e {
                HardwareEvent::Start { pin, duty_cycle } => Some((*pin, *duty_cycle)),
                _ => None,
            })
            .collect()
    }

    pub fn stop_count(&self) -> usize {
        self.count(|e| matches!(e, HardwareEvent::Stop { .. }))
    }

    pub fn release_all_count(&self) -> usize {
        self.count(|e| matches!(e, HardwareEvent::ReleaseAll))
    }

    fn count(&self, pred: impl Fn(&HardwareEvent) -> bool) -> usize {
        self.lock().events.iter().filter(|e| pred(*e)).count()
    }

    pub fn is_claimed(&self, pin: u32) -> bool {
        self.lock().claims.contains_key(&pin)
    }

    pub fn is_running(&self, pin: u32) -> bool {
        self.lock().claims.get(&pin).is_some_and(|c| c.running)
    }

    /// Frequência da reserva aberta no pino
    pub fn claim_frequency(&self, pin: u32) -> Option<f64> {
        self.lock().claims.get(&pin).map(|c| c.frequency)
    }

    pub fn pin_mode(&self, pin: u32) -> Option<PinMode> {
        self.lock().modes.get(&pin).copied()
    }
}

impl PwmHardware for MockPwm {
    fn configure_pin_mode(&self, pin: u32, mode: PinMode) -> HardwareResult<()> {
        let mut state = self.lock();
        state.modes.insert(pin, mode);
        state.events.push(HardwareEvent::ConfigurePin { pin, mode });
        Ok(())
    }

    fn open_pwm(&self, pin: u32, frequency: f64) -> HardwareResult<PwmHandle> {
        let mut state = self.lock();
        if state.fail_open {
            return Err(HardwareError::Gpio(format!("cannot open PWM on pin {}", pin)));
        }
        if state.modes.get(&pin) != Some(&PinMode::Output) {
            return Err(HardwareError::PinNotConfigured(pin));
        }
        if state.claims.contains_key(&pin) {
            return Err(HardwareError::PinClaimed(pin));
        }

        state.claims.insert(pin, Claim { frequency, running: false });
        state.events.push(HardwareEvent::Open { pin, frequency });
        debug!(pin, frequency, "mock PWM opened");
        Ok(PwmHandle::new(pin))
    }

    fn pwm_start(&self, handle: PwmHandle, duty_cycle: f64) -> HardwareResult<()> {
        let mut state = self.lock();
        let pin = handle.pin();
        if let Some(max) = state.max_duty_cycle {
            if duty_cycle > max {
                return Err(HardwareError::OutOfRange(format!(
                    "duty cycle {} above {}",
                    duty_cycle, max
                )));
            }
        }
        let claim = state
            .claims
            .get_mut(&pin)
            .ok_or(HardwareError::UnknownHandle(pin))?;
        claim.running = true;
        state.events.push(HardwareEvent::Start { pin, duty_cycle });
        Ok(())
    }

    fn pwm_stop(&self, handle: PwmHandle) -> HardwareResult<()> {
        let mut state = self.lock();
        let pin = handle.pin();
        // Reserva já liberada (ex.: release_all) ou parada: nada a fazer
        let was_running = state
            .claims
            .get_mut(&pin)
            .is_some_and(|claim| std::mem::replace(&mut claim.running, false));
        if was_running {
            state.events.push(HardwareEvent::Stop { pin });
        }
        Ok(())
    }

    fn release_pwm(&self, handle: PwmHandle) -> HardwareResult<()> {
        let mut state = self.lock();
        let pin = handle.pin();
        if state.claims.remove(&pin).is_some() {
            state.events.push(HardwareEvent::Release { pin });
        }
        Ok(())
    }

    fn release_all(&self) {
        let mut state = self.lock();
        state.claims.clear();
        state.modes.clear();
        state.events.push(HardwareEvent::ReleaseAll);
    }
}
