//! Guarda de ciclo de vida: garante a liberação do hardware ao terminar
//!
//! ```text
//!   Armed ──(sinal | saída)──▶ Triggered ──(release_all)──▶ Terminated
//! ```
//!
//! Os sinais são recebidos por `signal-hook` numa thread dedicada, fora
//! do contexto assíncrono do handler. A liberação roda uma única vez;
//! gatilhos seguintes são ignorados.

use std::ffi::c_int;
use std::io;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use serde::{Deserialize, Serialize};
use signal_hook::consts::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::{Handle, Signals};
use tracing::{debug, info, warn};
use crate::hardware::PwmHardware;

/// Sinais que encerram o processo após liberar o hardware
pub const TERMINATION_SIGNALS: [c_int; 4] = [SIGINT, SIGTERM, SIGHUP, SIGQUIT];

/// Referência não-proprietária à capacidade `release_all` do hardware
#[derive(Clone)]
pub struct ReleaseHandle {
    hardware: Weak<dyn PwmHardware>,
}

impl std::fmt::Debug for ReleaseHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReleaseHandle")
            .field("alive", &(self.hardware.strong_count() > 0))
            .finish()
    }
}

impl ReleaseHandle {
    pub fn new(hardware: Weak<dyn PwmHardware>) -> Self {
        Self { hardware }
    }

    /// Libera todas as reservas; `false` se o hardware já foi descartado
    pub fn release(&self) -> bool {
        match self.hardware.upgrade() {
            Some(hardware) => {
                hardware.release_all();
                true
            }
            None => false,
        }
    }
}

/// Estado do guarda (sem transições de volta)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum GuardState {
    Armed = 0,
    Triggered = 1,
    Terminated = 2,
}

impl GuardState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => GuardState::Armed,
            1 => GuardState::Triggered,
            _ => GuardState::Terminated,
        }
    }
}

/// Causa do encerramento
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    /// Sinal do sistema operacional (número do sinal)
    Signal(i32),
    /// Saída normal do processo (código natural)
    Exit(i32),
}

impl Trigger {
    /// Código de saída correspondente
    pub fn status(&self) -> i32 {
        match self {
            Trigger::Signal(signum) => *signum,
            Trigger::Exit(code) => *code,
        }
    }
}

type Terminator = Box<dyn Fn(i32) + Send + Sync>;

struct GuardCore {
    state: AtomicU8,
    release: ReleaseHandle,
    terminate: Terminator,
}

impl GuardCore {
    fn trigger(&self, trigger: Trigger) -> bool {
        let armed = self.state.compare_exchange(
            GuardState::Armed as u8,
            GuardState::Triggered as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        if armed.is_err() {
            debug!(?trigger, "lifecycle guard already triggered");
            return false;
        }

        warn!(?trigger, "forcing hardware release");
        if !self.release.release() {
            debug!("hardware already dropped, nothing to release");
        }
        self.state.store(GuardState::Terminated as u8, Ordering::Release);

        let status = trigger.status();
        match trigger {
            Trigger::Signal(_) => {
                info!(status, "terminating after hardware release");
                (self.terminate)(status);
            }
            Trigger::Exit(_) => info!(status, "hardware released at exit"),
        }
        true
    }
}

/// Guarda explícito, criado pelo ponto de entrada com a capacidade de
/// liberação do controlador.
///
/// Descartar o guarda equivale à saída normal do processo.
pub struct LifecycleGuard {
    core: Arc<GuardCore>,
    listener: Option<(Handle, JoinHandle<()>)>,
}

impl std::fmt::Debug for LifecycleGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleGuard")
            .field("state", &self.state())
            .field("listening", &self.listener.is_some())
            .finish()
    }
}

impl LifecycleGuard {
    /// Guarda armado que encerra o processo com o número do sinal
    pub fn new(release: ReleaseHandle) -> Self {
        Self::with_terminator(release, |status| {
            std::process::exit(status);
        })
    }

    /// Guarda com encerramento customizado (testes, supervisores)
    pub fn with_terminator(
        release: ReleaseHandle,
        terminate: impl Fn(i32) + Send + Sync + 'static,
    ) -> Self {
        Self {
            core: Arc::new(GuardCore {
                state: AtomicU8::new(GuardState::Armed as u8),
                release,
                terminate: Box::new(terminate),
            }),
            listener: None,
        }
    }

    /// Cria o guarda e registra os sinais de término
    pub fn install(release: ReleaseHandle) -> io::Result<Self> {
        let mut guard = Self::new(release);
        guard.listen()?;
        Ok(guard)
    }

    /// Registra SIGINT, SIGTERM, SIGHUP e SIGQUIT
    pub fn listen(&mut self) -> io::Result<()> {
        if self.listener.is_some() {
            return Ok(());
        }

        let mut signals = Signals::new(TERMINATION_SIGNALS)?;
        let handle = signals.handle();
        let core = Arc::clone(&self.core);
        let thread = thread::Builder::new()
            .name("servo-lifecycle".into())
            .spawn(move || {
                for signum in signals.forever() {
                    core.trigger(Trigger::Signal(signum));
                }
            })?;

        debug!(signals = ?TERMINATION_SIGNALS, "lifecycle guard listening");
        self.listener = Some((handle, thread));
        Ok(())
    }

    pub fn state(&self) -> GuardState {
        GuardState::from_u8(self.core.state.load(Ordering::Acquire))
    }

    /// Dispara o guarda; `true` se esta chamada fez a liberação
    pub fn trigger(&self, trigger: Trigger) -> bool {
        self.core.trigger(trigger)
    }

    /// Saída normal com o código final do processo; devolve o código
    pub fn finish(self, status: i32) -> i32 {
        self.core.trigger(Trigger::Exit(status));
        status
    }
}

impl Drop for LifecycleGuard {
    fn drop(&mut self) {
        self.core.trigger(Trigger::Exit(0));
        if let Some((handle, thread)) = self.listener.take() {
            handle.close();
            if thread.join().is_err() {
                warn!("lifecycle signal thread panicked");
            }
        }
    }
}
