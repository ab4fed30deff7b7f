use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Draining,
    Stopped,
}

impl RunState {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => RunState::Running,
            1 => RunState::Draining,
            _ => RunState::Stopped,
        }
    }
}

/// Shared stop flag: `Running -> Draining -> Stopped`, never backwards.
#[derive(Debug, Clone)]
pub struct Interrupt {
    state: Arc<AtomicU8>,
}

impl Default for Interrupt {
    fn default() -> Self {
        Self::new()
    }
}

impl Interrupt {
    pub fn new() -> Self {
        Self {
            state: Arc::new(AtomicU8::new(RunState::Running as u8)),
        }
    }

    pub fn state(&self) -> RunState {
        RunState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn is_running(&self) -> bool {
        self.state() == RunState::Running
    }

    /// Moves `Running` to `Draining`. Returns false if a stop was already
    /// requested.
    pub fn request_stop(&self) -> bool {
        self.state
            .compare_exchange(
                RunState::Running as u8,
                RunState::Draining as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
    }

    pub fn finish(&self) {
        self.state.store(RunState::Stopped as u8, Ordering::SeqCst);
    }

    /// Listens for Ctrl-C for the rest of the process.
    ///
    /// The first signal starts the drain. A second one while still draining
    /// exits with status 130 without saving.
    pub fn listen(&self) {
        let interrupt = self.clone();
        tokio::spawn(async move {
            loop {
                if tokio::signal::ctrl_c().await.is_err() {
                    warn!("could not listen for Ctrl-C");
                    return;
                }
                if interrupt.request_stop() {
                    info!("stopping, waiting for active workers to finish (Ctrl-C again to abort)");
                } else if interrupt.state() == RunState::Draining {
                    warn!("aborting without saving progress");
                    std::process::exit(130);
                }
            }
        });
    }
}
