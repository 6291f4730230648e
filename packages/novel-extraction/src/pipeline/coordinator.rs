//! Run coordination - one active extraction per document.
//!
//! Two runs merging into the same document would interleave writes; the
//! coordinator serializes them. Beginning a new run cancels the previous
//! run's token and then waits for that run to actually finish (release
//! its slot) before handing out a new one.

use std::sync::{Arc, Mutex};

use tokio::sync::OwnedMutexGuard;
use tokio_util::sync::CancellationToken;

/// Serializes extraction runs for one document.
#[derive(Debug)]
pub struct RunCoordinator {
    current: Mutex<CancellationToken>,
    gate: Arc<tokio::sync::Mutex<()>>,
}

impl RunCoordinator {
    /// Create a coordinator with no active run.
    pub fn new() -> Self {
        Self {
            current: Mutex::new(CancellationToken::new()),
            gate: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Begin a new run: cancel the active one (if any), wait for it to
    /// terminate, and return a slot carrying a fresh token.
    ///
    /// Hold the returned [`RunSlot`] for the duration of the run and pass
    /// its token into the run's options.
    pub async fn begin(&self) -> RunSlot {
        let token = {
            let mut current = self.current.lock().expect("coordinator lock poisoned");
            current.cancel();
            *current = CancellationToken::new();
            current.clone()
        };

        // Resolves once the prior run drops its slot.
        let guard = Arc::clone(&self.gate).lock_owned().await;

        RunSlot {
            token,
            _guard: guard,
        }
    }

    /// Cancel the active run without starting a new one.
    pub fn cancel_active(&self) {
        self.current
            .lock()
            .expect("coordinator lock poisoned")
            .cancel();
    }
}

impl Default for RunCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive permission to run, plus the run's cancellation token.
#[derive(Debug)]
pub struct RunSlot {
    /// Token to pass into the run's options
    pub token: CancellationToken,

    _guard: OwnedMutexGuard<()>,
}
