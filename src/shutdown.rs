//! Shutdown persistence
//!
//! The tracked game registry is saved on every way out of the process: when
//! [`ShutdownGuard`] is dropped at the end of `main` (normal return or error)
//! and, on Unix, when SIGINT or SIGTERM arrives.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{SaveBackupError, SaveBackupResult};
use crate::storage::GameRegistry;

/// Registry shared between the main thread and the signal listener
pub type SharedRegistry = Arc<Mutex<GameRegistry>>;

/// Lock the registry
///
/// A panic while holding the lock leaves the mapping itself intact, so a
/// poisoned lock is recovered rather than reported.
pub fn lock(registry: &Mutex<GameRegistry>) -> MutexGuard<'_, GameRegistry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

fn save_registry(registry: &Mutex<GameRegistry>) {
    let registry = lock(registry);
    match registry.save() {
        Ok(()) => tracing::debug!(count = registry.len(), "saved tracked games on shutdown"),
        Err(e) => {
            tracing::error!(error = %e, "could not save tracked games on shutdown");
            eprintln!("Error: could not save tracked games: {}", e);
        }
    }
}

/// Saves the registry when dropped
pub struct ShutdownGuard {
    registry: SharedRegistry,
}

impl ShutdownGuard {
    /// Create a guard and start listening for termination signals
    pub fn install(registry: SharedRegistry) -> SaveBackupResult<Self> {
        listen_for_signals(Arc::clone(&registry))?;
        Ok(Self { registry })
    }
}

impl Drop for ShutdownGuard {
    fn drop(&mut self) {
        save_registry(&self.registry);
    }
}

#[cfg(unix)]
fn listen_for_signals(registry: SharedRegistry) -> SaveBackupResult<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(|e| {
        SaveBackupError::Io(format!("Failed to register signal handler: {}", e))
    })?;

    std::thread::Builder::new()
        .name("shutdown".into())
        .spawn(move || {
            if let Some(signal) = signals.forever().next() {
                tracing::info!(signal, "termination signal received");
                save_registry(&registry);
                std::process::exit(128 + signal);
            }
        })
        .map_err(|e| SaveBackupError::Io(format!("Failed to start signal listener: {}", e)))?;

    Ok(())
}

#[cfg(not(unix))]
fn listen_for_signals(_registry: SharedRegistry) -> SaveBackupResult<()> {
    tracing::debug!("signal listener not available on this platform");
    Ok(())
}
