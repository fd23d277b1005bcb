//! Ctrl-C handling.
//!
//! A background thread runs a single-threaded tokio runtime that waits for
//! the interrupt signal and raises a shared flag. The event loop polls the
//! flag between batches, flushes what it has and stops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use tracing::{debug, warn};

/// Shared interruption flag.
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag {
    raised: Arc<AtomicBool>,
}

impl InterruptFlag {
    /// Creates a lowered flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the flag.
    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once the flag has been raised.
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    /// Spawns the listener thread that raises this flag on Ctrl-C.
    ///
    /// Failure to start the listener is logged and the run continues
    /// without interruption support.
    pub fn listen_for_ctrl_c(&self) {
        let flag = self.clone();
        let spawned = thread::Builder::new()
            .name("quench-signal".to_string())
            .spawn(move || {
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(runtime) => runtime,
                    Err(e) => {
                        warn!(error = %e, "Signal runtime unavailable; Ctrl-C will not flush results");
                        return;
                    }
                };
                runtime.block_on(async {
                    match tokio::signal::ctrl_c().await {
                        Ok(()) => {
                            warn!("Interrupt received; finishing the current batch and saving results");
                            flag.raise();
                        }
                        Err(e) => warn!(error = %e, "Failed to listen for Ctrl-C"),
                    }
                });
            });
        match spawned {
            Ok(_) => debug!("Ctrl-C listener started"),
            Err(e) => warn!(error = %e, "Failed to spawn Ctrl-C listener"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let flag = InterruptFlag::new();
        let observer = flag.clone();
        assert!(!observer.is_raised());
        flag.raise();
        assert!(observer.is_raised());
    }
}
