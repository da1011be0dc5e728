/// Cooperative stop flag shared between the worker and its controller.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Write-once-to-true flag, polled by the worker at directory and file
/// boundaries. Cloning shares the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the run to stop at its next poll point. Repeated calls are no-ops.
    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
