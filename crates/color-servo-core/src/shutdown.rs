use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Clonable handle for requesting a clean stop of the control loop.
///
/// The host typically wires one clone into a Ctrl-C handler; the tracker
/// polls another every frame and short-circuits to a terminate outcome.
/// Once requested, the flag never clears for the lifetime of the session.
#[derive(Clone, Debug, Default)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_requested(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
