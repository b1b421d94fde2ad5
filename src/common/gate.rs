//! Admission control for the accelerator.
//!
//! The gate is a single flag flipped with compare-and-set. A caller either gets a
//! [`GatePermit`] immediately or nothing at all; there is no waiting list. The
//! permit frees the gate when dropped, including during a panic unwind.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone, Debug, Default)]
pub struct GenerationGate {
    busy: Arc<AtomicBool>,
}

impl GenerationGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the gate without blocking. `None` means another job holds it.
    pub fn try_acquire(&self) -> Option<GatePermit> {
        self.busy
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| GatePermit {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Proof of exclusive access. Owned, so it can travel into a blocking worker.
#[must_use = "the gate is released as soon as the permit is dropped"]
#[derive(Debug)]
pub struct GatePermit {
    busy: Arc<AtomicBool>,
}

impl Drop for GatePermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
