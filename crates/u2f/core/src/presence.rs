//! User presence signal.
//!
//! Written from the physical interaction context (button interrupt, polling
//! loop), read and consumed from the command processing context. A second
//! assertion before consumption is simply overwritten; assertions do not
//! accumulate.

use std::sync::atomic::{AtomicBool, Ordering};

/// Single-word presence flag shared between execution contexts
#[derive(Debug, Default)]
pub struct PresenceSignal {
    pressed: AtomicBool,
}

impl PresenceSignal {
    /// Create an unasserted signal
    pub const fn new() -> Self {
        Self {
            pressed: AtomicBool::new(false),
        }
    }

    /// Record a physical interaction
    pub fn assert(&self) {
        self.pressed.store(true, Ordering::Release);
    }

    /// Drop any pending interaction
    pub fn clear(&self) {
        self.pressed.store(false, Ordering::Release);
    }

    /// Whether an interaction is pending
    pub fn is_asserted(&self) -> bool {
        self.pressed.load(Ordering::Acquire)
    }

    /// Consume a pending interaction, returning whether there was one
    pub fn take(&self) -> bool {
        self.pressed.swap(false, Ordering::AcqRel)
    }
}
