//! Cooperative interruption for long-running generators.
//!
//! Interruption is advisory: the grid generators poll once per output row
//! and stop writing at a row boundary. A batch whose generation was
//! interrupted is never partially valid; the caller discards it entirely.
//! The wiring stages themselves do not poll (they are assumed short enough
//! to run to completion), so callers chaining generator → wiring must check
//! the flag between the two.

use std::sync::atomic::{AtomicBool, Ordering};

/// Advisory interruption poll.
pub trait InterruptPoll: Sync {
    /// Returns `true` once the caller has requested the work be abandoned.
    fn interrupted(&self) -> bool;
}

/// No-op poll for callers without an interrupt source.
#[derive(Copy, Clone, Debug, Default)]
pub struct NeverInterrupted;

impl InterruptPoll for NeverInterrupted {
    #[inline]
    fn interrupted(&self) -> bool {
        false
    }
}

/// Shared boolean flag, settable from any thread.
#[derive(Debug, Default)]
pub struct InterruptFlag(AtomicBool);

impl InterruptFlag {
    pub fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    /// Request that in-flight generation stop at the next row boundary.
    pub fn request(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Reset the flag so the source can be reused for another operation.
    pub fn clear(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

impl InterruptPoll for InterruptFlag {
    #[inline]
    fn interrupted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl<T: InterruptPoll + ?Sized> InterruptPoll for &T {
    #[inline]
    fn interrupted(&self) -> bool {
        (**self).interrupted()
    }
}
