use std::sync::atomic::{AtomicBool, Ordering};

/// Single-slot admission guard for backend requests.
///
/// At most one [`PendingPermit`] exists at a time. The slot is released when
/// the permit is dropped, so every exit path of a request (success, failure,
/// early return) clears the pending state.
#[derive(Debug, Default)]
pub struct RequestGuard {
    pending: AtomicBool,
}

impl RequestGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the slot, or returns `None` when a request is already in flight.
    pub fn try_acquire(&self) -> Option<PendingPermit<'_>> {
        self.pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PendingPermit { guard: self })
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

#[derive(Debug)]
pub struct PendingPermit<'a> {
    guard: &'a RequestGuard,
}

impl Drop for PendingPermit<'_> {
    fn drop(&mut self) {
        self.guard.pending.store(false, Ordering::Release);
    }
}
