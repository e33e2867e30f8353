//! Page-scoped activation latch.
//!
//! One latch exists per page load. While a guard is alive no other capture
//! agent on the same page can activate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct ActivationLatch {
    active: Arc<AtomicBool>,
}

impl ActivationLatch {
    /// Fresh, released latch, created when the page loads.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the latch. Returns `None` if a capture is already active.
    pub fn try_acquire(&self) -> Option<LatchGuard> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LatchGuard {
                active: Arc::clone(&self.active),
            })
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

/// Releases the latch when dropped, on completion and abort alike.
#[derive(Debug)]
pub struct LatchGuard {
    active: Arc<AtomicBool>,
}

impl Drop for LatchGuard {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_is_refused_until_release() {
        let latch = ActivationLatch::new();
        let guard = latch.try_acquire().expect("first acquire");
        assert!(latch.is_active());
        assert!(latch.try_acquire().is_none());
        drop(guard);
        assert!(!latch.is_active());
        assert!(latch.try_acquire().is_some());
    }

    #[test]
    fn clones_share_state() {
        let latch = ActivationLatch::new();
        let other = latch.clone();
        let _guard = latch.try_acquire().unwrap();
        assert!(other.try_acquire().is_none());
    }
}
