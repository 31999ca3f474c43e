//! Page scroll lock held while the loader is on screen.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared lock state. The page is locked while any guard is alive.
#[derive(Clone, Debug, Default)]
pub struct ScrollLock(Arc<AtomicUsize>);

impl ScrollLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(&self) -> ScrollLockGuard {
        self.0.fetch_add(1, Ordering::AcqRel);
        ScrollLockGuard { lock: self.clone() }
    }

    pub fn is_locked(&self) -> bool {
        self.0.load(Ordering::Acquire) > 0
    }
}

/// Releases its hold on drop, whichever way the holder goes away.
#[derive(Debug)]
pub struct ScrollLockGuard {
    lock: ScrollLock,
}

impl Drop for ScrollLockGuard {
    fn drop(&mut self) {
        self.lock.0.fetch_sub(1, Ordering::AcqRel);
    }
}
