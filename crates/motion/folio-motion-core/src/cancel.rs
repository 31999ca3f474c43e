//! Scoped cancellation.
//!
//! A [`CancelToken`] is a shared flag handed to everything a section
//! controller starts (its observer binding, timeline and tweens). The
//! controller keeps the [`CancelGuard`]; dropping or unmounting it cancels
//! exactly that section's work and nothing else.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// True when both tokens share the same flag.
    pub fn same_as(&self, other: &CancelToken) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Owns a token and cancels it on drop.
#[derive(Debug, Default)]
pub struct CancelGuard {
    token: CancelToken,
}

impl CancelGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clone of the guarded token for a binding, timeline or tween.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for CancelGuard {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
