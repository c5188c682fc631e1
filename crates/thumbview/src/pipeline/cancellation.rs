//! Cooperative cancellation flag shared by the stages of one run.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Set once by the controller, read by the stages at every per-entry checkpoint.
///
/// Each run gets a fresh token, so cancelling one run can never leak into the next.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let token = CancellationToken::new();
        let stage_view = token.clone();
        assert!(!stage_view.is_cancelled());
        token.request_cancel();
        assert!(stage_view.is_cancelled());
    }

    #[test]
    fn fresh_token_is_independent() {
        let old = CancellationToken::new();
        old.request_cancel();
        let fresh = CancellationToken::new();
        assert!(!fresh.is_cancelled());
    }
}
