//! Single "operation in flight" flag
//!
//! Transactions are never queued. While one is pending, a second attempt is
//! rejected and the caller is expected to keep its trigger disabled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared in-flight flag, cloned into every component that submits transactions
#[derive(Debug, Clone, Default)]
pub struct InFlight(Arc<AtomicBool>);

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the flag; `None` if another operation already holds it
    pub fn try_begin(&self) -> Option<InFlightGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(Arc::clone(&self.0)))
    }

    /// Whether an operation is pending (drives "Processing..." in the UI)
    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Releases the flag on drop
#[derive(Debug)]
pub struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_claim_rejected() {
        let flag = InFlight::new();
        let guard = flag.try_begin().expect("first claim");
        assert!(flag.is_active());
        assert!(flag.try_begin().is_none());

        // Clones observe the same flag
        let shared = flag.clone();
        assert!(shared.try_begin().is_none());

        drop(guard);
        assert!(!flag.is_active());
        assert!(shared.try_begin().is_some());
    }
}
