//! Invocation counter shared by every plain-HTTP request.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic counter handing out one id per plain-HTTP invocation.
///
/// Clones share the same underlying value. `fetch_add` makes ids distinct
/// and gapless even when requests race.
#[derive(Debug, Clone, Default)]
pub struct SharedCounter {
    value: Arc<AtomicU64>,
}

impl SharedCounter {
    /// Create a counter starting at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment and return the pre-increment value.
    pub fn next(&self) -> u64 {
        self.value.fetch_add(1, Ordering::SeqCst)
    }

    /// Number of ids handed out so far.
    pub fn current(&self) -> u64 {
        self.value.load(Ordering::SeqCst)
    }
}
