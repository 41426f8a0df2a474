//! Clock Module
//!
//! Monotonic millisecond clocks used to stamp and expire cache entries.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

// == Clock Trait ==
/// Source of monotonic time, in milliseconds since an arbitrary origin.
pub trait Clock: Send + Sync + Debug {
    /// Returns the current time in milliseconds.
    fn now_ms(&self) -> u64;
}

// == System Clock ==
/// Clock backed by `Instant`, anchored at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

// == Manual Clock ==
/// Clock that only moves when told to. Used to drive expiry deterministically.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
