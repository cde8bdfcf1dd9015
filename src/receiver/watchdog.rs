//! Lock-loss watchdog
//!
//! Counts consecutive recognized sentences that did not yield a locked fix.
//! Once the count passes the threshold the receiver is "poked": the
//! configuration sequence is sent again. This recovers receivers that
//! silently reverted their configuration after a power cycle.

/// What the receiver should do after a sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogAction {
    /// Nothing to do
    Idle,
    /// Re-send the configuration sequence
    Poke,
}

/// Consecutive fixless sentence counter
#[derive(Debug, Clone)]
pub struct LockWatchdog {
    threshold: u32,
    no_lock_count: u32,
}

impl LockWatchdog {
    /// Default number of fixless sentences tolerated before a poke
    pub const DEFAULT_THRESHOLD: u32 = 20;

    pub fn new(threshold: u32) -> Self {
        Self {
            threshold,
            no_lock_count: 0,
        }
    }

    /// Record the lock state after one recognized sentence
    ///
    /// Fires exactly once after `threshold + 1` consecutive fixless
    /// sentences and starts counting again from zero.
    pub fn observe(&mut self, locked: bool) -> WatchdogAction {
        if locked {
            self.no_lock_count = 0;
            return WatchdogAction::Idle;
        }

        self.no_lock_count = self.no_lock_count.saturating_add(1);
        if self.no_lock_count > self.threshold {
            self.no_lock_count = 0;
            WatchdogAction::Poke
        } else {
            WatchdogAction::Idle
        }
    }

    /// Consecutive fixless sentences seen so far
    pub fn count(&self) -> u32 {
        self.no_lock_count
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

impl Default for LockWatchdog {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}
