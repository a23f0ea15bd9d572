//! Reply registry counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Running totals of registry transitions.
#[derive(Debug, Default)]
pub struct ReplyStats {
    registered: AtomicU64,
    answered: AtomicU64,
    superseded: AtomicU64,
    cancelled: AtomicU64,
    missed: AtomicU64,
}

impl ReplyStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_registered(&self) {
        self.registered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_answered(&self) {
        self.answered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_superseded(&self) {
        self.superseded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cancelled(&self, count: u64) {
        self.cancelled.fetch_add(count, Ordering::Relaxed);
    }

    /// A response arrived for a key with nothing pending.
    pub(crate) fn record_missed(&self) {
        self.missed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of the counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            registered: self.registered.load(Ordering::Relaxed),
            answered: self.answered.load(Ordering::Relaxed),
            superseded: self.superseded.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            missed: self.missed.load(Ordering::Relaxed),
        }
    }
}

/// Counters at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub registered: u64,
    pub answered: u64,
    pub superseded: u64,
    pub cancelled: u64,
    pub missed: u64,
}

impl StatsSnapshot {
    /// Registrations that have been resolved one way or another.
    pub fn resolved(&self) -> u64 {
        self.answered + self.superseded + self.cancelled
    }

    /// Registrations still waiting, as far as the counters can tell.
    pub fn outstanding(&self) -> u64 {
        self.registered.saturating_sub(self.resolved())
    }
}
