//! Observability metrics for the gate.
//!
//! Provides counters about gate decisions for monitoring and debugging.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics tracking gate decisions.
///
/// All metrics use atomic operations for thread-safe updates and reads.
/// Clones share the same counters.
#[derive(Debug, Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    /// Total number of executions allowed through
    executions_allowed: AtomicU64,
    /// Total number of executions blocked
    executions_blocked: AtomicU64,
    /// Allowed executions that opened a new window
    windows_opened: AtomicU64,
}

impl Metrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                executions_allowed: AtomicU64::new(0),
                executions_blocked: AtomicU64::new(0),
                windows_opened: AtomicU64::new(0),
            }),
        }
    }

    /// Record an allowed execution.
    pub(crate) fn record_allowed(&self) {
        self.inner.executions_allowed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a blocked execution.
    pub(crate) fn record_blocked(&self) {
        self.inner.executions_blocked.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a window being opened or reset.
    pub(crate) fn record_window_opened(&self) {
        self.inner.windows_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the total number of executions allowed.
    pub fn executions_allowed(&self) -> u64 {
        self.inner.executions_allowed.load(Ordering::Relaxed)
    }

    /// Get the total number of executions blocked.
    pub fn executions_blocked(&self) -> u64 {
        self.inner.executions_blocked.load(Ordering::Relaxed)
    }

    /// Get the number of windows opened.
    pub fn windows_opened(&self) -> u64 {
        self.inner.windows_opened.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            executions_allowed: self.executions_allowed(),
            executions_blocked: self.executions_blocked(),
            windows_opened: self.windows_opened(),
        }
    }

    /// Reset all metrics to zero.
    pub fn reset(&self) {
        self.inner.executions_allowed.store(0, Ordering::Relaxed);
        self.inner.executions_blocked.store(0, Ordering::Relaxed);
        self.inner.windows_opened.store(0, Ordering::Relaxed);
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Total number of executions allowed through
    pub executions_allowed: u64,
    /// Total number of executions blocked
    pub executions_blocked: u64,
    /// Allowed executions that opened a new window
    pub windows_opened: u64,
}

impl MetricsSnapshot {
    /// Ratio of blocked executions to all executions (0.0 to 1.0).
    ///
    /// Returns 0.0 if nothing has been evaluated.
    pub fn block_rate(&self) -> f64 {
        let total = self.total_executions();
        if total == 0 {
            0.0
        } else {
            self.executions_blocked as f64 / total as f64
        }
    }

    /// Get the total number of executions evaluated (allowed + blocked).
    pub fn total_executions(&self) -> u64 {
        self.executions_allowed
            .saturating_add(self.executions_blocked)
    }
}
