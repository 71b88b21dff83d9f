//! Persisted per-gate state.

/// Counters persisted between evaluations of one gate.
///
/// The zero value is the state of a gate that has never run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThrottleState {
    /// Epoch millis of the last time a window was opened, 0 if never
    pub last_execution_millis: u64,
    /// Passes granted since the window was last reset
    pub executions_in_window: u32,
}

impl ThrottleState {
    /// State of a gate that has never run.
    pub const fn new() -> Self {
        Self {
            last_execution_millis: 0,
            executions_in_window: 0,
        }
    }

    /// Build a state from stored counters.
    pub const fn from_parts(last_execution_millis: u64, executions_in_window: u32) -> Self {
        Self {
            last_execution_millis,
            executions_in_window,
        }
    }

    /// Check if this is the zero state.
    pub fn is_fresh(&self) -> bool {
        *self == Self::new()
    }

    /// End of the window that started at `last_execution_millis`.
    pub fn window_end(&self, interval_millis: u64) -> u64 {
        self.last_execution_millis.saturating_add(interval_millis)
    }
}
