//! The throttle decision engine.
//!
//! [`evaluate`] is a pure function of configuration, stored state and the
//! current time. It never fails: every validated configuration produces a
//! decision and the state to persist.
//!
//! Two modes are selected by the configuration:
//!
//! - **Counted** (`max_executions` set): up to `max` passes are granted per
//!   window. Once the quota is exhausted, the request is blocked until the
//!   window that started at `last_execution_millis` has elapsed, at which
//!   point a new window opens with one slot consumed.
//! - **Simple** (no quota): one pass per interval. The window restarts at
//!   every pass.

use crate::domain::config::{ThrottleConfig, WindowStart};
use crate::domain::state::ThrottleState;

/// Outcome of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decision {
    /// Pass the execution through
    Allow,
    /// Hold the execution back
    Block,
}

impl Decision {
    /// Check if this decision is Allow.
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    /// Check if this decision is Block.
    pub fn is_block(&self) -> bool {
        matches!(self, Decision::Block)
    }

    /// Lowercase name, matching the output channel names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Block => "block",
        }
    }
}

/// Result of an evaluation, with details about the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    /// Allow or block
    pub decision: Decision,
    /// State to persist
    pub state: ThrottleState,
    /// Whether this evaluation stamped a new window start
    pub window_opened: bool,
}

impl Evaluation {
    fn allow(state: ThrottleState, window_opened: bool) -> Self {
        Self {
            decision: Decision::Allow,
            state,
            window_opened,
        }
    }

    fn block(state: ThrottleState) -> Self {
        Self {
            decision: Decision::Block,
            state,
            window_opened: false,
        }
    }

    /// Split into the decision and the state to persist.
    pub fn into_parts(self) -> (Decision, ThrottleState) {
        (self.decision, self.state)
    }
}

/// Decide whether an execution at `now_millis` may pass.
///
/// Returns the decision together with the state to persist. Blocked requests
/// return the state unchanged, except that a counted window's count is
/// clamped to the current quota.
///
/// # Example
/// ```
/// use throttle_gate::{evaluate, Decision, IntervalUnit, ThrottleConfig, ThrottleState};
///
/// let config = ThrottleConfig::simple(10, IntervalUnit::Seconds).unwrap();
///
/// let (decision, state) = evaluate(&config, ThrottleState::new(), 0);
/// assert_eq!(decision, Decision::Allow);
///
/// let (decision, state) = evaluate(&config, state, 5_000);
/// assert_eq!(decision, Decision::Block);
///
/// let (decision, state) = evaluate(&config, state, 10_000);
/// assert_eq!(decision, Decision::Allow);
/// assert_eq!(state.last_execution_millis, 10_000);
/// ```
pub fn evaluate(
    config: &ThrottleConfig,
    state: ThrottleState,
    now_millis: u64,
) -> (Decision, ThrottleState) {
    assess(config, state, now_millis).into_parts()
}

/// Same as [`evaluate`], but also reports whether a window was opened.
pub fn assess(config: &ThrottleConfig, state: ThrottleState, now_millis: u64) -> Evaluation {
    match config.max_executions() {
        Some(max) => assess_counted(config, max, state, now_millis),
        None => assess_simple(config, state, now_millis),
    }
}

fn assess_counted(
    config: &ThrottleConfig,
    max: u32,
    mut state: ThrottleState,
    now_millis: u64,
) -> Evaluation {
    if state.executions_in_window < max {
        let stamp = state.executions_in_window == 0
            && config.window_start() == WindowStart::OnFirstGrant;
        if stamp {
            state.last_execution_millis = now_millis;
        }
        state.executions_in_window += 1;
        return Evaluation::allow(state, stamp);
    }

    let window_end = state.window_end(config.interval_duration_millis());
    if now_millis >= window_end {
        Evaluation::allow(ThrottleState::from_parts(now_millis, 1), true)
    } else {
        // A quota lowered mid-window leaves a larger stored count behind.
        state.executions_in_window = state.executions_in_window.min(max);
        Evaluation::block(state)
    }
}

// The single slot is marked occupied in `executions_in_window`, so a gate
// that has never run opens its first window regardless of the clock.
fn assess_simple(config: &ThrottleConfig, state: ThrottleState, now_millis: u64) -> Evaluation {
    let window_end = state.window_end(config.interval_duration_millis());
    if state.is_fresh() || now_millis >= window_end {
        Evaluation::allow(ThrottleState::from_parts(now_millis, 1), true)
    } else {
        Evaluation::block(state)
    }
}
