//! Gate coordination logic.
//!
//! The gate reads a gate's stored state, asks the decision engine whether
//! the execution may pass, writes the new state back and records metrics.

use crate::application::metrics::Metrics;
use crate::application::ports::{Clock, StateStore};
use crate::application::router::RoutedBatch;
use crate::domain::{
    config::ThrottleConfig,
    identity::GateId,
    policy::{assess, Decision},
    state::ThrottleState,
};
use std::sync::Arc;

/// Throttle gate bound to a state store and a clock.
///
/// The configuration is passed on every call and never cached, so one gate
/// can serve many gate ids with different settings.
///
/// # Concurrency
/// Calls for the same gate id are expected to be sequential. Whether
/// overlapping calls are safe depends on the store's
/// [`StateStore::update`]: `ShardedStorage` serializes them, the default
/// get-then-put does not.
#[derive(Debug, Clone)]
pub struct ThrottleGate<S>
where
    S: StateStore,
{
    store: S,
    clock: Arc<dyn Clock>,
    metrics: Metrics,
}

impl<S> ThrottleGate<S>
where
    S: StateStore,
{
    /// Create a new gate.
    ///
    /// # Arguments
    /// * `store` - Where gate state is persisted between calls
    /// * `clock` - Source of the current time
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self::with_metrics(store, clock, Metrics::new())
    }

    /// Create a new gate that reports into existing metrics.
    pub fn with_metrics(store: S, clock: Arc<dyn Clock>, metrics: Metrics) -> Self {
        Self {
            store,
            clock,
            metrics,
        }
    }

    /// Decide whether an execution for `gate_id` may pass now.
    pub fn check(&self, gate_id: &GateId, config: &ThrottleConfig) -> Decision {
        self.check_at(gate_id, config, self.clock.now_millis())
    }

    /// Decide whether an execution for `gate_id` may pass at `now_millis`.
    ///
    /// Runs one read-evaluate-write cycle against the store.
    pub fn check_at(
        &self,
        gate_id: &GateId,
        config: &ThrottleConfig,
        now_millis: u64,
    ) -> Decision {
        let evaluation = self.store.update(gate_id, |state| {
            let evaluation = assess(config, state, now_millis);
            (evaluation, evaluation.state)
        });
        let decision = evaluation.decision;
        let next = evaluation.state;

        match decision {
            Decision::Allow => self.metrics.record_allowed(),
            Decision::Block => self.metrics.record_blocked(),
        }
        if evaluation.window_opened {
            self.metrics.record_window_opened();
        }

        tracing::debug!(
            gate = %gate_id,
            decision = decision.as_str(),
            now = now_millis,
            last_execution = next.last_execution_millis,
            executions_in_window = next.executions_in_window,
            config = %config,
            "throttle gate evaluated"
        );

        decision
    }

    /// Check the gate and route `items` to the selected channel.
    ///
    /// Items are never inspected; the whole batch goes to one channel.
    pub fn process<T>(
        &self,
        gate_id: &GateId,
        config: &ThrottleConfig,
        items: Vec<T>,
    ) -> RoutedBatch<T> {
        let decision = self.check(gate_id, config);
        RoutedBatch::route(decision, items)
    }

    /// Read the stored state of a gate without evaluating it.
    pub fn state(&self, gate_id: &GateId) -> ThrottleState {
        self.store.get(gate_id)
    }

    /// Forget the stored state of a gate.
    pub fn reset(&self, gate_id: &GateId) {
        self.store.remove(gate_id);
    }

    /// Get a reference to the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a reference to the metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}
