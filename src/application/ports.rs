//! Ports (interfaces) for the application layer.
//!
//! In hexagonal architecture, ports define the interfaces that the application
//! layer needs. Infrastructure adapters implement these ports.

use crate::domain::identity::GateId;
use crate::domain::state::ThrottleState;
use std::fmt::Debug;

/// Port for obtaining current time.
///
/// This abstraction allows the application layer to work with time
/// without depending on system clock implementation details.
/// Infrastructure provides concrete implementations (SystemClock, MockClock).
pub trait Clock: Send + Sync + Debug {
    /// Current time as milliseconds since the Unix epoch.
    fn now_millis(&self) -> u64;
}

/// Port for persisting gate state between evaluations.
///
/// Infrastructure provides concrete implementations (ShardedStorage,
/// RedisStorage).
pub trait StateStore: Send + Sync + Debug {
    /// Read the state of a gate.
    ///
    /// Returns the zero state if nothing is stored for `gate_id`.
    fn get(&self, gate_id: &GateId) -> ThrottleState;

    /// Write the state of a gate.
    fn put(&self, gate_id: &GateId, state: ThrottleState);

    /// Read the state, pass it to `f`, and write back the state `f` returns.
    ///
    /// The default implementation is a plain `get` followed by a `put`. It is
    /// not atomic: two callers updating the same gate at the same time can
    /// overwrite each other. Implementations that can hold a lock across the
    /// read and the write should override it.
    fn update<F, R>(&self, gate_id: &GateId, f: F) -> R
    where
        F: FnOnce(ThrottleState) -> (R, ThrottleState),
    {
        let (result, state) = f(self.get(gate_id));
        self.put(gate_id, state);
        result
    }

    /// Drop the stored state of a gate, if any.
    fn remove(&self, gate_id: &GateId);
}

impl<S: StateStore> StateStore for std::sync::Arc<S> {
    fn get(&self, gate_id: &GateId) -> ThrottleState {
        (**self).get(gate_id)
    }

    fn put(&self, gate_id: &GateId, state: ThrottleState) {
        (**self).put(gate_id, state)
    }

    fn update<F, R>(&self, gate_id: &GateId, f: F) -> R
    where
        F: FnOnce(ThrottleState) -> (R, ThrottleState),
    {
        (**self).update(gate_id, f)
    }

    fn remove(&self, gate_id: &GateId) {
        (**self).remove(gate_id)
    }
}
