//! In-memory storage for gate state.
//!
//! Provides concurrent, sharded storage keyed by gate id.

use crate::application::ports::StateStore;
use crate::domain::identity::GateId;
use crate::domain::state::ThrottleState;
use dashmap::DashMap;

/// Thread-safe sharded storage backed by DashMap.
///
/// `update` runs the whole read-modify-write while holding the entry's shard
/// lock, so overlapping calls for one gate id are serialized. Calls for
/// different gate ids only contend when they hash to the same shard.
#[derive(Debug, Default)]
pub struct ShardedStorage {
    map: DashMap<GateId, ThrottleState>,
}

impl ShardedStorage {
    /// Create a new sharded storage instance.
    pub fn new() -> Self {
        Self {
            map: DashMap::new(),
        }
    }

    /// Check if state is stored for a gate.
    pub fn contains(&self, gate_id: &GateId) -> bool {
        self.map.contains_key(gate_id)
    }

    /// Get the number of gates with stored state.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the storage is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.map.clear();
    }

    /// Keep only the gates for which the predicate returns true.
    pub fn retain(&self, mut f: impl FnMut(&GateId, &ThrottleState) -> bool) {
        self.map.retain(|id, state| f(id, state));
    }
}

impl Clone for ShardedStorage {
    fn clone(&self) -> Self {
        let new_storage = Self::new();
        for entry in self.map.iter() {
            new_storage
                .map
                .insert(entry.key().clone(), *entry.value());
        }
        new_storage
    }
}

impl StateStore for ShardedStorage {
    fn get(&self, gate_id: &GateId) -> ThrottleState {
        self.map
            .get(gate_id)
            .map(|state| *state)
            .unwrap_or_default()
    }

    fn put(&self, gate_id: &GateId, state: ThrottleState) {
        self.map.insert(gate_id.clone(), state);
    }

    fn update<F, R>(&self, gate_id: &GateId, f: F) -> R
    where
        F: FnOnce(ThrottleState) -> (R, ThrottleState),
    {
        let mut entry = self.map.entry(gate_id.clone()).or_default();
        let (result, state) = f(*entry);
        *entry = state;
        result
    }

    fn remove(&self, gate_id: &GateId) {
        self.map.remove(gate_id);
    }
}
