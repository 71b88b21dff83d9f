//! Redis-backed storage implementation.
//!
//! Persists gate state in Redis, so gate windows survive process restarts
//! and can be shared by several host processes that take turns running a
//! workflow.
//!
//! ## Architecture
//!
//! The Redis storage uses a simple key-value model:
//! - Keys: gate id with configurable prefix
//! - Values: serialized `ThrottleState` (bincode format)
//! - TTL: automatic expiration for gates that stop running
//!
//! ## Important Limitations
//!
//! ### 1. Not atomic
//!
//! `update` is a GET followed by a SET. Two processes evaluating the same
//! gate at the same moment can both read the same state and both be
//! allowed. Invocations of one gate must be sequential.
//!
//! ### 2. Error Handling
//!
//! - Redis failures are logged as warnings
//! - A failed read is treated as a gate that has never run
//! - A failed write is dropped
//! - `update` never writes back a state decided from a failed read, so a
//!   transient error cannot overwrite a live window
//!
//! ### 3. Runtime
//!
//! `StateStore` is synchronous. Called from inside a tokio runtime, the
//! adapter blocks with `block_in_place`, which needs the **multi-threaded**
//! runtime. Inside a current-thread runtime (`flavor = "current_thread"`,
//! a default `#[tokio::test]`) Redis is not reached: the call is logged and
//! handled like a failed read. Outside of any runtime a temporary one is
//! created per call.
//!
//! ### 4. TTL
//!
//! The TTL should be longer than the longest interval in use. A gate whose
//! key expires before its window closes is allowed again early.
//!
//! ## Example
//!
//! ```rust,ignore
//! use throttle_gate::{
//!     GateId, IntervalUnit, RedisStorage, RedisStorageConfig, SystemClock, ThrottleConfig,
//!     ThrottleGate,
//! };
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main(flavor = "multi_thread")]
//! async fn main() {
//!     let config = RedisStorageConfig {
//!         key_prefix: "throttle-gate:".to_string(),
//!         ttl: Duration::from_secs(7 * 24 * 3600),
//!     };
//!
//!     let storage = RedisStorage::connect_with_config("redis://127.0.0.1/", config)
//!         .await
//!         .expect("Failed to connect to Redis");
//!
//!     let gate = ThrottleGate::new(storage, Arc::new(SystemClock::new()));
//!     let config = ThrottleConfig::simple(1, IntervalUnit::Hours).unwrap();
//!     let decision = gate.check(&GateId::new("nightly-report"), &config);
//! }
//! ```

use crate::application::ports::StateStore;
use crate::domain::identity::GateId;
use crate::domain::state::ThrottleState;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::Mutex;

/// Configuration for Redis storage.
#[derive(Debug, Clone)]
pub struct RedisStorageConfig {
    /// TTL for gate state (default: 7 days)
    pub ttl: Duration,
    /// Key prefix for Redis keys (default: "throttle-gate:")
    pub key_prefix: String,
}

impl Default for RedisStorageConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(7 * 24 * 3600),
            key_prefix: "throttle-gate:".to_string(),
        }
    }
}

/// Redis-backed state store.
pub struct RedisStorage {
    connection: Arc<Mutex<ConnectionManager>>,
    config: RedisStorageConfig,
}

impl fmt::Debug for RedisStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStorage")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Clone for RedisStorage {
    fn clone(&self) -> Self {
        Self {
            connection: Arc::clone(&self.connection),
            config: self.config.clone(),
        }
    }
}

impl RedisStorage {
    /// Connect to Redis with default configuration.
    ///
    /// # Arguments
    /// * `url` - Redis connection URL (e.g., "redis://127.0.0.1/")
    ///
    /// # Errors
    /// Returns error if connection fails.
    pub async fn connect(url: &str) -> Result<Self, RedisError> {
        Self::connect_with_config(url, RedisStorageConfig::default()).await
    }

    /// Connect to Redis with custom configuration.
    ///
    /// # Errors
    /// Returns error if connection fails.
    pub async fn connect_with_config(
        url: &str,
        config: RedisStorageConfig,
    ) -> Result<Self, RedisError> {
        let client = Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;

        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
            config,
        })
    }

    /// Storage configuration.
    pub fn config(&self) -> &RedisStorageConfig {
        &self.config
    }

    /// Get the Redis key for a gate.
    fn key(&self, gate_id: &GateId) -> String {
        format!("{}{}", self.config.key_prefix, gate_id)
    }

    /// Read and decode the state of a gate.
    ///
    /// Undecodable values are deleted and reported as absent.
    pub async fn fetch(&self, gate_id: &GateId) -> Result<Option<ThrottleState>, RedisError> {
        let key = self.key(gate_id);
        let mut conn = self.connection.lock().await;

        let bytes: Option<Vec<u8>> = conn.get(&key).await?;

        match bytes {
            Some(bytes) => match bincode::deserialize::<ThrottleState>(&bytes) {
                Ok(state) => Ok(Some(state)),
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        key = %key,
                        "Discarding undecodable gate state in Redis"
                    );
                    let _: () = conn.del(&key).await?;
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Encode and write the state of a gate with the configured TTL.
    pub async fn store(&self, gate_id: &GateId, state: &ThrottleState) -> Result<(), RedisError> {
        let key = self.key(gate_id);

        match bincode::serialize(state) {
            Ok(bytes) => {
                let mut conn = self.connection.lock().await;
                let ttl_secs = self.config.ttl.as_secs().max(1);
                conn.set_ex::<_, _, ()>(&key, bytes, ttl_secs).await
            }
            Err(e) => {
                tracing::warn!(error = %e, gate = %gate_id, "Failed to encode gate state");
                Ok(())
            }
        }
    }

    /// Delete the state of a gate.
    pub async fn delete(&self, gate_id: &GateId) -> Result<(), RedisError> {
        let key = self.key(gate_id);
        let mut conn = self.connection.lock().await;
        conn.del::<_, ()>(&key).await
    }
}

/// Drive a future to completion from the sync `StateStore` methods.
///
/// Inside a multi-threaded tokio runtime this uses `block_in_place`; outside
/// of one a temporary runtime is created. Returns `None` when neither is
/// possible.
fn block_on<F: Future>(future: F) -> Option<F::Output> {
    if let Ok(handle) = Handle::try_current() {
        if handle.runtime_flavor() != RuntimeFlavor::MultiThread {
            tracing::warn!(
                flavor = ?handle.runtime_flavor(),
                "Redis storage needs a multi-threaded tokio runtime, skipping Redis call"
            );
            return None;
        }
        return Some(tokio::task::block_in_place(|| handle.block_on(future)));
    }

    match tokio::runtime::Runtime::new() {
        Ok(rt) => Some(rt.block_on(future)),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to create tokio runtime for Redis storage");
            None
        }
    }
}

/// Apply `f` to the outcome of a read and pick the state to write back.
///
/// Only a successful read yields a state to persist. After a failed or
/// skipped read `f` still decides on the zero state, but nothing is written.
fn resolve_update<F, R>(
    gate_id: &GateId,
    read: Option<Result<Option<ThrottleState>, RedisError>>,
    f: F,
) -> (R, Option<ThrottleState>)
where
    F: FnOnce(ThrottleState) -> (R, ThrottleState),
{
    match read {
        Some(Ok(stored)) => {
            let (result, state) = f(stored.unwrap_or_default());
            (result, Some(state))
        }
        Some(Err(e)) => {
            tracing::warn!(
                error = %e,
                gate = %gate_id,
                "Failed to read gate state from Redis, not writing back"
            );
            (f(ThrottleState::default()).0, None)
        }
        None => (f(ThrottleState::default()).0, None),
    }
}

impl StateStore for RedisStorage {
    fn get(&self, gate_id: &GateId) -> ThrottleState {
        match block_on(self.fetch(gate_id)) {
            Some(Ok(state)) => state.unwrap_or_default(),
            Some(Err(e)) => {
                tracing::warn!(
                    error = %e,
                    gate = %gate_id,
                    "Failed to read gate state from Redis"
                );
                ThrottleState::default()
            }
            None => ThrottleState::default(),
        }
    }

    fn put(&self, gate_id: &GateId, state: ThrottleState) {
        if let Some(Err(e)) = block_on(self.store(gate_id, &state)) {
            tracing::warn!(
                error = %e,
                gate = %gate_id,
                "Failed to persist gate state to Redis"
            );
        }
    }

    fn update<F, R>(&self, gate_id: &GateId, f: F) -> R
    where
        F: FnOnce(ThrottleState) -> (R, ThrottleState),
    {
        let read = block_on(self.fetch(gate_id));
        let (result, write) = resolve_update(gate_id, read, f);
        if let Some(state) = write {
            self.put(gate_id, state);
        }
        result
    }

    fn remove(&self, gate_id: &GateId) {
        if let Some(Err(e)) = block_on(self.delete(gate_id)) {
            tracing::warn!(
                error = %e,
                gate = %gate_id,
                "Failed to delete gate state from Redis"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RedisStorageConfig::default();
        assert_eq!(config.key_prefix, "throttle-gate:");
        assert_eq!(config.ttl, Duration::from_secs(604_800));
    }

    fn read_error() -> RedisError {
        RedisError::from((redis::ErrorKind::IoError, "connection reset"))
    }

    fn consume_slot(state: ThrottleState) -> (u32, ThrottleState) {
        let next = ThrottleState::from_parts(
            state.last_execution_millis,
            state.executions_in_window + 1,
        );
        (state.executions_in_window, next)
    }

    #[test]
    fn test_failed_read_is_not_written_back() {
        let id = GateId::new("gate");

        let (seen, write) = resolve_update(&id, Some(Err(read_error())), consume_slot);
        assert_eq!(seen, 0);
        assert_eq!(write, None);
    }

    #[test]
    fn test_skipped_read_is_not_written_back() {
        let id = GateId::new("gate");

        let (seen, write) = resolve_update(&id, None, consume_slot);
        assert_eq!(seen, 0);
        assert_eq!(write, None);
    }

    #[test]
    fn test_successful_read_is_written_back() {
        let id = GateId::new("gate");

        let stored = ThrottleState::from_parts(5_000, 2);
        let (seen, write) = resolve_update(&id, Some(Ok(Some(stored))), consume_slot);
        assert_eq!(seen, 2);
        assert_eq!(write, Some(ThrottleState::from_parts(5_000, 3)));

        let (seen, write) = resolve_update(&id, Some(Ok(None)), consume_slot);
        assert_eq!(seen, 0);
        assert_eq!(write, Some(ThrottleState::from_parts(0, 1)));
    }

    #[test]
    fn test_block_on_without_runtime() {
        assert_eq!(block_on(async { 7 }), Some(7));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_block_on_multi_thread_runtime() {
        assert_eq!(block_on(async { 7 }), Some(7));
    }

    #[tokio::test]
    async fn test_block_on_current_thread_runtime_skips() {
        assert_eq!(block_on(async { 7 }), None);
    }

    #[test]
    fn test_state_encoding_round_trip() {
        let state = ThrottleState::from_parts(1_700_000_000_000, 3);
        let bytes = bincode::serialize(&state).unwrap();
        let decoded: ThrottleState = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, state);
    }
}
