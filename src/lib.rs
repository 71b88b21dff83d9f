//! # throttle-gate
//!
//! An interval throttle gate for workflow engines and job runners.
//!
//! Every call asks the gate whether an execution may pass right now. The gate
//! answers **allow** or **block** from a configured interval and, optionally,
//! a number of executions allowed per interval. State is kept per gate id in
//! a pluggable store, so the gate survives between invocations.
//!
//! ## Quick Start
//!
//! ```rust
//! use throttle_gate::{GateId, IntervalUnit, ShardedStorage, SystemClock, ThrottleConfig, ThrottleGate};
//! use std::sync::Arc;
//!
//! let gate = ThrottleGate::new(Arc::new(ShardedStorage::new()), Arc::new(SystemClock::new()));
//!
//! // 3 executions per minute
//! let config = ThrottleConfig::counted(1, IntervalUnit::Minutes, 3).unwrap();
//! let id = GateId::for_node("nightly-sync", "Throttle");
//!
//! assert!(gate.check(&id, &config).is_allow());
//! ```
//!
//! ## Modes
//!
//! - **Counted** (`max_executions` set): up to N passes per window. When the
//!   quota is used up, calls are blocked until the window that started at
//!   the stored timestamp has elapsed; the next call then opens a new window.
//! - **Simple** (no quota): one pass per interval.
//!
//! Unknown interval units are accepted and give a zero-length interval, so a
//! gate configured with one never blocks once its quota is exhausted.
//!
//! ### Window start
//!
//! In counted mode, grants made while the quota still has room do not touch
//! the stored timestamp by default ([`WindowStart::OnOverflow`]). The very
//! first window of a gate is therefore measured from timestamp zero and
//! closes immediately. Use [`WindowStart::OnFirstGrant`] to stamp the window
//! on its first grant instead:
//!
//! ```rust
//! use throttle_gate::{IntervalUnit, ThrottleConfig, WindowStart};
//!
//! let config = ThrottleConfig::builder()
//!     .interval(10, IntervalUnit::Seconds)
//!     .max_executions(5)
//!     .window_start(WindowStart::OnFirstGrant)
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Routing
//!
//! [`ThrottleGate::process`] forwards a batch of items, untouched, to the
//! `"allow"` or `"block"` channel:
//!
//! ```rust
//! # use throttle_gate::{GateId, IntervalUnit, ShardedStorage, SystemClock, ThrottleConfig, ThrottleGate, Channel};
//! # use std::sync::Arc;
//! # let gate = ThrottleGate::new(Arc::new(ShardedStorage::new()), Arc::new(SystemClock::new()));
//! let config = ThrottleConfig::simple(10, IntervalUnit::Seconds).unwrap();
//! let id = GateId::new("webhook");
//!
//! let batch = gate.process(&id, &config, vec!["order-1", "order-2"]);
//! assert_eq!(batch.channel, Channel::Allow);
//!
//! let [allowed, blocked] = gate.process(&id, &config, vec!["order-3"]).into_outputs();
//! assert!(allowed.is_empty());
//! assert_eq!(blocked, vec!["order-3"]);
//! ```
//!
//! ## Concurrency
//!
//! The gate assumes calls for one gate id happen one after another.
//! [`ShardedStorage`] holds a lock across each read-modify-write, so
//! overlapping calls inside one process are safe. The Redis store is not
//! atomic across processes.
//!
//! ## Observability
//!
//! Each decision is logged with `tracing` at DEBUG level, and counters are
//! available through [`ThrottleGate::metrics`]:
//!
//! ```rust
//! # use throttle_gate::{ShardedStorage, SystemClock, ThrottleGate};
//! # use std::sync::Arc;
//! # let gate = ThrottleGate::new(Arc::new(ShardedStorage::new()), Arc::new(SystemClock::new()));
//! let snapshot = gate.metrics().snapshot();
//! println!("Block rate: {:.2}%", snapshot.block_rate() * 100.0);
//! ```

// Domain layer - pure business logic
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    config::{
        ConfigurationError, IntervalUnit, ThrottleConfig, ThrottleConfigBuilder,
        ThrottleParameters, WindowStart,
    },
    identity::GateId,
    policy::{assess, evaluate, Decision, Evaluation},
    state::ThrottleState,
};

pub use application::{
    gate::ThrottleGate,
    metrics::{Metrics, MetricsSnapshot},
    ports::{Clock, StateStore},
    router::{Channel, RoutedBatch},
};

pub use infrastructure::{clock::SystemClock, storage::ShardedStorage};

#[cfg(feature = "redis-storage")]
pub use infrastructure::redis_storage::{RedisStorage, RedisStorageConfig};
