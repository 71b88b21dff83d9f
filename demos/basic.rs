//! Basic example demonstrating a counted gate.
//!
//! Allows 3 executions per 2 seconds and logs every decision.
//! Run with `RUST_LOG=throttle_gate=debug` to see the gate's own events.

use std::sync::Arc;
use std::thread;
use std::time::Duration;
use throttle_gate::{
    GateId, IntervalUnit, ShardedStorage, SystemClock, ThrottleConfig, ThrottleGate, WindowStart,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("basic=info".parse().unwrap()))
        .init();

    let gate = ThrottleGate::new(Arc::new(ShardedStorage::new()), Arc::new(SystemClock::new()));
    let config = ThrottleConfig::builder()
        .interval(2, IntervalUnit::Seconds)
        .max_executions(3)
        .window_start(WindowStart::OnFirstGrant)
        .build()
        .expect("valid config");
    let id = GateId::new("basic");

    println!("=== Throttle Gate Example ===\n");
    println!("Policy: {}\n", config);

    for i in 1..=12 {
        let decision = gate.check(&id, &config);
        info!(iteration = i, decision = decision.as_str(), "execution requested");
        thread::sleep(Duration::from_millis(300));
    }

    let snapshot = gate.metrics().snapshot();
    println!("\n=== Example Complete ===");
    println!(
        "Allowed: {}, blocked: {}, windows opened: {}",
        snapshot.executions_allowed, snapshot.executions_blocked, snapshot.windows_opened
    );
}
