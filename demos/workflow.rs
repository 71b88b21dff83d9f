//! Workflow example: a gate node between a trigger and a downstream action.
//!
//! Parameters arrive loosely typed, are validated once, and every trigger
//! batch is routed to the "allow" or "block" output. A simulated clock makes
//! the run instant and repeatable.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use throttle_gate::{
    Clock, GateId, ShardedStorage, ThrottleConfig, ThrottleGate, ThrottleParameters,
};

/// Clock that the example moves forward by hand.
#[derive(Debug, Default)]
struct SimulatedClock(AtomicU64);

impl SimulatedClock {
    fn advance_secs(&self, secs: u64) {
        self.0.fetch_add(secs * 1000, Ordering::Relaxed);
    }
}

impl Clock for SimulatedClock {
    fn now_millis(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let params = ThrottleParameters {
        interval: 30,
        unit: "seconds".to_string(),
        executions: Some(2),
    };
    let config = match ThrottleConfig::try_from(params) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("invalid gate parameters: {}", e);
            return;
        }
    };

    let clock = Arc::new(SimulatedClock::default());
    clock.advance_secs(1_700_000_000);
    let gate = ThrottleGate::new(Arc::new(ShardedStorage::new()), clock.clone());
    let id = GateId::for_node("order-sync", "Throttle");

    println!("=== Workflow Example ({}) ===\n", config);

    for (tick, batch) in [
        vec!["order-1", "order-2"],
        vec!["order-3"],
        vec!["order-4"],
        vec!["order-5", "order-6"],
        vec!["order-7"],
    ]
    .into_iter()
    .enumerate()
    {
        let routed = gate.process(&id, &config, batch);
        println!(
            "t+{:>3}s  {} item(s) -> {}",
            tick * 10,
            routed.items.len(),
            routed.channel.name()
        );
        clock.advance_secs(10);
    }

    let snapshot = gate.metrics().snapshot();
    println!(
        "\nblocked {:.0}% of {} trigger batches",
        snapshot.block_rate() * 100.0,
        snapshot.total_executions()
    );
}
