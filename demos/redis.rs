//! Redis example: gate state shared through Redis.
//!
//! Requires a Redis instance at `redis://127.0.0.1/`.
//! Run with `cargo run --example redis --features redis-storage`.

use std::sync::Arc;
use std::time::Duration;
use throttle_gate::{
    GateId, IntervalUnit, RedisStorage, RedisStorageConfig, SystemClock, ThrottleConfig,
    ThrottleGate,
};

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let storage_config = RedisStorageConfig {
        key_prefix: "throttle-gate-demo:".to_string(),
        ttl: Duration::from_secs(3600),
    };

    let storage = match RedisStorage::connect_with_config("redis://127.0.0.1/", storage_config)
        .await
    {
        Ok(storage) => storage,
        Err(e) => {
            eprintln!("Failed to connect to Redis: {}", e);
            return;
        }
    };

    let gate = ThrottleGate::new(storage, Arc::new(SystemClock::new()));
    let config = ThrottleConfig::simple(5, IntervalUnit::Seconds).expect("valid config");
    let id = GateId::new("redis-demo");

    println!("=== Redis Example ({}) ===\n", config);
    println!("Run this example twice within 5 seconds: the second run is blocked.\n");

    let decision = gate.check(&id, &config);
    println!("decision: {}", decision.as_str());
    println!("stored state: {:?}", gate.state(&id));
}
