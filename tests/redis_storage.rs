//! Integration tests for Redis storage.
//!
//! These tests require a Redis instance running at `redis://127.0.0.1/`.
//! Tests are ignored by default - run with `cargo test --features redis-storage --test redis_storage -- --ignored`

#![cfg(feature = "redis-storage")]

use redis::AsyncCommands;
use std::sync::Arc;
use std::time::Duration;
use throttle_gate::{
    Decision, GateId, IntervalUnit, RedisStorage, RedisStorageConfig, StateStore, SystemClock,
    ThrottleConfig, ThrottleGate, ThrottleState,
};

/// Check if Redis is available before running tests
async fn redis_available() -> bool {
    RedisStorage::connect("redis://127.0.0.1/").await.is_ok()
}

/// Create a test storage with unique prefix
async fn create_test_storage(test_name: &str) -> RedisStorage {
    let config = RedisStorageConfig {
        key_prefix: format!("test:{}:", test_name),
        ttl: Duration::from_secs(60),
    };

    RedisStorage::connect_with_config("redis://127.0.0.1/", config)
        .await
        .expect("Failed to connect to Redis")
}

#[tokio::test(flavor = "multi_thread")]
#[ignore] // Requires Redis
async fn test_redis_missing_gate_is_fresh() {
    if !redis_available().await {
        eprintln!("Skipping test: Redis not available at redis://127.0.0.1/");
        return;
    }

    let storage = create_test_storage("missing").await;
    let id = GateId::new("never-written");
    storage.remove(&id);

    assert!(storage.get(&id).is_fresh());
}

#[tokio::test(flavor = "multi_thread")]
#[ignore] // Requires Redis
async fn test_redis_put_get() {
    if !redis_available().await {
        eprintln!("Skipping test: Redis not available");
        return;
    }

    let storage = create_test_storage("put_get").await;
    let id = GateId::new("gate");

    storage.put(&id, ThrottleState::from_parts(1_700_000_000_000, 2));
    assert_eq!(
        storage.get(&id),
        ThrottleState::from_parts(1_700_000_000_000, 2)
    );

    storage.remove(&id);
    assert!(storage.get(&id).is_fresh());
}

#[tokio::test(flavor = "multi_thread")]
#[ignore] // Requires Redis
async fn test_redis_gate_state_survives_new_connection() {
    if !redis_available().await {
        eprintln!("Skipping test: Redis not available");
        return;
    }

    let config = ThrottleConfig::counted(1, IntervalUnit::Minutes, 2).unwrap();
    let id = GateId::for_node("wf-redis", "Throttle");

    let first = ThrottleGate::new(
        create_test_storage("survives").await,
        Arc::new(SystemClock::new()),
    );
    first.reset(&id);
    assert_eq!(first.check_at(&id, &config, 0), Decision::Allow);
    assert_eq!(first.check_at(&id, &config, 0), Decision::Allow);

    // A fresh connection sees the exhausted quota
    let second = ThrottleGate::new(
        create_test_storage("survives").await,
        Arc::new(SystemClock::new()),
    );
    assert_eq!(second.check_at(&id, &config, 1_000), Decision::Block);
    assert_eq!(second.check_at(&id, &config, 60_000), Decision::Allow);
    assert_eq!(second.state(&id), ThrottleState::from_parts(60_000, 1));

    second.reset(&id);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore] // Requires Redis
async fn test_redis_undecodable_value_is_discarded() {
    if !redis_available().await {
        eprintln!("Skipping test: Redis not available");
        return;
    }

    let storage = create_test_storage("corrupt").await;
    let id = GateId::new("gate");

    let client = redis::Client::open("redis://127.0.0.1/").unwrap();
    let mut conn = client.get_multiplexed_async_connection().await.unwrap();
    conn.set::<_, _, ()>("test:corrupt:gate", "x").await.unwrap();

    assert_eq!(storage.fetch(&id).await.unwrap(), None);
    assert!(storage.get(&id).is_fresh());
}

#[tokio::test]
#[ignore] // Requires Redis
async fn test_redis_current_thread_runtime_fails_open() {
    if !redis_available().await {
        eprintln!("Skipping test: Redis not available");
        return;
    }

    let storage = create_test_storage("current_thread").await;
    let id = GateId::new("gate");
    storage
        .store(&id, &ThrottleState::from_parts(1_000, 2))
        .await
        .unwrap();

    // No blocking bridge on this runtime: decided on the zero state, not written
    let gate = ThrottleGate::new(storage.clone(), Arc::new(SystemClock::new()));
    let config = ThrottleConfig::counted(1, IntervalUnit::Hours, 2).unwrap();
    assert_eq!(gate.check_at(&id, &config, 2_000), Decision::Allow);

    assert_eq!(
        storage.fetch(&id).await.unwrap(),
        Some(ThrottleState::from_parts(1_000, 2))
    );
    storage.delete(&id).await.unwrap();
}
