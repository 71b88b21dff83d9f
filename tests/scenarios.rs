//! End-to-end scenarios through the public API.

use std::sync::Arc;
use throttle_gate::{
    evaluate, Channel, Decision, GateId, IntervalUnit, ShardedStorage, StateStore, SystemClock,
    ThrottleConfig, ThrottleGate, ThrottleState, WindowStart,
};

fn gate() -> ThrottleGate<Arc<ShardedStorage>> {
    ThrottleGate::new(Arc::new(ShardedStorage::new()), Arc::new(SystemClock::new()))
}

#[test]
fn test_simple_mode_interval() {
    let gate = gate();
    let config = ThrottleConfig::simple(10, IntervalUnit::Seconds).unwrap();
    let id = GateId::new("simple");

    assert_eq!(gate.check_at(&id, &config, 0), Decision::Allow);
    assert_eq!(gate.state(&id).last_execution_millis, 0);

    assert_eq!(gate.check_at(&id, &config, 5_000), Decision::Block);

    assert_eq!(gate.check_at(&id, &config, 10_000), Decision::Allow);
    assert_eq!(gate.state(&id).last_execution_millis, 10_000);
}

#[test]
fn test_counted_mode_quota_and_reset() {
    let gate = gate();
    let config = ThrottleConfig::counted(1, IntervalUnit::Minutes, 3).unwrap();
    let id = GateId::new("counted");

    for _ in 0..3 {
        assert_eq!(gate.check_at(&id, &config, 0), Decision::Allow);
    }
    assert_eq!(gate.state(&id), ThrottleState::from_parts(0, 3));

    assert_eq!(gate.check_at(&id, &config, 1_000), Decision::Block);
    assert_eq!(gate.state(&id), ThrottleState::from_parts(0, 3));

    assert_eq!(gate.check_at(&id, &config, 60_000), Decision::Allow);
    assert_eq!(gate.state(&id), ThrottleState::from_parts(60_000, 1));
}

#[test]
fn test_unrecognized_unit_never_blocks() {
    let config = ThrottleConfig::simple(5, "fortnights").unwrap();
    assert_eq!(config.interval_duration_millis(), 0);

    let mut state = ThrottleState::new();
    for now in [0, 10, 10, 20_000, 20_001] {
        let (decision, next) = evaluate(&config, state, now);
        assert_eq!(decision, Decision::Allow);
        assert_eq!(next.last_execution_millis, now);
        state = next;
    }
}

#[test]
fn test_wall_clock_counted_gate() {
    let gate = gate();
    let config = ThrottleConfig::counted(1, IntervalUnit::Hours, 2).unwrap();
    let id = GateId::for_node("wf-1", "Throttle");

    // Quota grants leave the window unstamped, so the first overflow
    // reopens immediately. The hour applies from then on.
    assert!(gate.check(&id, &config).is_allow());
    assert!(gate.check(&id, &config).is_allow());
    assert!(gate.check(&id, &config).is_allow());
    assert_eq!(gate.state(&id).executions_in_window, 1);
    assert!(gate.check(&id, &config).is_allow());
    assert!(gate.check(&id, &config).is_block());
    assert!(gate.check(&id, &config).is_block());
}

#[test]
fn test_wall_clock_counted_gate_stamped_on_first_grant() {
    let gate = gate();
    let config = ThrottleConfig::builder()
        .interval(1, IntervalUnit::Hours)
        .max_executions(2)
        .window_start(WindowStart::OnFirstGrant)
        .build()
        .unwrap();
    let id = GateId::for_node("wf-1", "Throttle");

    assert!(gate.check(&id, &config).is_allow());
    assert!(gate.check(&id, &config).is_allow());
    assert!(gate.check(&id, &config).is_block());
}

#[test]
fn test_process_routes_whole_batch() {
    let gate = gate();
    let config = ThrottleConfig::simple(1, IntervalUnit::Days).unwrap();
    let id = GateId::new("batch");

    let items = vec![
        serde_json::json!({"order": 1}),
        serde_json::json!({"order": 2}),
    ];
    let routed = gate.process(&id, &config, items.clone());
    assert_eq!(routed.channel, Channel::Allow);
    assert_eq!(routed.channel.name(), "allow");
    assert_eq!(routed.items, items);

    let routed = gate.process(&id, &config, items.clone());
    assert_eq!(routed.channel.name(), "block");
    let [allow, block] = routed.into_outputs();
    assert!(allow.is_empty());
    assert_eq!(block, items);
}

#[test]
fn test_store_shared_between_gates() {
    let store = Arc::new(ShardedStorage::new());
    let first = ThrottleGate::new(Arc::clone(&store), Arc::new(SystemClock::new()));
    let second = ThrottleGate::new(Arc::clone(&store), Arc::new(SystemClock::new()));
    let config = ThrottleConfig::simple(1, IntervalUnit::Hours).unwrap();
    let id = GateId::new("shared");

    assert!(first.check_at(&id, &config, 1_000).is_allow());
    assert!(second.check_at(&id, &config, 2_000).is_block());
    assert_eq!(store.get(&id).last_execution_millis, 1_000);
}

#[test]
fn test_metrics_follow_decisions() {
    let gate = gate();
    let config = ThrottleConfig::simple(10, IntervalUnit::Seconds).unwrap();
    let id = GateId::new("metrics");

    gate.check_at(&id, &config, 0);
    gate.check_at(&id, &config, 1_000);
    gate.check_at(&id, &config, 2_000);
    gate.check_at(&id, &config, 10_000);

    let snapshot = gate.metrics().snapshot();
    assert_eq!(snapshot.executions_allowed, 2);
    assert_eq!(snapshot.executions_blocked, 2);
    assert_eq!(snapshot.windows_opened, 2);
    assert!((snapshot.block_rate() - 0.5).abs() < f64::EPSILON);
}
