//! Integration tests for drain ordering and the run-once contract.

use shutdown_hook_registry::{
    Callback, ShutdownRegistry, HIGHEST_PRECEDENCE, LOWEST_PRECEDENCE, NORMAL_PRIORITY,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn named(order: &Arc<Mutex<Vec<String>>>, name: &str) -> Callback {
    let order = order.clone();
    let name = name.to_string();
    Arc::new(move || order.lock().unwrap().push(name.clone()))
}

#[test]
fn test_documented_example_order() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let registry = ShutdownRegistry::new();

    registry.register(named(&order, "A"), 10);
    registry.register(named(&order, "B"), 1);
    registry.register(named(&order, "C"), 5);

    registry.drain();
    assert_eq!(*order.lock().unwrap(), vec!["B", "C", "A"]);
}

#[test]
fn test_precedence_constants() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let registry = ShutdownRegistry::new();

    registry.register(named(&order, "last"), LOWEST_PRECEDENCE);
    registry.register(named(&order, "normal"), NORMAL_PRIORITY);
    registry.register(named(&order, "first"), HIGHEST_PRECEDENCE);

    registry.drain();
    assert_eq!(*order.lock().unwrap(), vec!["first", "normal", "last"]);
}

#[test]
fn test_snapshot_is_non_decreasing_for_scrambled_priorities() {
    let registry = ShutdownRegistry::new();
    // Deterministic scramble of 0..64
    let priorities: Vec<i32> = (0..64).map(|i| (i * 37) % 64 - 32).collect();
    for priority in &priorities {
        registry.register(Arc::new(|| {}), *priority);
    }

    let snapshot = registry.snapshot();
    assert_eq!(snapshot.len(), priorities.len());
    assert!(snapshot
        .windows(2)
        .all(|pair| pair[0].priority() <= pair[1].priority()));
}

#[test]
fn test_snapshot_matches_drain_order() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let registry = ShutdownRegistry::new();

    for (name, priority) in [("x", 3), ("y", -3), ("z", 3), ("w", 0)] {
        registry.register(named(&order, name), priority);
    }

    let expected: Vec<_> = registry
        .snapshot()
        .iter()
        .map(|entry| (entry.priority(), entry.sequence()))
        .collect();
    assert_eq!(expected, vec![(-3, 1), (0, 3), (3, 0), (3, 2)]);

    registry.drain();
    assert_eq!(*order.lock().unwrap(), vec!["y", "w", "x", "z"]);
}

#[test]
fn test_every_pending_callback_runs_exactly_once() {
    let counters: Vec<_> = (0..16).map(|_| Arc::new(AtomicUsize::new(0))).collect();
    let registry = ShutdownRegistry::new();

    for (i, counter) in counters.iter().enumerate() {
        let counter = counter.clone();
        registry.register(
            Arc::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
            (i % 4) as i32,
        );
    }

    registry.drain();
    registry.drain();

    assert!(registry.snapshot().is_empty());
    assert!(counters.iter().all(|c| c.load(Ordering::SeqCst) == 1));
}
