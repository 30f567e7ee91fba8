use authload_client::Reply;
use authload_loadgen::metrics::{
    is_error_status, percentile, MetricsCollector, MetricsRegistry, Operation, Sample,
};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-6, "expected {expected}, got {actual}");
}

#[test]
fn test_percentile_nearest_rank() {
    // n=5: p95 index ceil(4.75)-1 = 4, p99 index ceil(4.95)-1 = 4
    let data = [ms(10), ms(20), ms(30), ms(40), ms(50)];
    assert_eq!(percentile(&data, 95.0), ms(50));
    assert_eq!(percentile(&data, 99.0), ms(50));

    // n=2: p95 index ceil(1.9)-1 = 1
    assert_eq!(percentile(&[ms(10), ms(20)], 95.0), ms(20));

    // n=100: p95 index 94, p99 index 98
    let hundred: Vec<Duration> = (1..=100).map(ms).collect();
    assert_eq!(percentile(&hundred, 95.0), ms(95));
    assert_eq!(percentile(&hundred, 99.0), ms(99));
}

#[test]
fn test_percentile_edges() {
    assert_eq!(percentile(&[], 95.0), Duration::ZERO);
    assert_eq!(percentile(&[ms(7)], 99.0), ms(7));
    // A zero percentile clamps to the first element.
    assert_eq!(percentile(&[ms(1), ms(2)], 0.0), ms(1));
}

#[test]
fn test_aggregate_unsorted_input() {
    let c = MetricsCollector::new();
    for v in [50, 10, 40, 20, 30] {
        c.record(200, Some(ms(v)));
    }
    let s = c.aggregate();
    assert_eq!(s.count, 5);
    assert_eq!(s.errors, 0);
    assert_close(s.error_rate, 0.0);
    assert_close(s.avg_ms, 30.0);
    assert_close(s.p95_ms, 50.0);
    assert_close(s.p99_ms, 50.0);
    assert_eq!(s.status_counts.get(&200), Some(&5));
}

#[test]
fn test_aggregate_empty_is_all_zero() {
    let s = MetricsCollector::new().aggregate();
    assert_eq!(s.count, 0);
    assert_eq!(s.errors, 0);
    assert_eq!(s.error_rate, 0.0);
    assert_eq!(s.avg_ms, 0.0);
    assert_eq!(s.p95_ms, 0.0);
    assert_eq!(s.p99_ms, 0.0);
    assert!(s.status_counts.is_empty());
}

#[test]
fn test_errors_count_sentinel_and_4xx_5xx() {
    let c = MetricsCollector::new();
    c.record(200, Some(ms(10)));
    c.record(201, Some(ms(10)));
    c.record(302, Some(ms(10)));
    c.record(401, Some(ms(10)));
    c.record(503, Some(ms(10)));
    c.record_sample(Sample::transport_failure());
    c.record_sample(Sample::transport_failure());
    c.record(399, Some(ms(10)));

    let s = c.aggregate();
    assert_eq!(s.count, 8);
    assert_eq!(s.errors, 4);
    assert_close(s.error_rate, 50.0);
    assert_eq!(s.status_counts.get(&0), Some(&2));
    assert_eq!(s.count, s.status_counts.values().sum::<u64>());
}

#[test]
fn test_sentinel_samples_contribute_no_latency() {
    let c = MetricsCollector::new();
    c.record(200, Some(ms(100)));
    c.record(0, None);
    c.record(0, None);

    // Average is over the single latency sample only.
    let s = c.aggregate();
    assert_eq!(s.count, 3);
    assert_close(s.avg_ms, 100.0);
    assert_close(s.p99_ms, 100.0);
}

#[test]
fn test_is_error_status() {
    assert!(is_error_status(0));
    assert!(!is_error_status(200));
    assert!(!is_error_status(399));
    assert!(is_error_status(400));
    assert!(is_error_status(500));
}

#[test]
fn test_sample_from_reply() {
    let reply = Reply { status: 204, latency: ms(12), body: Vec::new() };
    assert_eq!(Sample::from(&reply), Sample { status: 204, latency: Some(ms(12)) });
    assert_eq!(Sample::transport_failure(), Sample { status: 0, latency: None });
}

#[test]
fn test_concurrent_record_loses_no_updates() {
    const THREADS: u64 = 16;
    const PER_THREAD: u64 = 1_000;

    let c = Arc::new(MetricsCollector::new());
    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let c = Arc::clone(&c);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    if (t + i) % 10 == 0 {
                        c.record(0, None);
                    } else {
                        c.record(200, Some(Duration::from_micros(i)));
                    }
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let s = c.aggregate();
    assert_eq!(s.count, THREADS * PER_THREAD);
    assert_eq!(s.count, s.status_counts.values().sum::<u64>());
    assert_eq!(s.errors, s.status_counts[&0]);
    assert_eq!(s.status_counts[&0] + s.status_counts[&200], THREADS * PER_THREAD);
}

#[test]
fn test_registry_creates_collectors_lazily() {
    let registry = MetricsRegistry::new();
    assert!(registry.get(Operation::AuthLogin).is_none());
    assert!(registry.snapshot().is_empty());

    registry.record(Operation::ApiBOrders, Sample { status: 201, latency: Some(ms(5)) });
    registry.record(Operation::AuthLogin, Sample { status: 200, latency: Some(ms(5)) });
    registry.record(Operation::AuthLogin, Sample::transport_failure());

    let a = registry.collector(Operation::AuthLogin);
    let b = registry.collector(Operation::AuthLogin);
    assert!(Arc::ptr_eq(&a, &b), "one collector per operation");

    // Declaration order, and only operations that saw a sample.
    let snapshot = registry.snapshot();
    let ops: Vec<Operation> = snapshot.iter().map(|(op, _)| *op).collect();
    assert_eq!(ops, vec![Operation::AuthLogin, Operation::ApiBOrders]);
    assert_eq!(snapshot[0].1.count, 2);
    assert_eq!(snapshot[0].1.errors, 1);
    assert_eq!(snapshot[1].1.count, 1);
}

#[test]
fn test_registry_concurrent_operations() {
    let registry = Arc::new(MetricsRegistry::new());
    let mut handles = Vec::new();
    for op in Operation::ALL {
        for _ in 0..4 {
            let registry = Arc::clone(&registry);
            handles.push(thread::spawn(move || {
                for _ in 0..250 {
                    registry.record(op, Sample { status: 200, latency: Some(ms(1)) });
                }
            }));
        }
    }
    for h in handles {
        h.join().unwrap();
    }

    let snapshot = registry.snapshot();
    assert_eq!(snapshot.len(), 4);
    for (_, summary) in snapshot {
        assert_eq!(summary.count, 1_000);
    }
}

#[test]
fn test_operation_names() {
    let names: Vec<&str> = Operation::ALL.iter().map(|op| op.as_name()).collect();
    assert_eq!(names, vec!["auth_login", "auth_refresh", "api_a_items", "api_b_orders"]);
}
