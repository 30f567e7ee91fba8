use authload_client::Reply;
use authload_common::TRANSPORT_FAILURE_STATUS;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Named class of request. Every worker performing the same operation
/// records into the same collector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    AuthLogin,
    AuthRefresh,
    ApiAItems,
    ApiBOrders,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::AuthLogin,
        Operation::AuthRefresh,
        Operation::ApiAItems,
        Operation::ApiBOrders,
    ];

    pub fn as_name(&self) -> &'static str {
        match self {
            Operation::AuthLogin => "auth_login",
            Operation::AuthRefresh => "auth_refresh",
            Operation::ApiAItems => "api_a_items",
            Operation::ApiBOrders => "api_b_orders",
        }
    }
}

/// One observed request outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub status: u16,
    /// `None` exactly when `status` is the transport-failure sentinel.
    pub latency: Option<Duration>,
}

impl Sample {
    pub fn transport_failure() -> Self {
        Sample { status: TRANSPORT_FAILURE_STATUS, latency: None }
    }
}

impl From<&Reply> for Sample {
    fn from(reply: &Reply) -> Self {
        Sample { status: reply.status, latency: Some(reply.latency) }
    }
}

/// `true` for the transport-failure sentinel and for any 4xx/5xx status.
pub fn is_error_status(status: u16) -> bool {
    status == TRANSPORT_FAILURE_STATUS || status >= 400
}

/// Point-in-time statistics for one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateSummary {
    pub count: u64,
    pub errors: u64,
    /// Percentage in `0.0..=100.0`.
    pub error_rate: f64,
    pub avg_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub status_counts: BTreeMap<u16, u64>,
}

#[derive(Default)]
struct Samples {
    status_counts: BTreeMap<u16, u64>,
    /// One entry per non-sentinel sample, in insertion order (unsorted).
    latencies: Vec<Duration>,
}

/// Thread-safe accumulator for a single operation. Unbounded: samples are
/// kept for the lifetime of the run.
#[derive(Default)]
pub struct MetricsCollector {
    samples: Mutex<Samples>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, status: u16, latency: Option<Duration>) {
        let mut samples = self.lock();
        *samples.status_counts.entry(status).or_insert(0) += 1;
        if let Some(latency) = latency {
            samples.latencies.push(latency);
        }
    }

    pub fn record_sample(&self, sample: Sample) {
        self.record(sample.status, sample.latency);
    }

    pub fn aggregate(&self) -> AggregateSummary {
        let samples = self.lock();

        let count: u64 = samples.status_counts.values().sum();
        let errors: u64 = samples
            .status_counts
            .iter()
            .filter(|(status, _)| is_error_status(**status))
            .map(|(_, n)| n)
            .sum();
        let error_rate = if count > 0 {
            errors as f64 / count as f64 * 100.0
        } else {
            0.0
        };

        let mut sorted = samples.latencies.clone();
        let status_counts = samples.status_counts.clone();
        drop(samples);

        sorted.sort_unstable();
        let avg_ms = if sorted.is_empty() {
            0.0
        } else {
            sorted.iter().map(|d| to_ms(*d)).sum::<f64>() / sorted.len() as f64
        };

        AggregateSummary {
            count,
            errors,
            error_rate,
            avg_ms,
            p95_ms: to_ms(percentile(&sorted, 95.0)),
            p99_ms: to_ms(percentile(&sorted, 99.0)),
            status_counts,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Samples> {
        self.samples.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Nearest-rank percentile over an ascending slice: the element at
/// `clamp(ceil(pct / 100 * n) - 1, 0, n - 1)`. Returns zero for an empty slice.
pub fn percentile(sorted: &[Duration], pct: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let rank = (pct / 100.0 * sorted.len() as f64).ceil() as usize;
    let idx = rank.saturating_sub(1).min(sorted.len() - 1);
    sorted[idx]
}

fn to_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1_000.0
}

/// Collectors keyed by operation, created on first use. The map is sharded,
/// so recording into one operation never waits on another operation's lock.
#[derive(Default)]
pub struct MetricsRegistry {
    collectors: DashMap<Operation, Arc<MetricsCollector>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The collector for `op`, creating it if this is its first use.
    pub fn collector(&self, op: Operation) -> Arc<MetricsCollector> {
        if let Some(existing) = self.collectors.get(&op) {
            return Arc::clone(existing.value());
        }
        Arc::clone(self.collectors.entry(op).or_default().value())
    }

    /// The collector for `op` if anything has been recorded under it.
    pub fn get(&self, op: Operation) -> Option<Arc<MetricsCollector>> {
        self.collectors.get(&op).map(|c| Arc::clone(c.value()))
    }

    pub fn record(&self, op: Operation, sample: Sample) {
        self.collector(op).record_sample(sample);
    }

    /// Fresh summaries for every operation with at least one sample, in
    /// `Operation` declaration order.
    pub fn snapshot(&self) -> Vec<(Operation, AggregateSummary)> {
        Operation::ALL
            .iter()
            .filter_map(|op| self.get(*op).map(|c| (*op, c.aggregate())))
            .filter(|(_, summary)| summary.count > 0)
            .collect()
    }
}
