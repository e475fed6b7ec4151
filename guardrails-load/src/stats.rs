use crate::caller::CallOutcome;
use hdrhistogram::Histogram;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt, time::Duration};

/// Counters for a single operation name.
#[derive(Clone)]
struct OperationStats {
    total: u64,
    errors: u64,
    latency_hist: Histogram<u64>,
}

impl OperationStats {
    fn new() -> Self {
        Self {
            total: 0,
            errors: 0,
            latency_hist: Histogram::new(3).expect("Create histogram"),
        }
    }

    fn consume(&mut self, success: bool) {
        self.total += 1;
        if !success {
            self.errors += 1;
        }
    }

    fn observe(&mut self, latency: Duration) {
        if let Err(err) = self.latency_hist.record(latency.as_micros() as u64) {
            tracing::warn!("Ignoring latency reading due to error: {err}");
        }
    }
}

/// Per-operation attempt and error counts shared by every worker.
///
/// Counters are only reachable through [`record`](Self::record) and
/// [`record_call`](Self::record_call); each update runs under one lock, so an operation's
/// error count never exceeds its total, even mid-run.
#[derive(Default)]
pub struct StatsAggregator {
    operations: Mutex<BTreeMap<String, OperationStats>>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, operation: &str, success: bool) {
        let mut operations = self.operations.lock();
        Self::entry(&mut operations, operation).consume(success);
    }

    /// Like [`record`](Self::record), also keeping the call latency.
    pub fn record_call(&self, operation: &str, outcome: &CallOutcome) {
        let mut operations = self.operations.lock();
        let stats = Self::entry(&mut operations, operation);
        stats.consume(outcome.success);
        stats.observe(outcome.latency);
    }

    fn entry<'a>(
        operations: &'a mut BTreeMap<String, OperationStats>,
        operation: &str,
    ) -> &'a mut OperationStats {
        operations
            .entry(operation.to_string())
            .or_insert_with(OperationStats::new)
    }

    /// Snapshot of every operation recorded so far, sorted by name.
    pub fn summary(&self) -> LoadReport {
        let operations = self.operations.lock();
        LoadReport {
            operations: operations
                .iter()
                .map(|(name, stats)| OperationReport::new(name, stats))
                .collect(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LatencyStats {
    pub avg: Duration,
    pub min: Duration,
    pub med: Duration,
    pub max: Duration,
    pub p90: Duration,
    pub p95: Duration,
}

impl LatencyStats {
    fn from_histogram(hist: &Histogram<u64>) -> Option<Self> {
        if hist.is_empty() {
            return None;
        }
        Some(Self {
            avg: Duration::from_micros(hist.mean() as u64),
            min: Duration::from_micros(hist.min()),
            med: Duration::from_micros(hist.value_at_quantile(0.5)),
            max: Duration::from_micros(hist.max()),
            p90: Duration::from_micros(hist.value_at_quantile(0.90)),
            p95: Duration::from_micros(hist.value_at_quantile(0.95)),
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OperationReport {
    pub name: String,
    pub total: u64,
    pub errors: u64,
    pub latency: Option<LatencyStats>,
}

impl OperationReport {
    fn new(name: &str, stats: &OperationStats) -> Self {
        Self {
            name: name.to_string(),
            total: stats.total,
            errors: stats.errors,
            latency: LatencyStats::from_histogram(&stats.latency_hist),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct LoadReport {
    pub operations: Vec<OperationReport>,
}

impl LoadReport {
    pub fn operation(&self, name: &str) -> Option<&OperationReport> {
        self.operations.iter().find(|op| op.name == name)
    }

    pub fn total_calls(&self) -> u64 {
        self.operations.iter().map(|op| op.total).sum()
    }

    pub fn total_errors(&self) -> u64 {
        self.operations.iter().map(|op| op.errors).sum()
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "=== Load Test Summary ===")?;
        for op in &self.operations {
            write!(f, "\n{:20} total={:5} errors={}", op.name, op.total, op.errors)?;
            if let Some(latency) = &op.latency {
                write!(
                    f,
                    " p50={}ms p95={}ms",
                    latency.med.as_millis(),
                    latency.p95.as_millis()
                )?;
            }
        }
        Ok(())
    }
}
