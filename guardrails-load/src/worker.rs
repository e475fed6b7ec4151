use crate::caller::EndpointCaller;
use crate::config::{Deadline, RunConfig};
use crate::operation::Operation;
use crate::stats::StatsAggregator;
use rand::Rng;
use serde_json::json;
use std::sync::Arc;

pub const REASON_PREFIX: &str = "perf";
const REASON_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const REASON_SUFFIX_LEN: usize = 6;

/// `<prefix>-` followed by six random lowercase alphanumerics.
pub fn random_reason<R: Rng + ?Sized>(rng: &mut R, prefix: &str) -> String {
    let suffix: String = (0..REASON_SUFFIX_LEN)
        .map(|_| REASON_CHARSET[rng.gen_range(0..REASON_CHARSET.len())] as char)
        .collect();
    format!("{prefix}-{suffix}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerReport {
    pub id: usize,
    pub cycles: u64,
}

/// Repeats the read/toggle/sleep cycle until the deadline.
///
/// The deadline is only checked between cycles. A cycle that has started always runs to
/// the end, so a worker can stop up to one cycle after the deadline.
pub struct Worker<R> {
    id: usize,
    caller: EndpointCaller,
    config: Arc<RunConfig>,
    stats: Arc<StatsAggregator>,
    deadline: Deadline,
    rng: R,
}

impl<R: Rng> Worker<R> {
    pub fn new(
        id: usize,
        caller: EndpointCaller,
        config: Arc<RunConfig>,
        stats: Arc<StatsAggregator>,
        deadline: Deadline,
        rng: R,
    ) -> Self {
        Self {
            id,
            caller,
            config,
            stats,
            deadline,
            rng,
        }
    }

    pub async fn run(mut self) -> WorkerReport {
        let mut cycles = 0;
        while !self.deadline.has_passed() {
            self.run_cycle().await;
            cycles += 1;
            tracing::debug!(worker = self.id, cycles, "cycle complete");
        }
        tracing::debug!(worker = self.id, cycles, "deadline reached");
        WorkerReport {
            id: self.id,
            cycles,
        }
    }

    async fn run_cycle(&mut self) {
        for operation in Operation::MONITORING {
            self.invoke(operation, None).await;
        }

        let body = json!({ "reason": random_reason(&mut self.rng, REASON_PREFIX) });
        for operation in Operation::TOGGLES {
            self.invoke(operation, Some(&body)).await;
        }

        let pause = self.config.jitter.sample(&mut self.rng);
        tokio::time::sleep(pause).await;
    }

    async fn invoke(&self, operation: Operation, body: Option<&serde_json::Value>) {
        let url = self.config.endpoint_url(operation);
        let outcome = self.caller.call(operation.method(), &url, body).await;
        self.stats.record_call(operation.name(), &outcome);
    }
}
