use crate::caller::EndpointCaller;
use crate::config::{Deadline, RunConfig};
use crate::error::{ConfigError, Result};
use crate::stats::{LoadReport, StatsAggregator};
use crate::worker::{Worker, WorkerReport};
use rand::{rngs::StdRng, SeedableRng};
use std::{sync::Arc, time::Duration};
use tokio::{task::JoinSet, time::Instant};

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: LoadReport,
    /// One entry per worker that finished, ordered by worker id.
    pub workers: Vec<WorkerReport>,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn total_cycles(&self) -> u64 {
        self.workers.iter().map(|w| w.cycles).sum()
    }
}

pub struct Harness {
    config: Arc<RunConfig>,
}

impl Harness {
    pub fn new(config: RunConfig) -> Result<Self> {
        if config.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency.into());
        }
        Ok(Self {
            config: Arc::new(config),
        })
    }

    /// Runs `concurrency` workers until the deadline and collects their stats.
    ///
    /// Every worker gets its own HTTP session. Sessions are all built before the first
    /// request, so a client that cannot be constructed fails the run without any traffic.
    pub async fn run(&self) -> Result<RunReport> {
        let callers = (0..self.config.concurrency)
            .map(|_| EndpointCaller::new(&self.config))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let stats = Arc::new(StatsAggregator::new());
        let start = Instant::now();
        let deadline = Deadline::after(self.config.duration);
        tracing::info!(
            base_url = %self.config.base_url,
            workers = self.config.concurrency,
            duration_secs = self.config.duration.as_secs(),
            "starting load run"
        );

        let mut workers = JoinSet::new();
        for (id, caller) in callers.into_iter().enumerate() {
            let rng = match self.config.seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(id as u64)),
                None => StdRng::from_entropy(),
            };
            let worker = Worker::new(
                id,
                caller,
                self.config.clone(),
                stats.clone(),
                deadline,
                rng,
            );
            workers.spawn(worker.run());
        }

        let mut reports = Vec::with_capacity(self.config.concurrency);
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(report) => reports.push(report),
                Err(err) => tracing::error!("load worker aborted: {err}"),
            }
        }
        reports.sort_by_key(|report| report.id);

        let elapsed = start.elapsed();
        let summary = stats.summary();
        tracing::info!(
            elapsed_ms = elapsed.as_millis() as u64,
            calls = summary.total_calls(),
            errors = summary.total_errors(),
            "load run finished"
        );

        Ok(RunReport {
            summary,
            workers: reports,
            elapsed,
        })
    }
}
