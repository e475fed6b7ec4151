//! Synthetic load for the guardrails scheduler.
//!
//! A fixed number of workers repeatedly read the monitoring endpoints and flip the
//! rollout pause/resume control until a shared deadline, recording every call into one
//! [`StatsAggregator`]. The binary prints the aggregated [`LoadReport`] once all workers
//! have stopped.
pub mod args;
pub mod caller;
pub mod config;
pub mod error;
pub mod harness;
pub mod operation;
pub mod stats;
pub mod telemetry;
pub mod worker;

pub use caller::{CallOutcome, EndpointCaller};
pub use config::{Credential, Deadline, JitterRange, RunConfig};
pub use error::{ConfigError, LoadError, Result};
pub use harness::{Harness, RunReport};
pub use operation::Operation;
pub use stats::{LatencyStats, LoadReport, OperationReport, StatsAggregator};
pub use worker::{Worker, WorkerReport};

pub use reqwest::Method;
pub use reqwest::Url;
