use crate::config::{
    parse_base_url, Credential, JitterRange, RunConfig, DEFAULT_API_PREFIX, DEFAULT_CONCURRENCY,
};
use crate::error::ConfigError;
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "guardrails-load",
    about = "Guardrails perf smoke test: bursty monitoring reads and rollout pause/resume"
)]
pub struct LoadArgs {
    /// Target service base URL
    #[arg(long)]
    pub base_url: String,

    /// user:token (defaults to the GUARDRAILS_AUTH env var)
    #[arg(long)]
    pub auth: Option<String>,

    /// Test duration in seconds (minimum 5)
    #[arg(long, default_value_t = 120)]
    pub duration: u64,

    /// Number of concurrent workers
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Verify TLS certificates (off by default, useful for localhost)
    #[arg(long)]
    pub verify: bool,

    /// REST prefix placed between the base URL and each endpoint path
    #[arg(long, default_value = DEFAULT_API_PREFIX)]
    pub api_prefix: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    /// Lower bound of the pause between cycles, in milliseconds
    #[arg(long, default_value_t = 500)]
    pub jitter_min_ms: u64,

    /// Upper bound of the pause between cycles, in milliseconds
    #[arg(long, default_value_t = 1500)]
    pub jitter_max_ms: u64,

    /// Seed the worker random sources for a reproducible traffic shape
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl LoadArgs {
    /// Builds the run config. `env_auth` is the value of the credential environment
    /// variable; `--auth` takes precedence over it.
    pub fn into_config(self, env_auth: Option<String>) -> Result<RunConfig, ConfigError> {
        let credential = Credential::resolve(self.auth.as_deref(), env_auth.as_deref())?;
        let base_url = parse_base_url(&self.base_url)?;
        let jitter = JitterRange::new(
            Duration::from_millis(self.jitter_min_ms),
            Duration::from_millis(self.jitter_max_ms),
        )?;

        let config = RunConfig::builder()
            .base_url(base_url)
            .api_prefix(self.api_prefix)
            .credential(credential)
            .duration(Duration::from_secs(self.duration))
            .concurrency(self.concurrency)
            .verify_tls(self.verify)
            .request_timeout(Duration::from_secs(self.timeout))
            .jitter(jitter)
            .seed(self.seed)
            .build();
        Ok(config)
    }
}
