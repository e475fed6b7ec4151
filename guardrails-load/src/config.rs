use crate::error::ConfigError;
use crate::operation::Operation;
use rand::Rng;
use reqwest::Url;
use std::{fmt, str::FromStr, time::Duration};
use tokio::time::Instant;
use typed_builder::TypedBuilder;

/// Environment variable consulted when no explicit credential is given.
pub const AUTH_ENV_VAR: &str = "GUARDRAILS_AUTH";

pub const DEFAULT_API_PREFIX: &str = "rest/ai-reviewer/1.0";
pub const DEFAULT_RUN_DURATION: Duration = Duration::from_secs(120);
/// Shorter runs are stretched to this length.
pub const MIN_RUN_DURATION: Duration = Duration::from_secs(5);
pub const DEFAULT_CONCURRENCY: usize = 4;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_JITTER_MIN: Duration = Duration::from_millis(500);
pub const DEFAULT_JITTER_MAX: Duration = Duration::from_millis(1500);
/// Deadlines further out than this are clamped to it.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Settings for one load run. Built once, then shared read-only by every worker.
#[derive(Debug, Clone, TypedBuilder)]
pub struct RunConfig {
    pub base_url: Url,

    #[builder(default = String::from(DEFAULT_API_PREFIX), setter(into))]
    pub api_prefix: String,

    pub credential: Credential,

    #[builder(
        default = DEFAULT_RUN_DURATION,
        setter(transform = |duration: Duration| duration.max(MIN_RUN_DURATION))
    )]
    pub duration: Duration,

    #[builder(default = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    #[builder(default = false)]
    pub verify_tls: bool,

    #[builder(default = DEFAULT_REQUEST_TIMEOUT)]
    pub request_timeout: Duration,

    #[builder(default)]
    pub jitter: JitterRange,

    #[builder(default)]
    pub seed: Option<u64>,
}

impl RunConfig {
    /// Absolute URL of `operation` on the target service.
    pub fn endpoint_url(&self, operation: Operation) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        let prefix = self.api_prefix.trim_matches('/');
        if prefix.is_empty() {
            format!("{base}/{}", operation.path())
        } else {
            format!("{base}/{prefix}/{}", operation.path())
        }
    }
}

pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|err| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: err.to_string(),
    })
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    user: String,
    token: String,
}

impl Credential {
    pub fn new(user: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            token: token.into(),
        }
    }

    /// Picks the explicit value when present, otherwise the environment value.
    /// An empty value counts as absent.
    pub fn resolve(explicit: Option<&str>, env_value: Option<&str>) -> Result<Self, ConfigError> {
        match explicit.or(env_value) {
            Some(raw) if !raw.is_empty() => raw.parse(),
            _ => Err(ConfigError::MissingCredential),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl FromStr for Credential {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (user, token) = s.split_once(':').ok_or(ConfigError::MalformedCredential)?;
        Ok(Self::new(user, token))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("user", &self.user)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Inclusive range the inter-cycle sleep is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JitterRange {
    min: Duration,
    max: Duration,
}

impl JitterRange {
    pub fn new(min: Duration, max: Duration) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::InvalidJitter {
                min_ms: min.as_millis() as u64,
                max_ms: max.as_millis() as u64,
            });
        }
        Ok(Self { min, max })
    }

    pub fn fixed(pause: Duration) -> Self {
        Self {
            min: pause,
            max: pause,
        }
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        if self.min == self.max {
            return self.min;
        }
        let nanos = rng.gen_range(self.min.as_nanos() as u64..=self.max.as_nanos() as u64);
        Duration::from_nanos(nanos)
    }
}

impl Default for JitterRange {
    fn default() -> Self {
        Self {
            min: DEFAULT_JITTER_MIN,
            max: DEFAULT_JITTER_MAX,
        }
    }
}

/// The instant after which workers stop starting new cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline(Instant);

impl Deadline {
    /// Saturates instead of overflowing for absurdly long durations.
    pub fn after(duration: Duration) -> Self {
        let now = Instant::now();
        Self(now.checked_add(duration.min(FAR_FUTURE)).unwrap_or(now))
    }

    pub fn at(instant: Instant) -> Self {
        Self(instant)
    }

    pub fn instant(self) -> Instant {
        self.0
    }

    pub fn has_passed(self) -> bool {
        Instant::now() >= self.0
    }
}
