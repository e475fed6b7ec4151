/// Problems with the run inputs. All of them are detected before any request is sent.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("GUARDRAILS_AUTH environment variable or --auth is required")]
    MissingCredential,

    #[error("auth must be user:token")]
    MalformedCredential,

    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("jitter range is inverted: min {min_ms}ms > max {max_ms}ms")]
    InvalidJitter { min_ms: u64, max_ms: u64 },

    #[error("concurrency must be at least 1")]
    InvalidConcurrency,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unable to build http client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("unable to render summary: {0}")]
    Render(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LoadError>;
