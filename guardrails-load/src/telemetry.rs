use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber.
///
/// Level comes from `RUST_LOG`, defaulting to `info`. Output goes to stderr so stdout only
/// carries the final summary.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
