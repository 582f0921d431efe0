use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// Filtering follows `RUST_LOG` and defaults to `warn`, so the report on
/// stdout is never interleaved with diagnostics.
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
