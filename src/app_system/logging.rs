use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber once for the whole process.
///
/// `RUST_LOG` takes precedence over `default_level`. Calling this twice is harmless.
pub fn setup_tracing(default_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_thread_ids(true)
        .with_target(true)
        .try_init();
}
