//! Logging configuration using tracing
//!
//! The library itself only emits `tracing` events (targets under `notmuch`).
//! Applications that do not install their own subscriber can call [`init`].

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a stderr subscriber filtered by `RUST_LOG`
///
/// Defaults to `warn`, which only surfaces native failures that happened
/// while releasing handles on drop.
///
/// # Example RUST_LOG values
/// - `RUST_LOG=notmuch=debug` - Open/close, queries, indexing
/// - `RUST_LOG=notmuch=trace` - Also writer claims
///
/// # Errors
/// Returns [`Error::Config`](crate::Error::Config) if a global subscriber is
/// already installed
pub fn init() -> crate::Result<()> {
    init_with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
}

/// Install a stderr subscriber with an explicit filter directive
pub fn init_with_filter(filter: EnvFilter) -> crate::Result<()> {
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_line_number(true),
        )
        .try_init()
        .map_err(|e| crate::Error::Config(format!("Failed to initialize tracing: {}", e)))?;

    Ok(())
}

/// Initialize logging for tests (no-op if already initialized)
pub fn init_test() {
    let _ = init_with_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("notmuch=debug")),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_is_idempotent() {
        init_test();
        init_test();
    }

    #[test]
    fn test_second_init_fails() {
        init_test();
        assert!(matches!(init(), Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_structured_events() {
        init_test();
        tracing::debug!(path = "/mail", mode = "read_only", "Opened notmuch database");
        tracing::warn!(status = "a Xapian exception occurred", "Failed to close database on drop");
    }
}
