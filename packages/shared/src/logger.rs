//! Logging setup shared by every ClassChat binary.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence. Without it, `default_level` applies to the
/// given binary and to the `classchat_*` library crates, while third-party
/// crates stay at `warn`.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let crate_name = bin_name.replace('-', "_");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,{crate_name}={default_level},classchat_server={default_level},classchat_shared={default_level},tower_http={default_level}"
        ))
    });

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();

    if let Err(e) = result {
        // A subscriber is already installed (e.g. by a test harness).
        tracing::debug!("Logger already initialized: {}", e);
    }
}
