//! Logging setup for the command line driver.

use anyhow::Result;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install a stderr `fmt` subscriber filtered by `RUST_LOG`.
///
/// Without `RUST_LOG` only warnings are shown, or debug output from the
/// bft crates when `verbose` is set.
pub fn init_telemetry(verbose: bool) -> Result<()> {
    let default_filter = if verbose {
        "info,bft=debug,bft_ir=debug,bft_runtime=debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .try_init()?;

    debug!("Telemetry initialized");
    Ok(())
}
