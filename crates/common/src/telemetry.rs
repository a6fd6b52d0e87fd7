//! Telemetry and structured logging setup.
//!
//! Tracing is initialized once by the CLI; library crates only emit events.
//! The fixed-format evaluation summary files are written separately by the
//! report module and are not routed through tracing.

use anyhow::{Context, Result};
use tracing::Subscriber;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// Initialize tracing for an evaluation run.
///
/// `log_level` is the default filter when `RUST_LOG` is unset; `json_format`
/// switches the log output to newline-delimited JSON for machine ingestion.
pub fn init_tracing(log_level: &str, json_format: bool) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = Registry::default().with(env_filter);

    if json_format {
        registry
            .with(json_layer())
            .try_init()
            .context("Failed to initialize tracing subscriber")?;
    } else {
        registry
            .with(fmt_layer())
            .try_init()
            .context("Failed to initialize tracing subscriber")?;
    }

    Ok(())
}

/// JSON logging layer
fn json_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .json()
        .with_current_span(true)
        .with_target(true)
        .with_level(true)
}

/// Human-readable logging layer
fn fmt_layer<S>() -> impl Layer<S>
where
    S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_span_events(FmtSpan::CLOSE)
}
