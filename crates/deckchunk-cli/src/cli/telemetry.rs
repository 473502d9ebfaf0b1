//! # Logging
//!
//! Every subcommand logs through `tracing`. Events from the `deckchunk`
//! library (pipeline stages at `debug`, warnings at `warn`) flow into the same
//! subscriber.
//!
//! ## Output
//!
//! - Human-readable, multi-line events on stderr by default.
//! - One JSON object per event with `--json-logs` or
//!   `DECKCHUNK_JSON_LOGS=1`, for pipelines that collect logs.
//!
//! stdout is reserved for the command summaries.
//!
//! ## Filtering
//!
//! Controlled by `RUST_LOG`, defaulting to `info`:
//!
//! ```bash
//! RUST_LOG=deckchunk=debug deckchunk merge output/
//! ```

use tracing_subscriber::{
    EnvFilter, Layer, fmt, fmt::time::ChronoLocal, layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub fn init_telemetry(json_logs: bool) -> anyhow::Result<()> {
    let output = if json_logs {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_timer(ChronoLocal::rfc_3339())
            .with_target(false)
            .json()
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_timer(ChronoLocal::rfc_3339())
            .with_target(false)
            .with_line_number(true)
            .with_file(true)
            .pretty()
            .boxed()
    };

    tracing_subscriber::registry()
        .with(output)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .try_init()?;

    Ok(())
}
