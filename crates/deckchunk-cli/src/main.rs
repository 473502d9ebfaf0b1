//! # `deckchunk`
//!
//! Splits an extracted slide deck into bounded chunks for parallel test case
//! authoring, then merges the per-chunk results back into one ordered
//! document.
//!
//! ## Usage
//!
//! ```bash
//! deckchunk plan pptx_data.json --max-pages 15 --work-units output/
//! # ... one worker per chunk writes output/tc_chunk_<id>.json ...
//! deckchunk merge output/ --prefix IT_OP
//! deckchunk verify output/tc_data.json
//! ```

mod cli;

use clap::Parser;
use cli::command;
use cli::config::{CliArgs, Settings};
use cli::telemetry::init_telemetry;
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    init_telemetry(args.json_logs)?;

    let settings = Settings::try_from(args.command)?;
    if cfg!(debug_assertions) {
        tracing::debug!("Running with settings: {:#?}", settings);
    }

    command::run(settings)
}
