//! One module per subcommand. Each prints a short summary to stdout and logs
//! the details through `tracing`.

mod merge;
mod plan;
mod verify;

use crate::cli::config::Settings;
use std::process::ExitCode;

pub fn run(settings: Settings) -> anyhow::Result<ExitCode> {
    match settings {
        Settings::Plan(settings) => plan::run(&settings),
        Settings::Merge(settings) => merge::run(&settings),
        Settings::Verify(settings) => verify::run(&settings),
    }
}

const RULE: &str = "============================================================";
