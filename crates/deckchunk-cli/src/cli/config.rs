use anyhow::bail;
use clap::builder::FalseyValueParser;
use clap::{Args, Parser, Subcommand};
use deckchunk::{
    DEFAULT_MAX_COMPONENTS_PER_CHUNK, DEFAULT_MAX_PAGES_PER_CHUNK, DEFAULT_PREFIX, MergeOptions,
    OversizePolicy, PlanConfig,
};
use std::path::PathBuf;

/// File name of the merged document inside the results directory.
pub const MERGED_FILE_NAME: &str = "tc_data.json";

/// File name of the plan written beside the corpus.
pub const PLAN_FILE_NAME: &str = "chunk_plan.json";

/// Command line interface of the `deckchunk` binary.
///
/// Capacity bounds and the identifier prefix can also be set through the
/// environment (or a `.env` file), so a pipeline can pin them once for every
/// invocation.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "deckchunk",
    version,
    about = "Plan slide deck chunks for parallel test case authoring and merge the results"
)]
pub struct CliArgs {
    /// Emit logs as JSON objects instead of human-readable text.
    ///
    /// Environment variable: `DECKCHUNK_JSON_LOGS`
    #[arg(
        long,
        global = true,
        env = "DECKCHUNK_JSON_LOGS",
        value_parser = FalseyValueParser::new()
    )]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Partition an extracted deck into bounded chunks.
    Plan(PlanArgs),
    /// Merge every `tc_chunk_*.json` in a directory into one document.
    Merge(MergeArgs),
    /// Check a merged document for gaps, duplicates and page order.
    Verify(VerifyArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// Extracted deck (`pptx_data.json`).
    pub input: PathBuf,

    /// Maximum slides per chunk.
    ///
    /// Environment variable: `TC_MAX_PAGES_PER_CHUNK`
    #[arg(long, env = "TC_MAX_PAGES_PER_CHUNK", default_value_t = DEFAULT_MAX_PAGES_PER_CHUNK)]
    pub max_pages: usize,

    /// Maximum UI components per chunk. A single slide above this bound is
    /// still placed alone in its own chunk unless `--reject-oversized` is set.
    ///
    /// Environment variable: `TC_MAX_COMPONENTS_PER_CHUNK`
    #[arg(long, env = "TC_MAX_COMPONENTS_PER_CHUNK", default_value_t = DEFAULT_MAX_COMPONENTS_PER_CHUNK)]
    pub max_components: usize,

    /// Advisory cap on concurrently running workers. Recorded in the plan and
    /// used to report how many rounds the chunks need.
    ///
    /// Environment variable: `TC_MAX_PARALLEL_AGENTS`
    #[arg(long, env = "TC_MAX_PARALLEL_AGENTS", default_value_t = 10)]
    pub max_parallel_workers: usize,

    /// Fail instead of tolerating a slide that exceeds the component bound.
    #[arg(long, default_value_t = false)]
    pub reject_oversized: bool,

    /// Where to write the plan. Defaults to `chunk_plan.json` beside the input.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write one `chunk_<id>_input.json` per chunk into this directory.
    #[arg(long, value_name = "DIR")]
    pub work_units: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct MergeArgs {
    /// Directory holding the `tc_chunk_*.json` results.
    pub output_dir: PathBuf,

    /// Identifier prefix of the merged document. Inferred from the first
    /// `IT_<NAME>_...` identifier when omitted.
    #[arg(long)]
    pub prefix: Option<String>,

    /// Prefix used when none is given and none can be inferred.
    ///
    /// Environment variable: `TC_PREFIX`
    #[arg(long, env = "TC_PREFIX", default_value_t = String::from(DEFAULT_PREFIX))]
    pub default_prefix: String,

    /// Where to write the merged document. Defaults to
    /// `<output_dir>/tc_data.json`.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    /// Merged document (`tc_data.json`).
    pub input: PathBuf,

    /// Expected identifier prefix. Inferred from the first identifier when
    /// omitted.
    #[arg(long)]
    pub prefix: Option<String>,

    /// Environment variable: `TC_PREFIX`
    #[arg(long, env = "TC_PREFIX", default_value_t = String::from(DEFAULT_PREFIX))]
    pub default_prefix: String,
}

#[derive(Debug, Clone)]
pub struct PlanSettings {
    pub input: PathBuf,
    pub output: PathBuf,
    pub work_units: Option<PathBuf>,
    pub config: PlanConfig,
}

#[derive(Debug, Clone)]
pub struct MergeSettings {
    pub output_dir: PathBuf,
    pub output: PathBuf,
    pub options: MergeOptions,
}

#[derive(Debug, Clone)]
pub struct VerifySettings {
    pub input: PathBuf,
    pub prefix: Option<String>,
    pub default_prefix: String,
}

/// Validated settings for one subcommand.
#[derive(Debug, Clone)]
pub enum Settings {
    Plan(PlanSettings),
    Merge(MergeSettings),
    Verify(VerifySettings),
}

impl TryFrom<Command> for Settings {
    type Error = anyhow::Error;

    fn try_from(command: Command) -> Result<Self, Self::Error> {
        Ok(match command {
            Command::Plan(args) => Self::Plan(args.try_into()?),
            Command::Merge(args) => Self::Merge(args.try_into()?),
            Command::Verify(args) => Self::Verify(args.try_into()?),
        })
    }
}

impl TryFrom<PlanArgs> for PlanSettings {
    type Error = anyhow::Error;

    fn try_from(args: PlanArgs) -> Result<Self, Self::Error> {
        if args.max_pages == 0 {
            bail!("TC_MAX_PAGES_PER_CHUNK must be greater than 0");
        }
        if args.max_components == 0 {
            bail!("TC_MAX_COMPONENTS_PER_CHUNK must be greater than 0");
        }
        if args.max_parallel_workers == 0 {
            bail!("TC_MAX_PARALLEL_AGENTS must be greater than 0");
        }

        let policy = if args.reject_oversized {
            OversizePolicy::Reject
        } else {
            OversizePolicy::Tolerate
        };
        let config = PlanConfig::new(args.max_pages, args.max_components)
            .with_max_parallel_workers(args.max_parallel_workers)
            .with_oversize_policy(policy);

        let output = args
            .output
            .unwrap_or_else(|| args.input.with_file_name(PLAN_FILE_NAME));

        Ok(Self {
            input: args.input,
            output,
            work_units: args.work_units,
            config,
        })
    }
}

impl TryFrom<MergeArgs> for MergeSettings {
    type Error = anyhow::Error;

    fn try_from(args: MergeArgs) -> Result<Self, Self::Error> {
        let prefix = validate_prefix(args.prefix)?;
        if args.default_prefix.trim().is_empty() {
            bail!("TC_PREFIX must not be empty");
        }

        let output = args
            .output
            .unwrap_or_else(|| args.output_dir.join(MERGED_FILE_NAME));

        Ok(Self {
            output_dir: args.output_dir,
            output,
            options: MergeOptions {
                prefix,
                default_prefix: args.default_prefix,
            },
        })
    }
}

impl TryFrom<VerifyArgs> for VerifySettings {
    type Error = anyhow::Error;

    fn try_from(args: VerifyArgs) -> Result<Self, Self::Error> {
        if args.default_prefix.trim().is_empty() {
            bail!("TC_PREFIX must not be empty");
        }

        Ok(Self {
            input: args.input,
            prefix: validate_prefix(args.prefix)?,
            default_prefix: args.default_prefix,
        })
    }
}

fn validate_prefix(prefix: Option<String>) -> anyhow::Result<Option<String>> {
    match prefix {
        Some(p) if p.trim().is_empty() => bail!("--prefix must not be empty"),
        Some(p) if p.chars().any(char::is_whitespace) => {
            bail!("--prefix must not contain whitespace: {p:?}")
        }
        other => Ok(other),
    }
}
