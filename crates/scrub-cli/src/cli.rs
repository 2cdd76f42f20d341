//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use scrub_core::ProfileSet;
use scrub_report::ExportFormat;

#[derive(Parser)]
#[command(
    name = "scrub",
    version,
    about = "Rule-driven cleaning of messy tabular data with lineage",
    long_about = "Clean server logs, bug tracker exports and e-commerce tables.\n\n\
                  Every transformation is recorded in a lineage document next to\n\
                  the cleaned CSV/JSON output."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Show row-level sample values in logs and issue tables.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Clean a directory of raw tables and write outputs and lineage.
    Run(RunArgs),

    /// Report data-quality issues in raw tables without changing anything.
    Check(CheckArgs),

    /// List the loaded rule tables and the rule set fingerprint.
    Rules(RulesArgs),
}

#[derive(Args)]
pub struct SourceArgs {
    /// Directory holding the raw `<table>.csv` / `<table>.json` files.
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// Which group of tables to process.
    #[arg(long = "profile", value_enum)]
    pub profile: ProfileArg,

    /// Only process these tables (repeatable).
    #[arg(long = "table", value_name = "NAME")]
    pub tables: Vec<String>,

    /// Rule file replacing the embedded rule set (also read from SCRUB_RULES).
    #[arg(long = "rules", value_name = "PATH")]
    pub rules: Option<PathBuf>,
}

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output directory (default: <INPUT_DIR>/cleaned_data).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Table file formats to write.
    #[arg(long = "format", value_enum, default_value = "both")]
    pub format: OutputFormatArg,

    /// Clean and report without writing any files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Skip the quality check of the cleaned tables.
    #[arg(long = "no-post-check")]
    pub no_post_check: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Args)]
pub struct RulesArgs {
    /// Rule file to inspect (default: SCRUB_RULES or the embedded set).
    #[arg(long = "rules", value_name = "PATH")]
    pub rules: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ProfileArg {
    Logs,
    Bugs,
    Ecommerce,
}

impl From<ProfileArg> for ProfileSet {
    fn from(value: ProfileArg) -> Self {
        match value {
            ProfileArg::Logs => ProfileSet::Logs,
            ProfileArg::Bugs => ProfileSet::Bugs,
            ProfileArg::Ecommerce => ProfileSet::Ecommerce,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Csv,
    Json,
    Both,
}

impl From<OutputFormatArg> for ExportFormat {
    fn from(value: OutputFormatArg) -> Self {
        match value {
            OutputFormatArg::Csv => ExportFormat::Csv,
            OutputFormatArg::Json => ExportFormat::Json,
            OutputFormatArg::Both => ExportFormat::Both,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
