//! CLI argument definitions for the CAERS normalizer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "caers",
    version,
    about = "CAERS record normalizer - Clean and explore adverse food event exports",
    long_about = "Normalize FDA CAERS adverse event exports.\n\n\
                  Drops incomplete and duplicate reports, converts ages to years,\n\
                  splits multi-valued columns and bins ages for exploration."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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

    /// Include cell values in log output.
    ///
    /// Report rows can carry personal details; values are redacted unless
    /// this flag is given.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize a CAERS export and report rejected records.
    Normalize(NormalizeArgs),

    /// Normalize a CAERS export and print aggregation tables.
    Explore(ExploreArgs),

    /// Show the default CAERS schema.
    Schema(SchemaArgs),
}

#[derive(Parser)]
pub struct NormalizeArgs {
    /// Path to the CSV export.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// JSON schema file (default: built-in CAERS schema).
    #[arg(long = "schema", value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Write normalized records and rejections as JSON.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Fail when a declared field never appears in the input.
    #[arg(long = "require-declared-fields")]
    pub require_declared_fields: bool,

    /// Number of rejections to list after the summary.
    #[arg(long = "max-rejections", value_name = "N", default_value_t = 20)]
    pub max_rejections: usize,
}

#[derive(Parser)]
pub struct ExploreArgs {
    /// Path to the CSV export.
    #[arg(value_name = "CSV")]
    pub input: PathBuf,

    /// JSON schema file (default: built-in CAERS schema).
    #[arg(long = "schema", value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// Rows shown in ranked tables.
    #[arg(long = "top", value_name = "N", default_value_t = caers_report::DEFAULT_TOP)]
    pub top: usize,
}

#[derive(Parser)]
pub struct SchemaArgs {
    /// Print the schema as JSON instead of a table.
    #[arg(long = "json")]
    pub json: bool,
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

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn normalize_defaults() {
        let cli = Cli::try_parse_from(["caers", "normalize", "caers.csv"]).unwrap();
        let Command::Normalize(args) = cli.command else {
            panic!("expected normalize");
        };
        assert_eq!(args.input, PathBuf::from("caers.csv"));
        assert_eq!(args.max_rejections, 20);
        assert!(args.schema.is_none());
        assert!(!args.require_declared_fields);
        assert!(!cli.log_data);
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "caers",
            "explore",
            "caers.csv",
            "--top",
            "5",
            "--log-format",
            "json",
            "--log-data",
        ])
        .unwrap();
        assert!(matches!(cli.log_format, LogFormatArg::Json));
        assert!(cli.log_data);
        let Command::Explore(args) = cli.command else {
            panic!("expected explore");
        };
        assert_eq!(args.top, 5);
    }

    #[test]
    fn input_is_required() {
        assert!(Cli::try_parse_from(["caers", "normalize"]).is_err());
    }
}
