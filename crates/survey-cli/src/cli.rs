//! CLI argument definitions for the survey tabulator.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "survey-tab",
    version,
    about = "Clean a survey export and write a segmented cross-tab report",
    long_about = "Clean a survey export against its layout and write a cross-tab report.\n\n\
                  Keeps completed responses, derives top/middle/bottom buckets for \n\
                  5-, 7- and 11-point grids and sliders, then summarizes every \n\
                  question per value of the segmentation field."
)]
pub struct Cli {
    /// Respondent export (.csv or .xlsx).
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Layout file describing each variable (.csv or .xlsx).
    #[arg(value_name = "LAYOUT")]
    pub layout: PathBuf,

    /// Response column whose values define the report segments.
    #[arg(value_name = "SEGMENT_FIELD")]
    pub segment_field: String,

    /// Path of the report to write.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
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
    use super::*;

    #[test]
    fn four_positionals_are_required() {
        assert!(Cli::try_parse_from(["survey-tab", "data.csv", "layout.csv", "status"]).is_err());
        assert!(
            Cli::try_parse_from([
                "survey-tab",
                "data.csv",
                "layout.csv",
                "status",
                "out.csv",
                "extra"
            ])
            .is_err()
        );
        let cli =
            Cli::try_parse_from(["survey-tab", "data.csv", "layout.csv", "region", "out.csv"])
                .unwrap();
        assert_eq!(cli.segment_field, "region");
        assert_eq!(cli.output, PathBuf::from("out.csv"));
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn logging_flags_are_optional_extras() {
        let cli = Cli::try_parse_from([
            "survey-tab",
            "-v",
            "--log-format",
            "json",
            "data.csv",
            "layout.csv",
            "status",
            "out.csv",
        ])
        .unwrap();
        assert!(cli.verbosity.is_present());
        assert!(matches!(cli.log_format, LogFormatArg::Json));
    }
}
