//! CLI argument parsing for perf-tracer

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Fixed-width table (default)
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "perf-tracer")]
#[command(version)]
#[command(about = "Aggregate per-call-site timing from a recorded event stream", long_about = None)]
pub struct Cli {
    /// Event script to replay (reads stdin when omitted)
    #[arg(value_name = "SCRIPT")]
    pub script: Option<PathBuf>,

    /// Load tracer configuration from a TOML file
    #[arg(short = 'C', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Total events recorded before tracing goes silent (overrides config)
    #[arg(short = 'n', long = "max-events", value_name = "N")]
    pub max_events: Option<u64>,

    /// Hash table size as a power of two (overrides config)
    #[arg(long = "bucket-bits", value_name = "BITS")]
    pub bucket_bits: Option<u32>,

    /// Start with recording disabled
    #[arg(long = "disabled")]
    pub disabled: bool,

    /// Report output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Only report call sites whose identifier matches this regex
    #[arg(short = 'F', long = "filter", value_name = "REGEX")]
    pub filter: Option<String>,

    /// Enable debug tracing output on stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["perf-tracer"]);
        assert!(cli.script.is_none());
        assert!(cli.config.is_none());
        assert!(cli.max_events.is_none());
        assert!(cli.bucket_bits.is_none());
        assert!(!cli.disabled);
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.filter.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_parses_script() {
        let cli = Cli::parse_from(["perf-tracer", "events.txt"]);
        assert_eq!(cli.script, Some(PathBuf::from("events.txt")));
    }

    #[test]
    fn test_cli_max_events() {
        let cli = Cli::parse_from(["perf-tracer", "-n", "50"]);
        assert_eq!(cli.max_events, Some(50));

        let cli = Cli::parse_from(["perf-tracer", "--max-events", "7"]);
        assert_eq!(cli.max_events, Some(7));
    }

    #[test]
    fn test_cli_format_json() {
        let cli = Cli::parse_from(["perf-tracer", "--format", "json"]);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["perf-tracer", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_cli_all_flags() {
        let cli = Cli::parse_from([
            "perf-tracer",
            "--config",
            "perf-tracer.toml",
            "--bucket-bits",
            "4",
            "--disabled",
            "--filter",
            "^sys_",
            "--debug",
            "script.txt",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("perf-tracer.toml")));
        assert_eq!(cli.bucket_bits, Some(4));
        assert!(cli.disabled);
        assert_eq!(cli.filter.as_deref(), Some("^sys_"));
        assert!(cli.debug);
        assert_eq!(cli.script, Some(PathBuf::from("script.txt")));
    }
}
