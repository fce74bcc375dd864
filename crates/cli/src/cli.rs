//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Redis Stream Sink - publish JSON-line messages to Redis streams
#[derive(Parser, Debug)]
#[command(
    name = "redis-stream-sink",
    author,
    version,
    about = "Publish messages to Redis streams",
    long_about = "Output sink for Redis Streams.\n\n\
                  Reads published messages as JSON lines, appends each one to its \n\
                  destination stream, and reports per-stream outcome counts."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        global = true,
        env = "REDIS_STREAM_SINK_VERBOSE"
    )]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "REDIS_STREAM_SINK_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    /// Metrics server port (0 = disabled)
    #[arg(
        long,
        default_value = "0",
        global = true,
        env = "REDIS_STREAM_SINK_METRICS_PORT"
    )]
    pub metrics_port: u16,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Publish messages from a JSON-lines file
    Publish(PublishArgs),

    /// Validate configuration file without connecting
    Validate(ValidateArgs),
}

/// Arguments for the `publish` command
#[derive(Parser, Debug, Clone)]
pub struct PublishArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "sink.toml",
        env = "REDIS_STREAM_SINK_CONFIG"
    )]
    pub config: PathBuf,

    /// JSON-lines file, one published message per line
    #[arg(short, long)]
    pub input: PathBuf,

    /// Override Redis host from configuration
    #[arg(long, env = "REDIS_HOST")]
    pub host: Option<String>,

    /// Override Redis port from configuration
    #[arg(long, env = "REDIS_PORT")]
    pub port: Option<u16>,

    /// Override Redis password from configuration
    #[arg(long, env = "REDIS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Override the default stream from configuration
    #[arg(long, env = "REDIS_STREAM_SINK_WRITE_STREAM")]
    pub write_stream: Option<String>,

    /// Maximum number of attempts per batch
    #[arg(long, default_value = "3", env = "REDIS_STREAM_SINK_MAX_ATTEMPTS")]
    pub max_attempts: u32,

    /// Delay between attempts in milliseconds
    #[arg(long, default_value = "500", env = "REDIS_STREAM_SINK_RETRY_INTERVAL_MS")]
    pub retry_interval_ms: u64,

    /// Validate configuration and input, then exit without publishing
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "sink.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_publish_args() {
        let cli = Cli::try_parse_from([
            "redis-stream-sink",
            "-v",
            "publish",
            "--config",
            "sink.toml",
            "--input",
            "messages.jsonl",
            "--max-attempts",
            "5",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Publish(args) => {
                assert_eq!(args.input, PathBuf::from("messages.jsonl"));
                assert_eq!(args.max_attempts, 5);
                assert_eq!(args.retry_interval_ms, 500);
                assert!(!args.dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_publish_requires_input() {
        let result = Cli::try_parse_from(["redis-stream-sink", "publish"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["redis-stream-sink", "-q", "-v", "validate"]);
        assert!(result.is_err());
    }
}
