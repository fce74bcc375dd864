//! # Redis Stream Sink CLI
//!
//! 命令行接口入口点。
//!
//! 提供：
//! - 配置加载与验证
//! - 从 JSON-lines 文件发布消息
//! - 按 stream 汇总发布结果

mod cli;
mod commands;
mod error;
mod pipeline;

use anyhow::Result;
use clap::Parser;
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_publish, run_validate};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging and metrics export based on CLI options
    let obs_config = observability_config(&cli);
    let prometheus_enabled = obs_config.metrics_port.is_some();
    observability::init_with_config(obs_config)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Redis Stream Sink CLI starting"
    );

    // Execute command
    let result = match &cli.command {
        Commands::Publish(args) => run_publish(args, prometheus_enabled).await,
        Commands::Validate(args) => run_validate(args),
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Build the observability setup from CLI options
fn observability_config(cli: &Cli) -> ObservabilityConfig {
    let default_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    ObservabilityConfig {
        log_format: cli.log_format.into(),
        metrics_port: (cli.metrics_port != 0).then_some(cli.metrics_port),
        default_log_level: default_level.to_string(),
    }
}
