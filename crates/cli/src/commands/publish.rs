//! `publish` command implementation.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::{ComponentContext, Disposable, Initializable, PublishedMessage, StreamSinkConfig};
use observability::{CompositeMetrics, InMemoryMetrics, PrometheusMetrics};
use stream_sink::RedisStreamSink;
use tracing::{info, warn};

use crate::cli::PublishArgs;
use crate::error::CliError;
use crate::pipeline::{publish_with_retry, PublishStats, RetryPolicy};

/// Execute the `publish` command
pub async fn run_publish(args: &PublishArgs, prometheus_enabled: bool) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    let mut config = ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    apply_overrides(&mut config, args);
    ConfigLoader::validate(&config).context("Invalid configuration after CLI overrides")?;

    let messages = read_messages(&args.input)?;

    info!(
        url = %config.redacted_url(),
        write_stream = %config.write_stream,
        messages = messages.len(),
        "Configuration loaded"
    );

    if args.dry_run {
        info!("Dry run mode - configuration and input are valid, exiting");
        return Ok(());
    }

    let counters = Arc::new(InMemoryMetrics::new());
    let mut recorders = CompositeMetrics::new().with(counters.clone());
    if prometheus_enabled {
        recorders = recorders.with(Arc::new(PrometheusMetrics));
    }
    let context = ComponentContext::new(Arc::new(recorders));

    let policy = RetryPolicy::new(
        args.max_attempts,
        Duration::from_millis(args.retry_interval_ms),
    );
    let messages_read = messages.len();
    let started = Instant::now();

    let mut sink = RedisStreamSink::new(config);
    let outcome = match sink.initialize(&context).await {
        Ok(()) => publish_with_retry(&sink, messages, policy)
            .await
            .map_err(anyhow::Error::from),
        Err(e) => Err(anyhow::Error::from(e).context("Failed to initialize sink")),
    };

    if let Err(e) = sink.dispose().await {
        warn!(error = %e, "Sink dispose failed");
    }

    let attempts = match &outcome {
        Ok(attempts) => *attempts,
        Err(e) => match e.downcast_ref::<CliError>() {
            Some(CliError::Bailed { attempt, .. }) => *attempt,
            Some(CliError::RetriesExhausted { attempts, .. }) => *attempts,
            _ => 0,
        },
    };

    let stats = PublishStats::from_metrics(&counters, messages_read, attempts, started.elapsed());
    info!(
        published = stats.total_success(),
        errors = stats.total_error(),
        attempts = stats.attempts,
        duration_secs = stats.duration.as_secs_f64(),
        "Publish finished"
    );
    stats.print_summary();

    outcome.map(|_| ())
}

/// Apply CLI/env overrides on top of the file configuration
fn apply_overrides(config: &mut StreamSinkConfig, args: &PublishArgs) {
    if let Some(ref host) = args.host {
        info!(host = %host, "Overriding Redis host from CLI");
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        info!(port = %port, "Overriding Redis port from CLI");
        config.port = port;
    }
    if let Some(ref password) = args.password {
        info!("Overriding Redis password from CLI");
        config.password = Some(password.clone());
    }
    if let Some(ref stream) = args.write_stream {
        info!(write_stream = %stream, "Overriding default stream from CLI");
        config.write_stream = stream.clone();
    }
}

/// Read one `PublishedMessage` per non-blank line
fn read_messages(path: &Path) -> Result<Vec<PublishedMessage>> {
    if !path.exists() {
        return Err(CliError::input_not_found(path.display().to_string()).into());
    }

    let content = std::fs::read_to_string(path).map_err(CliError::from)?;
    let messages = parse_messages(&content)?;
    Ok(messages)
}

fn parse_messages(content: &str) -> std::result::Result<Vec<PublishedMessage>, CliError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str::<PublishedMessage>(line)
                .map_err(|e| CliError::invalid_input(idx + 1, e.to_string()))
        })
        .collect()
}
