//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::StreamSinkConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    url: String,
    write_stream: String,
    base64_encode: bool,
    max_stream_length: Option<usize>,
    command_timeout_ms: Option<u64>,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    url: config.redacted_url(),
                    write_stream: config.write_stream.clone(),
                    base64_encode: config.base64_encode,
                    max_stream_length: config.max_stream_length,
                    command_timeout_ms: config.command_timeout_ms,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &StreamSinkConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.max_stream_length.is_none() {
        warnings.push("max_stream_length is not set - streams grow without bound".to_string());
    }

    if config.command_timeout_ms.is_none() {
        warnings.push("command_timeout_ms is not set - appends may block indefinitely".to_string());
    }

    if config.password.is_some() && !matches!(config.host.as_str(), "localhost" | "127.0.0.1") {
        warnings.push("password is sent over a plain redis:// connection".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Redis: {}", summary.url);
            println!("  Default stream: {}", summary.write_stream);
            println!("  Base64 records: {}", summary.base64_encode);
            if let Some(max_len) = summary.max_stream_length {
                println!("  Max stream length: ~{}", max_len);
            }
            if let Some(timeout) = summary.command_timeout_ms {
                println!("  Command timeout: {}ms", timeout);
            }
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
