//! `info` command implementation.

use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;
use crate::error::{CliError, Result};

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    stream: StreamInfo,
    settings: SettingsInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics_port: Option<u16>,
}

#[derive(Serialize)]
struct StreamInfo {
    host: String,
    port: u16,
    buffer_size: usize,
}

#[derive(Serialize)]
struct SettingsInfo {
    proxy_mode: String,
    show_event_log: bool,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()));
    }

    let config = config_loader::ConfigLoader::load_from_path(&args.config)
        .map_err(|e| CliError::config_load(args.config.display().to_string(), e))?;

    if args.json {
        let info = build_config_info(&config);
        let json = serde_json::to_string_pretty(&info)?;
        println!("{}", json);
    } else {
        print_config_info(&config);
    }

    Ok(())
}

fn build_config_info(config: &contracts::ConsoleConfig) -> ConfigInfo {
    ConfigInfo {
        version: config.settings.version.clone(),
        stream: StreamInfo {
            host: config.stream.host.clone(),
            port: config.stream.port,
            buffer_size: config.stream.buffer_size,
        },
        settings: SettingsInfo {
            proxy_mode: format!("{:?}", config.settings.mode),
            show_event_log: config.settings.show_event_log,
        },
        metrics_port: config.metrics_port,
    }
}

fn print_config_info(config: &contracts::ConsoleConfig) {
    println!("=== Flowdeck Configuration ===\n");

    println!("Stream");
    println!("   ├─ Host: {}", config.stream.host);
    println!("   ├─ Port: {}", config.stream.port);
    println!("   └─ Buffer size: {}", config.stream.buffer_size);

    println!("\nSettings");
    println!("   ├─ Version: {}", config.settings.version);
    println!("   ├─ Proxy mode: {:?}", config.settings.mode);
    println!("   └─ Event log shown: {}", config.settings.show_event_log);

    match config.metrics_port {
        Some(port) => println!("\nMetrics port: {port}"),
        None => println!("\nMetrics: disabled"),
    }

    println!();
}
