//! `run` command implementation.

use anyhow::{Context, Result};
use std::time::Duration;
use tracing::{info, warn};

use crate::cli::RunArgs;
use crate::session::{Session, SessionConfig};

/// Execute the `run` command
pub async fn run_session(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    // Validate config path
    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    // Load and parse configuration
    let mut config = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(ref host) = args.host {
        info!(host = %host, "Overriding stream host from CLI");
        config.stream.host = host.clone();
    }
    if let Some(port) = args.port {
        info!(port = %port, "Overriding stream port from CLI");
        config.stream.port = port;
    }

    info!(
        host = %config.stream.host,
        port = config.stream.port,
        mode = ?config.settings.mode,
        "Configuration loaded"
    );

    // Dry run - just validate and exit
    if args.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        print_config_summary(&config);
        return Ok(());
    }

    // Build session configuration
    let session_config = SessionConfig {
        config,
        max_messages: if args.max_messages == 0 {
            None
        } else {
            Some(args.max_messages)
        },
        timeout: if args.timeout == 0 {
            None
        } else {
            Some(Duration::from_secs(args.timeout))
        },
        buffer_size: args.buffer_size,
        metrics_port: if args.metrics_port == 0 {
            None
        } else {
            Some(args.metrics_port)
        },
    };

    // Create and run session
    let session = Session::new(session_config);

    // Setup graceful shutdown handler
    let shutdown_signal = setup_shutdown_signal();

    info!("Starting session...");

    // Run session with shutdown signal
    tokio::select! {
        result = session.run() => {
            match result {
                Ok(stats) => {
                    info!(
                        messages = stats.messages_received,
                        flows = stats.flows,
                        duration_secs = stats.duration.as_secs_f64(),
                        "Session completed successfully"
                    );

                    // Print detailed statistics
                    stats.print_summary();
                }
                Err(e) => {
                    return Err(e).context("Session execution failed");
                }
            }
        }
        _ = shutdown_signal => {
            warn!("Received shutdown signal, stopping session...");
        }
    }

    info!("Flowdeck finished");
    Ok(())
}

/// Setup Ctrl+C and SIGTERM signal handlers
async fn setup_shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Print configuration summary for dry-run mode
fn print_config_summary(config: &contracts::ConsoleConfig) {
    println!("\n=== Configuration Summary ===\n");
    println!("Stream:");
    println!("  Endpoint: {}:{}", config.stream.host, config.stream.port);
    println!("  Buffer size: {}", config.stream.buffer_size);

    println!("\nSettings:");
    println!("  Version: {}", config.settings.version);
    println!("  Proxy mode: {:?}", config.settings.mode);
    println!("  Event log shown: {}", config.settings.show_event_log);

    match config.metrics_port {
        Some(port) => println!("\nMetrics port: {port}"),
        None => println!("\nMetrics: disabled"),
    }

    println!();
}
