// Ledgerline - Verified invoice batching and line-item datasets
// Copyright (c) 2025 Ledgerline Contributors
// Licensed under the MIT License

use clap::Parser;
use ledgerline::cli::{Cli, Commands};
use ledgerline::logging::init_logging;
use std::process;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let (log_level, logging_config) = cli.logging_settings();
    let logging_guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Ledgerline - Verified invoice batching and line-item datasets"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => Some(s),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create SIGTERM handler");
                    None
                }
            };

            let terminate = async {
                match sigterm.as_mut() {
                    Some(s) => {
                        s.recv().await;
                    }
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                result = tokio::signal::ctrl_c() => {
                    if let Err(e) = result {
                        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                        return;
                    }
                    tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
                }
                _ = terminate => {
                    tracing::info!("Received SIGTERM, initiating graceful shutdown...");
                }
            }
            println!("\n⚠️  Shutdown signal received, finishing in-flight requests...");
            let _ = shutdown_tx.send(true);
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            } else {
                tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown...");
                println!("\n⚠️  Shutdown signal received, finishing in-flight requests...");
                let _ = shutdown_tx.send(true);
            }
        }
    });

    let exit_code = match execute_command(&cli, shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5 // Fatal error exit code
        }
    };

    // process::exit skips destructors; flush the file writer first
    drop(logging_guard);
    process::exit(exit_code);
}

async fn execute_command(cli: &Cli, shutdown_signal: watch::Receiver<bool>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Serve(args) => args.execute(&cli.config, shutdown_signal).await,
        Commands::Distribute(args) => args.execute(&cli.config).await,
        Commands::Process(args) => args.execute(&cli.config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Status(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
