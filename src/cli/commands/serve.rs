//! Serve command implementation

use super::load_or_report;
use crate::app::{exit_code_for, Pipeline};
use crate::server::{serve, spawn_local_consumer};
use clap::Args;
use std::time::Duration;
use tokio::sync::watch;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override the listen address (e.g. 127.0.0.1:8080)
    #[arg(long)]
    pub bind: Option<String>,

    /// Page and transform, but don't publish or write
    #[arg(long)]
    pub dry_run: bool,
}

impl ServeArgs {
    /// Execute the serve command
    ///
    /// Runs until the shutdown signal flips to `true`.
    pub async fn execute(
        &self,
        config_path: &str,
        mut shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        let mut config = match load_or_report(config_path) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };
        if let Some(bind) = &self.bind {
            config.server.bind_address = bind.clone();
        }
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }
        if let Err(e) = config.validate() {
            eprintln!("Configuration validation failed: {e}");
            return Ok(2); // Configuration error exit code
        }

        let bind_address = config.server.bind_address.clone();
        let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs);

        let mut pipeline = match Pipeline::from_config(config).await {
            Ok(p) => p,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize pipeline");
                eprintln!("Failed to initialize: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let consumer = pipeline
            .local_consumer
            .take()
            .map(|receiver| spawn_local_consumer(receiver, pipeline.processor.clone()));

        let state = pipeline.app_state();
        // The bus sender lives in the distributor; drop every copy so the
        // local consumer sees the channel close once the server stops
        drop(pipeline);

        let shutdown = async move {
            loop {
                if *shutdown_signal.borrow_and_update() {
                    break;
                }
                if shutdown_signal.changed().await.is_err() {
                    break;
                }
            }
            tracing::info!("Shutdown signal received, draining in-flight requests");
        };

        let result = serve(&bind_address, state, shutdown).await;

        if let Some(handle) = consumer {
            if tokio::time::timeout(shutdown_timeout, handle).await.is_err() {
                tracing::warn!(
                    timeout_secs = shutdown_timeout.as_secs(),
                    "Local consumer did not finish before the shutdown timeout"
                );
            }
        }

        match result {
            Ok(()) => Ok(0),
            Err(e) => {
                tracing::error!(error = %e, "HTTP server failed");
                eprintln!("Server error: {e}");
                Ok(match exit_code_for(&e) {
                    1 => 5, // Fatal error exit code
                    code => code,
                })
            }
        }
    }
}
