//! Process command implementation

use super::load_or_report;
use crate::app::{exit_code_for, Pipeline};
use crate::domain::BatchMessage;
use anyhow::Context;
use clap::Args;
use std::io::Read;

/// Arguments for the process command
#[derive(Args, Debug)]
pub struct ProcessArgs {
    /// Batch message JSON file, or `-` for stdin
    #[arg(long)]
    pub message: String,

    /// Fetch and transform, but don't write
    #[arg(long)]
    pub dry_run: bool,
}

impl ProcessArgs {
    /// Execute the process command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let mut config = match load_or_report(config_path) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };
        if self.dry_run {
            config.application.dry_run = true;
        }

        let raw = read_message(&self.message)?;
        let message: BatchMessage = match serde_json::from_str(&raw) {
            Ok(m) => m,
            Err(e) => {
                eprintln!("❌ Invalid batch message: {e}");
                return Ok(2);
            }
        };

        let pipeline = match Pipeline::from_config(config).await {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Failed to initialize: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        match pipeline.processor.process(&message).await {
            Ok(report) => {
                println!("{}", report.to_log_line());
                if let Some(checksum) = &report.checksum {
                    println!("SHA-256: {checksum}");
                }
                Ok(0)
            }
            Err(e) => {
                eprintln!("❌ Batch processing failed: {e}");
                Ok(match exit_code_for(&e) {
                    4 => 4, // Connection error exit code
                    _ => 1,
                })
            }
        }
    }
}

fn read_message(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read batch message from stdin")?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read batch message file {source}"))
    }
}
