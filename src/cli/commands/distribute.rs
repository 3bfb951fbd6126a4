//! Distribute command implementation
//!
//! Runs one distribution from the command line. With the in-memory bus the
//! published batches are processed right after, so a local run ends with the
//! datasets written.

use super::load_or_report;
use crate::app::{exit_code_for, Pipeline};
use crate::domain::{CompanyId, Direction};
use clap::Args;

/// Arguments for the distribute command
#[derive(Args, Debug)]
pub struct DistributeArgs {
    /// Company to distribute
    #[arg(long)]
    pub company_id: String,

    /// Invoice direction (in or out)
    #[arg(long)]
    pub position: Direction,

    /// Override the destination path
    #[arg(long)]
    pub path: Option<String>,

    /// Page and report, but don't publish or write
    #[arg(long)]
    pub dry_run: bool,
}

impl DistributeArgs {
    /// Execute the distribute command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let mut config = match load_or_report(config_path) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
            println!("🔍 DRY RUN MODE - nothing will be published or written");
            println!();
        }

        let company_id = match CompanyId::new(self.company_id.clone()) {
            Ok(id) => id,
            Err(e) => {
                eprintln!("Invalid company id: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let mut pipeline = match Pipeline::from_config(config).await {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Failed to initialize: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let company = match pipeline.resolve_company(&company_id).await {
            Ok(company) => company,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let path = self
            .path
            .clone()
            .unwrap_or_else(|| {
                company
                    .destination_path(&pipeline.config.distribution.default_path)
                    .to_string()
            });

        println!("🚀 Distributing {} invoices for {}", self.position, company.id);
        let summary = match pipeline
            .distributor
            .distribute(&company, self.position, &path)
            .await
        {
            Ok(summary) => summary,
            Err(e) => {
                eprintln!("❌ Distribution failed: {e}");
                return Ok(match exit_code_for(&e) {
                    4 => 4, // Connection error exit code
                    _ => 1,
                });
            }
        };
        println!();
        print!("{}", summary.to_report());

        let Some(mut receiver) = pipeline.local_consumer.take() else {
            return Ok(0);
        };

        let mut failures = 0usize;
        while let Ok(message) = receiver.try_recv() {
            match pipeline.processor.process(&message).await {
                Ok(report) => println!("  {}", report.to_log_line()),
                Err(e) => {
                    failures += 1;
                    eprintln!("  ❌ Batch {} failed: {}", message.batch_id, e);
                }
            }
        }

        if failures > 0 {
            println!();
            println!("⚠️  {failures} batch(es) failed to process");
            return Ok(1); // Completed with failures
        }
        Ok(0)
    }
}
