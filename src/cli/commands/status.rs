//! Status command implementation
//!
//! Lists distribution checkpoints and how many dataset objects each
//! {company, position} pair has produced.

use super::load_or_report;
use crate::adapters::database::create_stores;
use crate::adapters::storage::DatasetStore;
use crate::core::state::checkpoint::{DistributionCheckpoint, DistributionStatus};
use crate::core::state::StateManager;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Filter by company ID
    #[arg(long)]
    pub company_id: Option<String>,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking distribution status");

        println!("📊 Distribution Status");
        println!();

        let config = match load_or_report(config_path) {
            Ok(c) => c,
            Err(code) => return Ok(code),
        };

        let stores = match create_stores(&config).await {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to connect to store");
                println!("   Error: {e}");
                return Ok(4); // Connection error exit code
            }
        };
        let datasets = match DatasetStore::from_config(&config) {
            Ok(d) => d,
            Err(e) => {
                println!("❌ Failed to open dataset storage");
                println!("   Error: {e}");
                return Ok(4);
            }
        };

        let state_manager = StateManager::new_with_storage(stores.state);
        let checkpoints = match state_manager.get_all_checkpoints().await {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load checkpoints");
                println!("   Error: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        if checkpoints.is_empty() {
            println!("No distribution history found.");
            if !config.state.enable_checkpointing {
                println!("Checkpointing is disabled; set state.enable_checkpointing = true to record runs.");
            }
            return Ok(0);
        }

        let filtered = self.filter(checkpoints);
        if filtered.is_empty() {
            println!("No checkpoints match the specified filters.");
            return Ok(0);
        }

        println!("Found {} checkpoint(s):", filtered.len());
        println!();
        println!(
            "{:<24} {:<9} {:<16} {:<11} {:<10} {:<10} {:<20}",
            "Company ID", "Position", "Status", "Next Batch", "Invoices", "Datasets", "Updated"
        );
        println!("{}", "-".repeat(104));

        for checkpoint in &filtered {
            let prefix = format!(
                "{}/{}/{}/dataset/",
                checkpoint.destination_path.trim_end_matches('/'),
                checkpoint.company_id,
                checkpoint.position
            );
            let dataset_count = match datasets.list_keys(&prefix).await {
                Ok(keys) => keys.len().to_string(),
                Err(e) => {
                    tracing::warn!(prefix = %prefix, error = %e, "Failed to list datasets");
                    "?".to_string()
                }
            };

            println!(
                "{:<24} {:<9} {:<16} {:<11} {:<10} {:<10} {:<20}",
                checkpoint.company_id.as_str(),
                checkpoint.position,
                status_label(checkpoint.status),
                checkpoint.next_batch_id,
                checkpoint.invoices_published,
                dataset_count,
                checkpoint.updated_at.format("%Y-%m-%d %H:%M:%S")
            );
            if let Some(error) = &checkpoint.last_error {
                println!("    last error: {error}");
            }
        }

        println!();
        Ok(0)
    }

    fn filter(&self, checkpoints: Vec<DistributionCheckpoint>) -> Vec<DistributionCheckpoint> {
        checkpoints
            .into_iter()
            .filter(|cp| match &self.company_id {
                Some(id) => cp.company_id.as_str() == id,
                None => true,
            })
            .collect()
    }
}

fn status_label(status: DistributionStatus) -> &'static str {
    match status {
        DistributionStatus::Completed => "✅ Completed",
        DistributionStatus::InProgress => "🔄 In Progress",
        DistributionStatus::Failed => "❌ Failed",
        DistributionStatus::NotStarted => "⏸️  Not Started",
    }
}
