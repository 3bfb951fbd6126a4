//! State manager for checkpoint persistence
//!
//! This module provides the StateManager for loading and saving distribution
//! checkpoints to the configured state backend.

use crate::adapters::database::traits::StateStorage;
use crate::core::state::checkpoint::DistributionCheckpoint;
use crate::domain::ids::CompanyId;
use crate::domain::{Direction, Result};
use std::sync::Arc;

/// State manager for checkpoint persistence
#[derive(Clone)]
pub struct StateManager {
    /// State storage backend
    storage: Arc<dyn StateStorage + Send + Sync>,
}

impl StateManager {
    /// Create a new StateManager with a state storage backend
    pub fn new_with_storage(storage: Arc<dyn StateStorage + Send + Sync>) -> Self {
        Self { storage }
    }

    /// Load the checkpoint for a {company_id, position} pair
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(DistributionCheckpoint))` if found, `Ok(None)` if not found, or an error.
    pub async fn load_checkpoint(
        &self,
        company_id: &CompanyId,
        position: Direction,
    ) -> Result<Option<DistributionCheckpoint>> {
        self.storage.load_checkpoint(company_id, position).await
    }

    /// Save a checkpoint
    pub async fn save_checkpoint(&self, checkpoint: &DistributionCheckpoint) -> Result<()> {
        self.storage.save_checkpoint(checkpoint).await
    }

    /// Get all checkpoints
    pub async fn get_all_checkpoints(&self) -> Result<Vec<DistributionCheckpoint>> {
        self.storage.get_all_checkpoints().await
    }

    /// Checkpoint a published batch
    ///
    /// Called after every successful publish so that a retry resumes after
    /// the last page the bus accepted.
    pub async fn checkpoint_batch(&self, checkpoint: &DistributionCheckpoint) -> Result<()> {
        tracing::debug!(
            company_id = %checkpoint.company_id,
            position = %checkpoint.position,
            next_batch_id = checkpoint.next_batch_id,
            invoices_published = checkpoint.invoices_published,
            "Checkpointing batch"
        );

        self.save_checkpoint(checkpoint).await
    }
}
