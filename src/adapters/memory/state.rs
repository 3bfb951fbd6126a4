//! In-memory checkpoint storage

use crate::adapters::database::traits::StateStorage;
use crate::core::state::checkpoint::DistributionCheckpoint;
use crate::domain::ids::CompanyId;
use crate::domain::{Direction, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Checkpoints held in process memory, lost on exit
#[derive(Debug, Default, Clone)]
pub struct MemoryStateStorage {
    checkpoints: Arc<RwLock<BTreeMap<String, DistributionCheckpoint>>>,
}

impl MemoryStateStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStorage for MemoryStateStorage {
    async fn load_checkpoint(
        &self,
        company_id: &CompanyId,
        position: Direction,
    ) -> Result<Option<DistributionCheckpoint>> {
        let id = DistributionCheckpoint::generate_id(company_id, position);
        Ok(self.checkpoints.read().await.get(&id).cloned())
    }

    async fn save_checkpoint(&self, checkpoint: &DistributionCheckpoint) -> Result<()> {
        self.checkpoints
            .write()
            .await
            .insert(checkpoint.id.clone(), checkpoint.clone());
        Ok(())
    }

    async fn get_all_checkpoints(&self) -> Result<Vec<DistributionCheckpoint>> {
        Ok(self.checkpoints.read().await.values().cloned().collect())
    }
}
