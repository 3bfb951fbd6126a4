//! Batch distribution
//!
//! Pages through a company's verified invoices for one direction, in invoice id
//! order, and publishes one [`BatchMessage`] per non-empty page. The scan is
//! strictly sequential: one query, then one publish, then the next query.
//!
//! Without checkpointing a failed run keeps whatever it already published, and
//! the next run starts again at batch 0, republishing those pages. With
//! checkpointing the cursor and next batch id are saved after every publish and
//! a failed run continues from there.

use super::summary::DistributionSummary;
use crate::adapters::bus::MessageBus;
use crate::adapters::database::traits::{InvoiceStore, PageQuery};
use crate::core::state::checkpoint::{CheckpointBuilder, DistributionCheckpoint};
use crate::core::state::StateManager;
use crate::domain::{
    BatchMessage, Company, Direction, InvoiceId, LedgerlineError, Result, StoreError,
};
use std::sync::Arc;
use std::time::Instant;

/// Default number of invoice ids per batch
pub const DEFAULT_PAGE_SIZE: usize = 250;

/// Accounting state that makes an invoice eligible for distribution
pub const DEFAULT_VERIFIED_STATE: &str = "verified";

/// Configuration for batch distribution
#[derive(Debug, Clone)]
pub struct DistributorConfig {
    /// Invoice ids per published batch
    pub page_size: usize,
    /// Accounting state an invoice must be in
    pub verified_state: String,
    /// Page and report, but do not publish or checkpoint
    pub dry_run: bool,
}

impl Default for DistributorConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            verified_state: DEFAULT_VERIFIED_STATE.to_string(),
            dry_run: false,
        }
    }
}

/// Batch distributor
#[derive(Clone)]
pub struct BatchDistributor {
    store: Arc<dyn InvoiceStore + Send + Sync>,
    bus: Arc<dyn MessageBus + Send + Sync>,
    state: Option<StateManager>,
    config: DistributorConfig,
}

impl BatchDistributor {
    /// Create a distributor without checkpointing
    pub fn new(
        store: Arc<dyn InvoiceStore + Send + Sync>,
        bus: Arc<dyn MessageBus + Send + Sync>,
        config: DistributorConfig,
    ) -> Self {
        Self {
            store,
            bus,
            state: None,
            config,
        }
    }

    /// Save a checkpoint after every published batch
    pub fn with_checkpointing(mut self, state: StateManager) -> Self {
        self.state = Some(state);
        self
    }

    /// Distribute all verified `position` invoices of `company` to the bus
    ///
    /// # Errors
    ///
    /// Returns the first query, publish, or checkpoint error. Batches published
    /// before the error stay published.
    pub async fn distribute(
        &self,
        company: &Company,
        position: Direction,
        path: &str,
    ) -> Result<DistributionSummary> {
        let start = Instant::now();
        crate::log_distribution_start!(&company.id, position, path);

        if self.config.page_size == 0 {
            return Err(LedgerlineError::Configuration(
                "page_size must be greater than 0".to_string(),
            ));
        }

        let mut summary = DistributionSummary::new(company.id.clone(), position, path);
        summary.dry_run = self.config.dry_run;

        let mut checkpoint = self.begin_checkpoint(company, position, path).await?;
        let mut cursor = None;
        if let Some(cp) = &checkpoint {
            if cp.next_batch_id > 0 {
                summary.resumed = true;
                summary.first_batch_id = cp.next_batch_id;
                cursor = cp.last_invoice_id.clone();
                tracing::info!(
                    company_id = %company.id,
                    position = %position,
                    next_batch_id = cp.next_batch_id,
                    last_invoice_id = ?cp.last_invoice_id.as_ref().map(|id| id.as_str()),
                    "Resuming distribution from checkpoint"
                );
            }
        }

        let outcome = self
            .scan(company, position, path, cursor, &mut summary, &mut checkpoint)
            .await;

        match outcome {
            Ok(()) => {
                if let (Some(state), Some(cp)) = (&self.state, checkpoint.as_mut()) {
                    cp.mark_completed();
                    state.save_checkpoint(cp).await?;
                }
                let summary = summary.with_duration(start.elapsed());
                crate::log_distribution_complete!(
                    &company.id,
                    position,
                    summary.batches_published,
                    summary.invoices_published,
                    summary.duration
                );
                Ok(summary)
            }
            Err(e) => {
                tracing::error!(
                    company_id = %company.id,
                    position = %position,
                    batches_published = summary.batches_published,
                    next_batch_id = summary.next_batch_id(),
                    error = %e,
                    "Distribution failed"
                );
                if let (Some(state), Some(cp)) = (&self.state, checkpoint.as_mut()) {
                    cp.mark_failed(e.to_string());
                    if let Err(save_err) = state.save_checkpoint(cp).await {
                        tracing::warn!(
                            error = %save_err,
                            "Failed to record failed distribution checkpoint"
                        );
                    }
                }
                Err(e)
            }
        }
    }

    /// Load a resumable checkpoint or start a fresh one
    ///
    /// Returns `None` when checkpointing is disabled or this is a dry run.
    async fn begin_checkpoint(
        &self,
        company: &Company,
        position: Direction,
        path: &str,
    ) -> Result<Option<DistributionCheckpoint>> {
        let Some(state) = &self.state else {
            return Ok(None);
        };
        if self.config.dry_run {
            return Ok(None);
        }

        let mut checkpoint = match state.load_checkpoint(&company.id, position).await? {
            Some(existing) if existing.is_resumable(path) => existing,
            _ => CheckpointBuilder::new(company.id.clone(), position)
                .destination_path(path)
                .build(),
        };
        checkpoint.mark_started();
        state.save_checkpoint(&checkpoint).await?;

        Ok(Some(checkpoint))
    }

    async fn scan(
        &self,
        company: &Company,
        position: Direction,
        path: &str,
        mut cursor: Option<InvoiceId>,
        summary: &mut DistributionSummary,
        checkpoint: &mut Option<DistributionCheckpoint>,
    ) -> Result<()> {
        let mut batch_id = summary.first_batch_id;

        loop {
            let query = PageQuery {
                tax_id: company.tid.clone(),
                direction: position,
                verified_state: self.config.verified_state.clone(),
                after: cursor.clone(),
                limit: self.config.page_size,
            };

            let page = self.store.query_page(&query).await?;
            let Some(last) = page.last().cloned() else {
                break;
            };
            if page.len() > self.config.page_size {
                return Err(StoreError::QueryFailed(format!(
                    "store returned {} ids for a page of {}",
                    page.len(),
                    self.config.page_size
                ))
                .into());
            }

            let count = page.len();
            let message = BatchMessage {
                company_id: company.id.clone(),
                position,
                invoice_ids: page,
                batch_id,
                path: path.to_string(),
            };

            if self.config.dry_run {
                tracing::info!(
                    batch_id,
                    invoices = count,
                    "Dry run: skipping publish"
                );
            } else {
                let message_id = self.bus.publish(&message).await?;
                crate::log_batch_published!(batch_id, count, &message_id);
                summary.message_ids.push(message_id);
            }
            summary.record_batch(count);

            if let (Some(state), Some(cp)) = (&self.state, checkpoint.as_mut()) {
                cp.record_batch(last.clone(), count);
                state.checkpoint_batch(cp).await?;
            }

            cursor = Some(last);
            batch_id += 1;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::bus::MemoryBus;
    use crate::adapters::memory::{MemoryInvoiceStore, MemoryStateStorage};
    use crate::core::state::DistributionStatus;
    use crate::domain::{CompanyId, Directional, Invoice, InvoiceAccounting, TaxId};

    fn company() -> Company {
        Company {
            id: CompanyId::new("ACME").unwrap(),
            tid: TaxId::new("11-1").unwrap(),
            data_path: None,
        }
    }

    fn verified(n: usize) -> Vec<Invoice> {
        (0..n)
            .map(|i| Invoice {
                id: format!("inv-{i:04}"),
                sender_id: Some("11-1".to_string()),
                accounting_specifications: Directional::only(
                    Direction::In,
                    InvoiceAccounting {
                        state: Some("verified".to_string()),
                    },
                ),
                ..Default::default()
            })
            .collect()
    }

    fn config(page_size: usize) -> DistributorConfig {
        DistributorConfig {
            page_size,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_distribute_pages() {
        let store = Arc::new(MemoryInvoiceStore::from_invoices(verified(5)).unwrap());
        let bus = Arc::new(MemoryBus::new());
        let distributor = BatchDistributor::new(store, bus.clone(), config(2));

        let summary = distributor
            .distribute(&company(), Direction::In, "p")
            .await
            .unwrap();

        assert_eq!(summary.batches_published, 3);
        assert_eq!(summary.invoices_published, 5);
        assert_eq!(summary.message_ids.len(), 3);

        let sizes: Vec<usize> = bus
            .published()
            .await
            .iter()
            .map(|m| m.invoice_ids.len())
            .collect();
        assert_eq!(sizes, vec![2, 2, 1]);
    }

    #[tokio::test]
    async fn test_dry_run_publishes_nothing() {
        let store = Arc::new(MemoryInvoiceStore::from_invoices(verified(3)).unwrap());
        let bus = Arc::new(MemoryBus::new());
        let state = StateManager::new_with_storage(Arc::new(MemoryStateStorage::new()));
        let distributor = BatchDistributor::new(
            store,
            bus.clone(),
            DistributorConfig {
                page_size: 2,
                dry_run: true,
                ..Default::default()
            },
        )
        .with_checkpointing(state.clone());

        let summary = distributor
            .distribute(&company(), Direction::In, "p")
            .await
            .unwrap();

        assert_eq!(summary.batches_published, 2);
        assert!(summary.dry_run);
        assert!(bus.published().await.is_empty());
        assert!(state.get_all_checkpoints().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zero_page_size_is_rejected() {
        let store = Arc::new(MemoryInvoiceStore::new());
        let bus = Arc::new(MemoryBus::new());
        let distributor = BatchDistributor::new(store, bus, config(0));

        let result = distributor.distribute(&company(), Direction::In, "p").await;
        assert!(matches!(result, Err(LedgerlineError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_checkpoint_completed_after_success() {
        let store = Arc::new(MemoryInvoiceStore::from_invoices(verified(3)).unwrap());
        let bus = Arc::new(MemoryBus::new());
        let state = StateManager::new_with_storage(Arc::new(MemoryStateStorage::new()));
        let distributor =
            BatchDistributor::new(store, bus, config(2)).with_checkpointing(state.clone());

        distributor
            .distribute(&company(), Direction::In, "p")
            .await
            .unwrap();

        let cp = state
            .load_checkpoint(&company().id, Direction::In)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cp.status, DistributionStatus::Completed);
        assert_eq!(cp.next_batch_id, 2);
        assert_eq!(cp.invoices_published, 3);
        assert_eq!(cp.last_invoice_id.unwrap().as_str(), "inv-0002");
    }

    #[tokio::test]
    async fn test_failure_marks_checkpoint_failed() {
        let store = Arc::new(MemoryInvoiceStore::from_invoices(verified(5)).unwrap());
        let bus = Arc::new(MemoryBus::new().failing_after(1));
        let state = StateManager::new_with_storage(Arc::new(MemoryStateStorage::new()));
        let distributor =
            BatchDistributor::new(store, bus, config(2)).with_checkpointing(state.clone());

        let result = distributor.distribute(&company(), Direction::In, "p").await;
        assert!(matches!(result, Err(LedgerlineError::Bus(_))));

        let cp = state
            .load_checkpoint(&company().id, Direction::In)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cp.status, DistributionStatus::Failed);
        assert_eq!(cp.next_batch_id, 1);
        assert!(cp.last_error.is_some());
    }
}
