//! Process wiring
//!
//! Builds every service handle once from configuration and hands them to the
//! distributor, the processor and the HTTP state.

use crate::adapters::bus::{create_message_bus, MessageBus};
use crate::adapters::database::{create_stores, StoreHandles};
use crate::adapters::storage::DatasetStore;
use crate::config::LedgerlineConfig;
use crate::core::distribute::{BatchDistributor, DistributorConfig};
use crate::core::process::{BatchProcessor, ProcessorConfig};
use crate::core::state::StateManager;
use crate::domain::{
    BatchMessage, BusError, Company, CompanyId, LedgerlineError, Result, StoreError,
};
use crate::server::AppState;
use std::sync::Arc;
use tokio::sync::mpsc;

/// All handles for one process
pub struct Pipeline {
    pub config: LedgerlineConfig,
    pub stores: StoreHandles,
    pub bus: Arc<dyn MessageBus + Send + Sync>,
    pub datasets: DatasetStore,
    pub distributor: BatchDistributor,
    pub processor: BatchProcessor,

    /// Messages published on the memory bus, for a local consumer
    pub local_consumer: Option<mpsc::UnboundedReceiver<BatchMessage>>,
}

impl Pipeline {
    /// Connect to every configured backend
    ///
    /// # Errors
    ///
    /// Returns the first backend that fails to initialize.
    pub async fn from_config(config: LedgerlineConfig) -> Result<Self> {
        let stores = create_stores(&config).await?;
        let bus_handle = create_message_bus(&config).await?;
        let datasets = DatasetStore::from_config(&config)?;

        let mut distributor = BatchDistributor::new(
            stores.invoices.clone(),
            bus_handle.bus.clone(),
            DistributorConfig {
                page_size: config.distribution.page_size,
                verified_state: config.distribution.verified_state.clone(),
                dry_run: config.dry_run(),
            },
        );
        if config.state.enable_checkpointing {
            distributor = distributor
                .with_checkpointing(StateManager::new_with_storage(stores.state.clone()));
        }

        let processor = BatchProcessor::new(
            stores.invoices.clone(),
            datasets.clone(),
            ProcessorConfig {
                dry_run: config.dry_run(),
            },
        );

        tracing::info!(
            bus = bus_handle.bus.name(),
            datasets = %datasets.description(),
            checkpointing = config.state.enable_checkpointing,
            dry_run = config.dry_run(),
            "Pipeline initialized"
        );

        Ok(Self {
            config,
            stores,
            bus: bus_handle.bus,
            datasets,
            distributor,
            processor,
            local_consumer: bus_handle.local_consumer,
        })
    }

    /// Look up a company, failing with [`LedgerlineError::CompanyNotFound`]
    pub async fn resolve_company(&self, company_id: &CompanyId) -> Result<Company> {
        self.stores
            .companies
            .find_company(company_id)
            .await?
            .ok_or_else(|| LedgerlineError::CompanyNotFound(company_id.to_string()))
    }

    /// Handler state for the HTTP server
    pub fn app_state(&self) -> AppState {
        AppState {
            companies: self.stores.companies.clone(),
            distributor: self.distributor.clone(),
            processor: self.processor.clone(),
            default_path: self.config.distribution.default_path.clone(),
            nack_on_failure: self.config.processing.nack_on_failure,
        }
    }
}

/// Process exit code for an error
///
/// 2 for configuration and validation errors, 4 when a backend is
/// unreachable, 1 for everything else.
pub fn exit_code_for(error: &LedgerlineError) -> i32 {
    match error {
        LedgerlineError::Configuration(_) | LedgerlineError::Validation(_) => 2,
        LedgerlineError::Store(StoreError::ConnectionFailed(_))
        | LedgerlineError::Bus(BusError::ConnectionFailed(_))
        | LedgerlineError::Bus(BusError::Authentication(_)) => 4,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> LedgerlineConfig {
        toml::from_str(
            "store_target = \"memory\"\nbus_target = \"memory\"\nblob_target = \"memory\"\n",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_memory_pipeline_has_local_consumer() {
        let pipeline = Pipeline::from_config(memory_config()).await.unwrap();
        assert!(pipeline.local_consumer.is_some());
        assert_eq!(pipeline.bus.name(), "memory");
        assert_eq!(pipeline.app_state().default_path, "datasets");
    }

    #[tokio::test]
    async fn test_resolve_unknown_company() {
        let pipeline = Pipeline::from_config(memory_config()).await.unwrap();
        let err = pipeline
            .resolve_company(&CompanyId::new("GLOBEX").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, LedgerlineError::CompanyNotFound(ref id) if id == "GLOBEX"));
        assert_eq!(exit_code_for(&err), 1);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            exit_code_for(&LedgerlineError::Configuration("x".to_string())),
            2
        );
        assert_eq!(
            exit_code_for(&StoreError::ConnectionFailed("x".to_string()).into()),
            4
        );
        assert_eq!(
            exit_code_for(&BusError::ConnectionFailed("x".to_string()).into()),
            4
        );
        assert_eq!(
            exit_code_for(&BusError::PublishFailed("x".to_string()).into()),
            1
        );
    }
}
