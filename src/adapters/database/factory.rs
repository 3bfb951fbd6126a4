//! Store handle factory
//!
//! Builds the invoice store, company directory and checkpoint storage for the
//! configured `store_target`. All three share one backend instance.

use crate::adapters::database::traits::{CompanyDirectory, InvoiceStore, StateStorage};
use crate::adapters::memory::{
    MemoryCompanyDirectory, MemoryInvoiceStore, MemoryStateStorage, SeedData,
};
use crate::adapters::postgresql::adapter::PostgreSQLAdapter;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::config::schema::{LedgerlineConfig, StoreTarget};
use crate::domain::{LedgerlineError, Result};
use std::sync::Arc;

/// Store handles built from configuration
#[derive(Clone)]
pub struct StoreHandles {
    pub invoices: Arc<dyn InvoiceStore + Send + Sync>,
    pub companies: Arc<dyn CompanyDirectory + Send + Sync>,
    pub state: Arc<dyn StateStorage + Send + Sync>,
}

/// Create the store handles for `config.store_target`
///
/// PostgreSQL connections are tested and the schema migrated before
/// returning. The memory target is seeded from `memory.seed_file` when set.
///
/// # Errors
///
/// Returns an error if the target's section is missing, the seed file can't
/// be read, or PostgreSQL is unreachable.
pub async fn create_stores(config: &LedgerlineConfig) -> Result<StoreHandles> {
    match config.store_target {
        StoreTarget::PostgreSQL => {
            let pg_config = config.postgresql.as_ref().ok_or_else(|| {
                LedgerlineError::Configuration(
                    "postgresql configuration is required when store_target = 'postgresql'"
                        .to_string(),
                )
            })?;

            tracing::info!("Creating PostgreSQL store");
            let client = Arc::new(PostgreSQLClient::new(pg_config.clone()).await?);
            client.test_connection().await?;
            client.run_migrations().await?;
            let adapter = Arc::new(PostgreSQLAdapter::new_with_arc(client));

            Ok(StoreHandles {
                invoices: adapter.clone(),
                companies: adapter.clone(),
                state: adapter,
            })
        }
        StoreTarget::Memory => {
            let seed = match config.memory.as_ref().and_then(|m| m.seed_file.as_ref()) {
                Some(path) => SeedData::from_file(path)?,
                None => SeedData::default(),
            };

            tracing::info!(
                companies = seed.companies.len(),
                invoices = seed.invoices.len(),
                "Creating in-memory store"
            );

            Ok(StoreHandles {
                invoices: Arc::new(MemoryInvoiceStore::from_invoices(seed.invoices)?),
                companies: Arc::new(MemoryCompanyDirectory::from_companies(seed.companies)),
                state: Arc::new(MemoryStateStorage::new()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CompanyId, Direction, TaxId};
    use crate::adapters::database::traits::PageQuery;
    use std::io::Write;

    #[tokio::test]
    async fn test_memory_store_from_seed_file() {
        let mut seed = tempfile::NamedTempFile::new().unwrap();
        write!(
            seed,
            r#"{{
                "companies": [{{"id": "ACME", "tid": "11-1", "data_path": "acme-data"}}],
                "invoices": [{{
                    "id": "inv-1",
                    "sender_id": "11-1",
                    "accounting_specifications": {{"in": {{"state": "verified"}}}}
                }}]
            }}"#
        )
        .unwrap();

        let toml = format!(
            "store_target = \"memory\"\nbus_target = \"memory\"\nblob_target = \"memory\"\n\n[memory]\nseed_file = {:?}\n",
            seed.path().to_string_lossy()
        );
        let config: LedgerlineConfig = toml::from_str(&toml).unwrap();
        let stores = create_stores(&config).await.unwrap();

        let company = stores
            .companies
            .find_company(&CompanyId::new("ACME").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(company.data_path.as_deref(), Some("acme-data"));

        let page = stores
            .invoices
            .query_page(&PageQuery {
                tax_id: TaxId::new("11-1").unwrap(),
                direction: Direction::In,
                verified_state: "verified".to_string(),
                after: None,
                limit: 10,
            })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_seed_file_is_a_configuration_error() {
        let toml = "store_target = \"memory\"\nbus_target = \"memory\"\nblob_target = \"memory\"\n\n[memory]\nseed_file = \"/nonexistent/seed.json\"\n";
        let config: LedgerlineConfig = toml::from_str(toml).unwrap();
        let result = create_stores(&config).await;
        assert!(matches!(result, Err(LedgerlineError::Configuration(_))));
    }
}
